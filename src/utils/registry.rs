// hacknect-service/src/utils/registry.rs
use crate::models::{
    CollabRequest, Profile, RequestKind, RequestStatus, ServiceError, Team, TeamStatus,
};
use async_trait::async_trait;
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

// Low-level store failures
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    NotFound,
    // The precondition of a guarded write did not hold
    VersionMismatch { expected: u64, actual: u64 },
    // Transient; safe to retry
    Unavailable(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreError::NotFound => write!(f, "entity not found"),
            StoreError::VersionMismatch { expected, actual } => {
                write!(f, "expected version {}, found {}", expected, actual)
            }
            StoreError::Unavailable(reason) => write!(f, "store unavailable: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ServiceError::NotFound,
            StoreError::VersionMismatch { .. } => ServiceError::Conflict(err.to_string()),
            StoreError::Unavailable(reason) => ServiceError::StoreUnavailable(reason),
        }
    }
}

// An entity together with the version its next guarded write must name
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: u64,
    pub value: T,
}

#[derive(Debug, Clone, Default)]
pub struct TeamFilter {
    // Empty means any status
    pub statuses: Vec<TeamStatus>,
    pub member_not: Option<String>,
}

impl TeamFilter {
    // Forming or recruiting teams the user has not joined yet
    pub fn open_for(user_id: &str) -> Self {
        Self {
            statuses: vec![TeamStatus::Forming, TeamStatus::Recruiting],
            member_not: Some(user_id.to_string()),
        }
    }

    pub fn matches(&self, team: &Team) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&team.status) {
            return false;
        }
        match &self.member_not {
            Some(user_id) => !team.is_member(user_id),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub to_admin_id: Option<String>,
    pub from_id: Option<String>,
    pub team_id: Option<String>,
    pub kind: Option<RequestKind>,
    pub status: Option<RequestStatus>,
}

impl RequestFilter {
    pub fn matches(&self, request: &CollabRequest) -> bool {
        self.to_admin_id.as_ref().map_or(true, |id| &request.to_admin_id == id)
            && self.from_id.as_ref().map_or(true, |id| &request.from_id == id)
            && self.team_id.as_ref().map_or(true, |id| &request.target_team_id == id)
            && self.kind.map_or(true, |kind| request.kind == kind)
            && self.status.map_or(true, |status| request.status == status)
    }
}

/// Persistent profile/team/request store.
///
/// Every `update_*` is a precondition-guarded write: it applies only when the stored
/// version still equals `expected_version`, and returns the new version. Inserts are
/// guarded on the id being absent.
#[async_trait]
pub trait Registry: Send + Sync {
    async fn get_profile(&self, id: &str) -> Result<Versioned<Profile>, StoreError>;
    async fn get_team(&self, id: &str) -> Result<Versioned<Team>, StoreError>;
    async fn get_request(&self, id: &str) -> Result<Versioned<CollabRequest>, StoreError>;

    async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>, StoreError>;
    async fn list_mentors(&self) -> Result<Vec<Profile>, StoreError>;
    async fn list_requests(&self, filter: &RequestFilter)
        -> Result<Vec<CollabRequest>, StoreError>;

    async fn insert_profile(&self, profile: Profile) -> Result<u64, StoreError>;
    async fn insert_team(&self, team: Team) -> Result<u64, StoreError>;
    async fn insert_request(&self, request: CollabRequest) -> Result<u64, StoreError>;

    async fn update_profile(
        &self,
        id: &str,
        expected_version: u64,
        profile: Profile,
    ) -> Result<u64, StoreError>;
    async fn update_team(&self, id: &str, expected_version: u64, team: Team)
        -> Result<u64, StoreError>;
    async fn update_request(
        &self,
        id: &str,
        expected_version: u64,
        request: CollabRequest,
    ) -> Result<u64, StoreError>;
}

// One keyed collection; all compare-and-set happens under its lock
struct Collection<T> {
    entries: Arc<Mutex<HashMap<String, Versioned<T>>>>,
}

impl<T: Clone> Collection<T> {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, Versioned<T>>>, StoreError> {
        self.entries
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("Lock error: {:?}", e)))
    }

    fn get(&self, id: &str) -> Result<Versioned<T>, StoreError> {
        self.lock()?.get(id).cloned().ok_or(StoreError::NotFound)
    }

    fn values(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.lock()?.values().map(|v| v.value.clone()).collect())
    }

    fn insert(&self, id: &str, value: T) -> Result<u64, StoreError> {
        let mut entries = self.lock()?;
        if let Some(existing) = entries.get(id) {
            return Err(StoreError::VersionMismatch {
                expected: 0,
                actual: existing.version,
            });
        }
        entries.insert(id.to_string(), Versioned { version: 1, value });
        Ok(1)
    }

    fn compare_and_set(&self, id: &str, expected_version: u64, value: T) -> Result<u64, StoreError> {
        let mut entries = self.lock()?;
        let entry = entries.get_mut(id).ok_or(StoreError::NotFound)?;
        if entry.version != expected_version {
            return Err(StoreError::VersionMismatch {
                expected: expected_version,
                actual: entry.version,
            });
        }
        entry.version += 1;
        entry.value = value;
        Ok(entry.version)
    }
}

// Initial data loaded at startup
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct SeedData {
    #[serde(default)]
    pub profiles: Vec<Profile>,
    #[serde(default)]
    pub teams: Vec<Team>,
}

// Process-local registry
#[derive(Clone)]
pub struct InMemoryRegistry {
    profiles: Arc<Collection<Profile>>,
    teams: Arc<Collection<Team>>,
    requests: Arc<Collection<CollabRequest>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            profiles: Arc::new(Collection::new()),
            teams: Arc::new(Collection::new()),
            requests: Arc::new(Collection::new()),
        }
    }

    pub fn from_seed(seed: SeedData) -> Result<Self, ServiceError> {
        let registry = Self::new();

        for profile in seed.profiles {
            profile.validate()?;
            registry
                .profiles
                .insert(&profile.id.clone(), profile)
                .map_err(|e| ServiceError::InvalidInput(format!("Duplicate profile in seed: {}", e)))?;
        }
        for team in seed.teams {
            team.validate()?;
            registry
                .teams
                .insert(&team.id.clone(), team)
                .map_err(|e| ServiceError::InvalidInput(format!("Duplicate team in seed: {}", e)))?;
        }

        Ok(registry)
    }

    // Load profiles and teams from a JSON file
    pub fn from_seed_file<P: AsRef<Path>>(path: P) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            error!("Failed to read seed file {:?}: {:?}", path, e);
            ServiceError::InternalServerError
        })?;

        let seed: SeedData = serde_json::from_str(&content).map_err(|e| {
            error!("Failed to parse seed JSON: {:?}", e);
            ServiceError::InvalidInput(format!("Invalid seed file: {}", e))
        })?;

        let (profiles, teams) = (seed.profiles.len(), seed.teams.len());
        let registry = Self::from_seed(seed)?;
        info!("✅ Seeded registry with {} profiles and {} teams", profiles, teams);
        Ok(registry)
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Registry for InMemoryRegistry {
    async fn get_profile(&self, id: &str) -> Result<Versioned<Profile>, StoreError> {
        self.profiles.get(id)
    }

    async fn get_team(&self, id: &str) -> Result<Versioned<Team>, StoreError> {
        self.teams.get(id)
    }

    async fn get_request(&self, id: &str) -> Result<Versioned<CollabRequest>, StoreError> {
        self.requests.get(id)
    }

    async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>, StoreError> {
        let mut teams: Vec<Team> = self
            .teams
            .values()?
            .into_iter()
            .filter(|team| filter.matches(team))
            .collect();
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(teams)
    }

    async fn list_mentors(&self) -> Result<Vec<Profile>, StoreError> {
        let mut mentors: Vec<Profile> = self
            .profiles
            .values()?
            .into_iter()
            .filter(Profile::is_mentor)
            .collect();
        mentors.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(mentors)
    }

    // Newest first
    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<CollabRequest>, StoreError> {
        let mut requests: Vec<CollabRequest> = self
            .requests
            .values()?
            .into_iter()
            .filter(|request| filter.matches(request))
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(requests)
    }

    async fn insert_profile(&self, profile: Profile) -> Result<u64, StoreError> {
        let id = profile.id.clone();
        self.profiles.insert(&id, profile)
    }

    async fn insert_team(&self, team: Team) -> Result<u64, StoreError> {
        let id = team.id.clone();
        self.teams.insert(&id, team)
    }

    async fn insert_request(&self, request: CollabRequest) -> Result<u64, StoreError> {
        let id = request.id.clone();
        self.requests.insert(&id, request)
    }

    async fn update_profile(
        &self,
        id: &str,
        expected_version: u64,
        profile: Profile,
    ) -> Result<u64, StoreError> {
        self.profiles.compare_and_set(id, expected_version, profile)
    }

    async fn update_team(&self, id: &str, expected_version: u64, team: Team) -> Result<u64, StoreError> {
        self.teams.compare_and_set(id, expected_version, team)
    }

    async fn update_request(
        &self,
        id: &str,
        expected_version: u64,
        request: CollabRequest,
    ) -> Result<u64, StoreError> {
        self.requests.compare_and_set(id, expected_version, request)
    }
}
