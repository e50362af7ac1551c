// Shared fixtures for the test modules
use crate::models::{
    CollabRequest, ExperienceLevel, Profile, Role, Team, TeamStatus,
};
use crate::services::RequestLifecycle;
use crate::utils::registry::{
    InMemoryRegistry, Registry, RequestFilter, SeedData, StoreError, TeamFilter, Versioned,
};
use crate::utils::store_client::{RegistryClient, StorePolicy};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

pub const TEST_SECRET: &str = "test_secret";

pub fn profile(id: &str, role: Role, level: ExperienceLevel, skills: &[&str], interests: &[&str]) -> Profile {
    Profile::new(id, role, level)
        .with_skills(skills.iter().copied())
        .with_interests(interests.iter().copied())
}

pub fn team(id: &str, admin_id: &str, skills: &[&str], idea: &str, status: TeamStatus) -> Team {
    let mut team = Team::new(id, admin_id, idea).with_skills_needed(skills.iter().copied());
    team.status = status;
    team
}

pub fn seed() -> SeedData {
    SeedData {
        profiles: vec![
            profile("alice", Role::Participant, ExperienceLevel::Intermediate, &["React", "Python"], &["ai/ml"]),
            profile("bob", Role::Participant, ExperienceLevel::Beginner, &["Figma"], &["design"]),
            profile("admin", Role::Participant, ExperienceLevel::Expert, &["Python", "FastAPI"], &[]),
            profile("mentor-1", Role::Mentor, ExperienceLevel::Expert, &["Python", "Machine Learning"], &["healthtech"]),
            profile("mentor-2", Role::Mentor, ExperienceLevel::Intermediate, &["Figma", "UI Design"], &[]),
        ],
        teams: vec![
            team("team-1", "admin", &["Python", "FastAPI"], "ai/ml", TeamStatus::Recruiting),
            team("team-full", "bob", &["Figma"], "design tools", TeamStatus::Full),
        ],
    }
}

pub fn seeded_registry() -> InMemoryRegistry {
    InMemoryRegistry::from_seed(seed()).expect("seed data is valid")
}

pub fn fast_policy() -> StorePolicy {
    StorePolicy {
        call_timeout: Duration::from_millis(200),
        max_attempts: 3,
        base_backoff: Duration::from_millis(1),
        max_cas_attempts: 8,
    }
}

pub fn lifecycle_over(registry: Arc<dyn Registry>) -> RequestLifecycle {
    RequestLifecycle::new(RegistryClient::new(registry, fast_policy()))
}

pub fn token_for(user_id: &str) -> String {
    let claims = crate::models::Claims {
        sub: user_id.to_string(),
        exp: (Utc::now().timestamp() + 3600) as usize,
        iat: Utc::now().timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(TEST_SECRET.as_bytes()))
        .expect("token encodes")
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Registry that fails on demand.
///
/// `transient_failures` makes the next N calls (of any kind) return `Unavailable`;
/// `fail_profile_updates` and `fail_team_updates` make those writes fail until cleared;
/// `slow_request_reads` stalls `get_request` well past any test timeout;
/// `lose_insert_ack` lets the next request insert land but reports it as failed.
pub struct FlakyRegistry {
    pub inner: InMemoryRegistry,
    pub transient_failures: AtomicU32,
    pub fail_profile_updates: AtomicBool,
    pub fail_team_updates: AtomicBool,
    pub slow_request_reads: AtomicBool,
    pub lose_insert_ack: AtomicBool,
    pub calls: AtomicU32,
}

impl FlakyRegistry {
    pub fn new(inner: InMemoryRegistry) -> Self {
        Self {
            inner,
            transient_failures: AtomicU32::new(0),
            fail_profile_updates: AtomicBool::new(false),
            fail_team_updates: AtomicBool::new(false),
            slow_request_reads: AtomicBool::new(false),
            lose_insert_ack: AtomicBool::new(false),
            calls: AtomicU32::new(0),
        }
    }

    fn trip(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let tripped = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if tripped {
            return Err(StoreError::Unavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl Registry for FlakyRegistry {
    async fn get_profile(&self, id: &str) -> Result<Versioned<Profile>, StoreError> {
        self.trip()?;
        self.inner.get_profile(id).await
    }

    async fn get_team(&self, id: &str) -> Result<Versioned<Team>, StoreError> {
        self.trip()?;
        self.inner.get_team(id).await
    }

    async fn get_request(&self, id: &str) -> Result<Versioned<CollabRequest>, StoreError> {
        self.trip()?;
        if self.slow_request_reads.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        self.inner.get_request(id).await
    }

    async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>, StoreError> {
        self.trip()?;
        self.inner.list_teams(filter).await
    }

    async fn list_mentors(&self) -> Result<Vec<Profile>, StoreError> {
        self.trip()?;
        self.inner.list_mentors().await
    }

    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<CollabRequest>, StoreError> {
        self.trip()?;
        self.inner.list_requests(filter).await
    }

    async fn insert_profile(&self, profile: Profile) -> Result<u64, StoreError> {
        self.trip()?;
        self.inner.insert_profile(profile).await
    }

    async fn insert_team(&self, team: Team) -> Result<u64, StoreError> {
        self.trip()?;
        self.inner.insert_team(team).await
    }

    async fn insert_request(&self, request: CollabRequest) -> Result<u64, StoreError> {
        self.trip()?;
        let version = self.inner.insert_request(request).await?;
        if self.lose_insert_ack.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Unavailable("connection reset after write".to_string()));
        }
        Ok(version)
    }

    async fn update_profile(&self, id: &str, expected_version: u64, profile: Profile) -> Result<u64, StoreError> {
        self.trip()?;
        if self.fail_profile_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("profile store down".to_string()));
        }
        self.inner.update_profile(id, expected_version, profile).await
    }

    async fn update_team(&self, id: &str, expected_version: u64, team: Team) -> Result<u64, StoreError> {
        self.trip()?;
        if self.fail_team_updates.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("team store down".to_string()));
        }
        self.inner.update_team(id, expected_version, team).await
    }

    async fn update_request(&self, id: &str, expected_version: u64, request: CollabRequest) -> Result<u64, StoreError> {
        self.trip()?;
        self.inner.update_request(id, expected_version, request).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gate {
    RequestReads,
    RequestListings,
}

/// Holds the first `gated` calls of one kind at a barrier so that concurrent callers all
/// observe the same state before any of them writes.
pub struct GatedRegistry {
    pub inner: InMemoryRegistry,
    gate: Gate,
    barrier: Barrier,
    gated: usize,
    reads: AtomicUsize,
}

impl GatedRegistry {
    pub fn new(inner: InMemoryRegistry, gated: usize) -> Self {
        Self::on(inner, Gate::RequestReads, gated)
    }

    pub fn on(inner: InMemoryRegistry, gate: Gate, gated: usize) -> Self {
        Self {
            inner,
            gate,
            barrier: Barrier::new(gated),
            gated,
            reads: AtomicUsize::new(0),
        }
    }

    async fn pass(&self, gate: Gate) {
        if gate == self.gate && self.reads.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait().await;
        }
    }
}

#[async_trait]
impl Registry for GatedRegistry {
    async fn get_profile(&self, id: &str) -> Result<Versioned<Profile>, StoreError> {
        self.inner.get_profile(id).await
    }

    async fn get_team(&self, id: &str) -> Result<Versioned<Team>, StoreError> {
        self.inner.get_team(id).await
    }

    async fn get_request(&self, id: &str) -> Result<Versioned<CollabRequest>, StoreError> {
        let result = self.inner.get_request(id).await;
        self.pass(Gate::RequestReads).await;
        result
    }

    async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>, StoreError> {
        self.inner.list_teams(filter).await
    }

    async fn list_mentors(&self) -> Result<Vec<Profile>, StoreError> {
        self.inner.list_mentors().await
    }

    async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<CollabRequest>, StoreError> {
        let result = self.inner.list_requests(filter).await;
        self.pass(Gate::RequestListings).await;
        result
    }

    async fn insert_profile(&self, profile: Profile) -> Result<u64, StoreError> {
        self.inner.insert_profile(profile).await
    }

    async fn insert_team(&self, team: Team) -> Result<u64, StoreError> {
        self.inner.insert_team(team).await
    }

    async fn insert_request(&self, request: CollabRequest) -> Result<u64, StoreError> {
        self.inner.insert_request(request).await
    }

    async fn update_profile(&self, id: &str, expected_version: u64, profile: Profile) -> Result<u64, StoreError> {
        self.inner.update_profile(id, expected_version, profile).await
    }

    async fn update_team(&self, id: &str, expected_version: u64, team: Team) -> Result<u64, StoreError> {
        self.inner.update_team(id, expected_version, team).await
    }

    async fn update_request(&self, id: &str, expected_version: u64, request: CollabRequest) -> Result<u64, StoreError> {
        self.inner.update_request(id, expected_version, request).await
    }
}
