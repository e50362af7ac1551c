// hacknect-service/src/utils/store_client.rs
use crate::models::{CollabRequest, Profile, Team};
use crate::utils::registry::{Registry, RequestFilter, StoreError, TeamFilter, Versioned};
use log::{error, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

// Timeout and retry budget for registry calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorePolicy {
    pub call_timeout: Duration,
    pub max_attempts: u32,
    pub base_backoff: Duration,
    // Bound on read-modify-write loops that keep losing to concurrent writers
    pub max_cas_attempts: u32,
}

impl StorePolicy {
    // base, 2x base, 4x base...
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_backoff.saturating_mul(factor)
    }
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_millis(2000),
            max_attempts: 3,
            base_backoff: Duration::from_millis(50),
            max_cas_attempts: 8,
        }
    }
}

/// Runs `call` under the policy timeout, retrying transient failures with exponential backoff.
///
/// Only `StoreError::Unavailable` and timeouts are retried. Once the budget is spent the last
/// failure is returned.
pub async fn with_store_retry<T, F, Fut>(
    policy: &StorePolicy,
    operation: &str,
    mut call: F,
) -> Result<T, StoreError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StoreError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let outcome = match timeout(policy.call_timeout, call()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Unavailable(format!(
                "{} timed out after {:?}",
                operation, policy.call_timeout
            ))),
        };

        match outcome {
            Err(StoreError::Unavailable(reason)) if attempt < attempts => {
                let delay = policy.backoff_for(attempt);
                warn!(
                    "⚠️ {} failed (attempt {}/{}): {}. Retrying in {:?}",
                    operation, attempt, attempts, reason, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(StoreError::Unavailable(reason)) => {
                error!("❌ {} failed after {} attempts: {}", operation, attempts, reason);
                return Err(StoreError::Unavailable(reason));
            }
            other => return other,
        }
    }
}

// Registry handle whose every call carries the timeout and retry policy
#[derive(Clone)]
pub struct RegistryClient {
    registry: Arc<dyn Registry>,
    policy: StorePolicy,
}

impl RegistryClient {
    pub fn new(registry: Arc<dyn Registry>, policy: StorePolicy) -> Self {
        Self { registry, policy }
    }

    pub fn policy(&self) -> &StorePolicy {
        &self.policy
    }

    pub async fn get_profile(&self, id: &str) -> Result<Versioned<Profile>, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "get_profile", move || registry.get_profile(id)).await
    }

    pub async fn get_team(&self, id: &str) -> Result<Versioned<Team>, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "get_team", move || registry.get_team(id)).await
    }

    pub async fn get_request(&self, id: &str) -> Result<Versioned<CollabRequest>, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "get_request", move || registry.get_request(id)).await
    }

    pub async fn list_teams(&self, filter: &TeamFilter) -> Result<Vec<Team>, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "list_teams", move || registry.list_teams(filter)).await
    }

    pub async fn list_mentors(&self) -> Result<Vec<Profile>, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "list_mentors", move || registry.list_mentors()).await
    }

    pub async fn list_requests(&self, filter: &RequestFilter) -> Result<Vec<CollabRequest>, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "list_requests", move || registry.list_requests(filter)).await
    }

    pub async fn insert_request(&self, request: &CollabRequest) -> Result<u64, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "insert_request", move || {
            registry.insert_request(request.clone())
        })
        .await
    }

    pub async fn update_profile(
        &self,
        id: &str,
        expected_version: u64,
        profile: &Profile,
    ) -> Result<u64, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "update_profile", move || {
            registry.update_profile(id, expected_version, profile.clone())
        })
        .await
    }

    pub async fn update_team(&self, id: &str, expected_version: u64, team: &Team) -> Result<u64, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "update_team", move || {
            registry.update_team(id, expected_version, team.clone())
        })
        .await
    }

    pub async fn update_request(
        &self,
        id: &str,
        expected_version: u64,
        request: &CollabRequest,
    ) -> Result<u64, StoreError> {
        let registry = self.registry.as_ref();
        with_store_retry(&self.policy, "update_request", move || {
            registry.update_request(id, expected_version, request.clone())
        })
        .await
    }
}
