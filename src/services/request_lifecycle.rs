// hacknect-service/src/services/request_lifecycle.rs
use crate::models::{
    CollabRequest, Lifecycle, MembershipEffect, Profile, RequestKind, RequestStatus,
    ServiceError, Team, MAX_MESSAGE_LEN,
};
use crate::utils::registry::{RequestFilter, StoreError, Versioned};
use crate::utils::store_client::RegistryClient;
use chrono::Utc;
use log::{debug, error, info, warn};
use uuid::Uuid;

/// State machine over join and mentorship requests.
///
/// Every write is optimistic: read the current version, write only if it is unchanged.
/// A request leaves `pending` exactly once, and membership side effects run only for the
/// caller whose status write landed. Membership mutations are set-unions, so re-running them
/// is harmless; that is what lets a half-applied mentorship acceptance converge through
/// [`RequestLifecycle::reapply_side_effects`].
#[derive(Clone)]
pub struct RequestLifecycle {
    store: RegistryClient,
}

impl RequestLifecycle {
    pub fn new(store: RegistryClient) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &RegistryClient {
        &self.store
    }

    pub async fn create_join_request(
        &self,
        applicant_id: &str,
        team_id: &str,
        role_applying_for: Option<String>,
        message: &str,
    ) -> Result<CollabRequest, ServiceError> {
        require_id("applicant id", applicant_id)?;
        require_id("team id", team_id)?;
        validate_message(message)?;

        self.store.get_profile(applicant_id).await?;
        let team = self.store.get_team(team_id).await?.value;

        if !team.status.is_open() {
            return Err(ServiceError::InvalidInput(format!(
                "Team {} is {} and not accepting members",
                team.id, team.status
            )));
        }
        if team.is_member(applicant_id) {
            return Err(ServiceError::InvalidInput(
                "User is already a member of the team".to_string(),
            ));
        }

        let slot = self.next_slot(applicant_id, team_id, RequestKind::Join).await?;

        let request = CollabRequest::new_join(
            applicant_id,
            &team.id,
            &team.admin_id,
            role_applying_for.filter(|r| !r.trim().is_empty()),
            message,
        )
        .in_slot(slot);
        self.insert_request(&request).await?;

        info!("✅ Join request created: {} ({} -> team {})", request.id, applicant_id, team_id);
        Ok(request)
    }

    // Sent by the team admin to a mentor
    pub async fn create_mentorship_request(
        &self,
        requester_id: &str,
        team_id: &str,
        mentor_id: &str,
        message: &str,
    ) -> Result<CollabRequest, ServiceError> {
        require_id("requester id", requester_id)?;
        require_id("team id", team_id)?;
        require_id("mentor id", mentor_id)?;
        validate_message(message)?;

        let team = self.store.get_team(team_id).await?.value;
        if team.admin_id != requester_id {
            error!("❌ User {} is not the admin of team {}", requester_id, team_id);
            return Err(ServiceError::Forbidden);
        }

        let mentor = self.store.get_profile(mentor_id).await?.value;
        if !mentor.is_mentor() {
            return Err(ServiceError::InvalidInput(format!(
                "Profile {} is not a mentor",
                mentor_id
            )));
        }
        if team.active_mentors.contains(mentor_id) {
            return Err(ServiceError::InvalidInput(format!(
                "{} already mentors team {}",
                mentor_id, team_id
            )));
        }

        let slot = self.next_slot(requester_id, team_id, RequestKind::Mentorship).await?;

        let request = CollabRequest::new_mentorship(requester_id, &team.id, mentor_id, message)
            .in_slot(slot);
        self.insert_request(&request).await?;

        info!("✅ Mentorship request created: {} (team {} -> {})", request.id, team_id, mentor_id);
        Ok(request)
    }

    /// Moves a pending request to `next` on behalf of `actor_id`.
    ///
    /// Errors: `InvalidStateTransition` when the request is already terminal with a different
    /// status, `Conflict` when another caller resolved it first (including a race lost at the
    /// guarded write), `Forbidden` when the actor may not make this move.
    pub async fn resolve(
        &self,
        request_id: &str,
        actor_id: &str,
        next: RequestStatus,
    ) -> Result<CollabRequest, ServiceError> {
        require_id("request id", request_id)?;
        require_id("actor id", actor_id)?;
        if next == RequestStatus::Pending {
            return Err(ServiceError::InvalidInput(
                "Target status must be accepted, rejected or cancelled".to_string(),
            ));
        }

        let current = self.store.get_request(request_id).await?;
        if !current.value.may_resolve(actor_id, next) {
            error!("❌ User {} may not mark request {} as {}", actor_id, request_id, next);
            return Err(ServiceError::Forbidden);
        }

        let mut updated = current.value.clone();
        if let Err(err) = updated.apply_transition(next) {
            warn!("⚠️ Request {} rejected transition to {}: {}", request_id, next, err);
            return Err(err);
        }
        updated.resolution_id = Some(Uuid::new_v4().to_string());

        self.write_status(&current, &updated).await?;
        info!("🔄 Request {} moved {} -> {} by {}", request_id, current.value.status, next, actor_id);

        if next == RequestStatus::Accepted {
            self.apply_effects(&updated).await?;
        }

        Ok(updated)
    }

    // Re-runs the membership mutations of an accepted request; used to finish a partial apply
    pub async fn reapply_side_effects(
        &self,
        request_id: &str,
        actor_id: &str,
    ) -> Result<CollabRequest, ServiceError> {
        require_id("request id", request_id)?;

        let request = self.store.get_request(request_id).await?.value;
        if request.to_admin_id != actor_id {
            return Err(ServiceError::Forbidden);
        }
        if request.status != RequestStatus::Accepted {
            return Err(ServiceError::InvalidStateTransition {
                from: request.status,
                to: RequestStatus::Accepted,
            });
        }

        self.apply_effects(&request).await?;
        info!("✅ Side effects reapplied for request {}", request_id);
        Ok(request)
    }

    // The admin cannot leave; leaving a team you are not in is a no-op
    pub async fn leave_team(&self, team_id: &str, member_id: &str) -> Result<Team, ServiceError> {
        require_id("team id", team_id)?;
        require_id("member id", member_id)?;

        let team = self.store.get_team(team_id).await?.value;
        if team.admin_id == member_id {
            return Err(ServiceError::InvalidInput(
                "The team admin cannot leave the team".to_string(),
            ));
        }

        let (team, changed) = self
            .mutate_team(team_id, |team| team.current_members.remove(member_id))
            .await?;
        if changed {
            info!("👋 {} left team {}", member_id, team_id);
        }
        Ok(team)
    }

    pub async fn inbox(&self, user_id: &str, pending_only: bool) -> Result<Vec<CollabRequest>, ServiceError> {
        let filter = RequestFilter {
            to_admin_id: Some(user_id.to_string()),
            status: if pending_only { Some(RequestStatus::Pending) } else { None },
            ..RequestFilter::default()
        };
        Ok(self.store.list_requests(&filter).await?)
    }

    pub async fn sent(&self, user_id: &str) -> Result<Vec<CollabRequest>, ServiceError> {
        let filter = RequestFilter {
            from_id: Some(user_id.to_string()),
            ..RequestFilter::default()
        };
        Ok(self.store.list_requests(&filter).await?)
    }

    // Requests of one (from, team, kind) are numbered 0, 1, 2... and the number is part of the
    // id, so two creators racing for the same slot collide on the insert guard.
    async fn next_slot(
        &self,
        from_id: &str,
        team_id: &str,
        kind: RequestKind,
    ) -> Result<usize, ServiceError> {
        let filter = RequestFilter {
            from_id: Some(from_id.to_string()),
            team_id: Some(team_id.to_string()),
            kind: Some(kind),
            ..RequestFilter::default()
        };
        let previous = self.store.list_requests(&filter).await?;
        if previous.iter().any(|r| r.status == RequestStatus::Pending) {
            return Err(ServiceError::Conflict(format!(
                "A pending {} request for this team already exists",
                kind
            )));
        }
        Ok(previous.len())
    }

    // An id that already exists is either our own insert that landed before a retry, or a
    // concurrent creator that took the slot first.
    async fn insert_request(&self, request: &CollabRequest) -> Result<(), ServiceError> {
        match self.store.insert_request(request).await {
            Ok(_) => Ok(()),
            Err(StoreError::VersionMismatch { .. }) => {
                let stored = self.store.get_request(&request.id).await?;
                if stored.value == *request {
                    debug!("Insert of request {} had already landed", request.id);
                    return Ok(());
                }
                warn!("⚠️ Request slot {} was taken concurrently", request.id);
                Err(ServiceError::Conflict(format!(
                    "A pending {} request for this team already exists",
                    request.kind
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    // Guarded status write. A stale version means someone else resolved the request first,
    // unless the stored resolution is ours (a retried write that had already landed).
    async fn write_status(
        &self,
        current: &Versioned<CollabRequest>,
        updated: &CollabRequest,
    ) -> Result<(), ServiceError> {
        match self
            .store
            .update_request(&updated.id, current.version, updated)
            .await
        {
            Ok(_) => Ok(()),
            Err(StoreError::VersionMismatch { .. }) => {
                let stored = self.store.get_request(&updated.id).await?;
                if stored.value.resolution_id.is_some()
                    && stored.value.resolution_id == updated.resolution_id
                {
                    return Ok(());
                }
                warn!(
                    "⚠️ Request {} was resolved concurrently (now {})",
                    updated.id, stored.value.status
                );
                Err(ServiceError::Conflict(format!(
                    "Request {} was already resolved",
                    updated.id
                )))
            }
            Err(err) => Err(err.into()),
        }
    }

    // Every effect is attempted even when an earlier one fails; the first failure is returned
    async fn apply_effects(&self, request: &CollabRequest) -> Result<(), ServiceError> {
        let mut first_error = None;
        for effect in request.acceptance_effects() {
            if let Err(err) = self.apply_effect(&effect).await {
                error!(
                    "❌ Request {} is accepted but {:?} failed: {}. Reapply side effects to converge",
                    request.id, effect, err
                );
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn apply_effect(&self, effect: &MembershipEffect) -> Result<(), ServiceError> {
        let changed = match effect {
            MembershipEffect::AddTeamMember { team_id, member_id } => {
                self.mutate_team(team_id, |team| team.current_members.insert(member_id.clone()))
                    .await?
                    .1
            }
            MembershipEffect::AddTeamMentor { team_id, mentor_id } => {
                self.mutate_team(team_id, |team| team.active_mentors.insert(mentor_id.clone()))
                    .await?
                    .1
            }
            MembershipEffect::AddMentoredTeam { mentor_id, team_id } => {
                self.mutate_profile(mentor_id, |profile| profile.mentor_for.insert(team_id.clone()))
                    .await?
                    .1
            }
        };

        if !changed {
            debug!("{:?} already applied", effect);
        }
        Ok(())
    }

    // Read-modify-write on a team. `mutation` returns false when there is nothing to change.
    async fn mutate_team<F>(&self, team_id: &str, mutation: F) -> Result<(Team, bool), ServiceError>
    where
        F: Fn(&mut Team) -> bool,
    {
        for attempt in 1..=self.store.policy().max_cas_attempts.max(1) {
            let current = self.store.get_team(team_id).await?;
            let mut team = current.value;
            if !mutation(&mut team) {
                return Ok((team, false));
            }
            team.updated_at = Utc::now();

            match self.store.update_team(team_id, current.version, &team).await {
                Ok(_) => return Ok((team, true)),
                Err(StoreError::VersionMismatch { .. }) => {
                    debug!("Team {} changed underneath us (attempt {}), re-reading", team_id, attempt);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ServiceError::StoreUnavailable(format!(
            "Team {} kept changing; gave up after {} attempts",
            team_id,
            self.store.policy().max_cas_attempts
        )))
    }

    async fn mutate_profile<F>(
        &self,
        profile_id: &str,
        mutation: F,
    ) -> Result<(Profile, bool), ServiceError>
    where
        F: Fn(&mut Profile) -> bool,
    {
        for attempt in 1..=self.store.policy().max_cas_attempts.max(1) {
            let current = self.store.get_profile(profile_id).await?;
            let mut profile = current.value;
            if !mutation(&mut profile) {
                return Ok((profile, false));
            }
            profile.updated_at = Utc::now();

            match self.store.update_profile(profile_id, current.version, &profile).await {
                Ok(_) => return Ok((profile, true)),
                Err(StoreError::VersionMismatch { .. }) => {
                    debug!("Profile {} changed underneath us (attempt {}), re-reading", profile_id, attempt);
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ServiceError::StoreUnavailable(format!(
            "Profile {} kept changing; gave up after {} attempts",
            profile_id,
            self.store.policy().max_cas_attempts
        )))
    }
}

fn require_id(field: &str, value: &str) -> Result<(), ServiceError> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_message(message: &str) -> Result<(), ServiceError> {
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(ServiceError::InvalidInput(format!(
            "Message exceeds {} characters",
            MAX_MESSAGE_LEN
        )));
    }
    Ok(())
}
