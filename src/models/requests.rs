// hacknect-service/src/models/requests.rs
use crate::models::ServiceError;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

pub const MAX_MESSAGE_LEN: usize = 1000;

// Request status. Everything except Pending is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[display(fmt = "pending")]
    Pending,
    #[display(fmt = "accepted")]
    Accepted,
    #[display(fmt = "rejected")]
    Rejected,
    #[display(fmt = "cancelled")]
    Cancelled,
}

impl RequestStatus {
    pub fn is_terminal(self) -> bool {
        self != RequestStatus::Pending
    }

    // Validates a move from `self` to `next`.
    // Repeating the terminal status a request already has means another caller got there first.
    pub fn transition(self, next: RequestStatus) -> Result<RequestStatus, ServiceError> {
        match (self, next) {
            (from, RequestStatus::Pending) => Err(ServiceError::InvalidStateTransition {
                from,
                to: RequestStatus::Pending,
            }),
            (from, to) if !from.is_terminal() => Ok(to),
            (from, to) if from == to => Err(ServiceError::Conflict(format!(
                "Request is already {}",
                from
            ))),
            (from, to) => Err(ServiceError::InvalidStateTransition { from, to }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    // from_id is the applicant, to_admin_id the team admin
    #[display(fmt = "join")]
    Join,
    // from_id is the team admin, to_admin_id the mentor
    #[display(fmt = "mentorship")]
    Mentorship,
}

// A membership mutation applied once a request is accepted. Each one is a set-union.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipEffect {
    AddTeamMember { team_id: String, member_id: String },
    AddTeamMentor { team_id: String, mentor_id: String },
    AddMentoredTeam { mentor_id: String, team_id: String },
}

// Join or mentorship request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CollabRequest {
    pub id: String,
    pub kind: RequestKind,
    pub from_id: String,
    pub target_team_id: String,
    pub to_admin_id: String,
    #[serde(default)]
    pub role_applying_for: Option<String>,
    #[serde(default)]
    pub message: String,
    pub status: RequestStatus,
    // Unique token of the write that took the request out of pending
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CollabRequest {
    fn new(
        kind: RequestKind,
        from_id: &str,
        target_team_id: &str,
        to_admin_id: &str,
        role_applying_for: Option<String>,
        message: &str,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            from_id: from_id.to_string(),
            target_team_id: target_team_id.to_string(),
            to_admin_id: to_admin_id.to_string(),
            role_applying_for,
            message: message.to_string(),
            status: RequestStatus::Pending,
            resolution_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_join(
        applicant_id: &str,
        team_id: &str,
        team_admin_id: &str,
        role_applying_for: Option<String>,
        message: &str,
    ) -> Self {
        Self::new(
            RequestKind::Join,
            applicant_id,
            team_id,
            team_admin_id,
            role_applying_for,
            message,
        )
    }

    pub fn new_mentorship(team_admin_id: &str, team_id: &str, mentor_id: &str, message: &str) -> Self {
        Self::new(
            RequestKind::Mentorship,
            team_admin_id,
            team_id,
            mentor_id,
            None,
            message,
        )
    }

    // Deterministic id for the n-th request of this (kind, team, sender)
    pub fn in_slot(mut self, slot: usize) -> Self {
        self.id = format!("{}:{}:{}:{}", self.kind, self.target_team_id, self.from_id, slot);
        self
    }

    // Side effects that an accepted request must eventually have applied
    pub fn acceptance_effects(&self) -> Vec<MembershipEffect> {
        match self.kind {
            RequestKind::Join => vec![MembershipEffect::AddTeamMember {
                team_id: self.target_team_id.clone(),
                member_id: self.from_id.clone(),
            }],
            RequestKind::Mentorship => vec![
                MembershipEffect::AddTeamMentor {
                    team_id: self.target_team_id.clone(),
                    mentor_id: self.to_admin_id.clone(),
                },
                MembershipEffect::AddMentoredTeam {
                    mentor_id: self.to_admin_id.clone(),
                    team_id: self.target_team_id.clone(),
                },
            ],
        }
    }

    // Accept/reject belongs to the target, cancel to the sender
    pub fn may_resolve(&self, actor_id: &str, next: RequestStatus) -> bool {
        match next {
            RequestStatus::Accepted | RequestStatus::Rejected => self.to_admin_id == actor_id,
            RequestStatus::Cancelled => self.from_id == actor_id,
            RequestStatus::Pending => false,
        }
    }
}

// Shared by every request kind stored by the registry
pub trait Lifecycle {
    fn status(&self) -> RequestStatus;
    fn set_status(&mut self, status: RequestStatus, at: DateTime<Utc>);

    fn apply_transition(&mut self, next: RequestStatus) -> Result<(), ServiceError> {
        let status = self.status().transition(next)?;
        self.set_status(status, Utc::now());
        Ok(())
    }
}

impl Lifecycle for CollabRequest {
    fn status(&self) -> RequestStatus {
        self.status
    }

    fn set_status(&mut self, status: RequestStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = at;
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateJoinRequest {
    pub team_id: String,
    #[serde(default)]
    pub role_applying_for: Option<String>,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateMentorshipRequest {
    pub team_id: String,
    pub mentor_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ResolveRequest {
    pub status: RequestStatus,
}

// Response when a request is resolved
#[derive(Serialize, Deserialize, Debug)]
pub struct RequestResponse {
    pub id: String,
    pub status: RequestStatus,
    pub message: String,
}
