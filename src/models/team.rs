use crate::models::ServiceError;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum TeamStatus {
    #[display(fmt = "forming")]
    Forming,
    #[display(fmt = "recruiting")]
    Recruiting,
    #[display(fmt = "full")]
    Full,
    #[display(fmt = "completed")]
    Completed,
}

impl TeamStatus {
    // Teams that still accept join requests
    pub fn is_open(self) -> bool {
        matches!(self, TeamStatus::Forming | TeamStatus::Recruiting)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(deserialize_with = "crate::models::profile::deserialize_skills")]
    pub skills_needed: BTreeSet<String>,
    #[serde(default)]
    pub roles_needed: Vec<String>,
    #[serde(default)]
    pub project_idea: String,
    #[serde(default)]
    pub current_members: BTreeSet<String>,
    #[serde(default)]
    pub active_mentors: BTreeSet<String>,
    pub admin_id: String,
    pub status: TeamStatus,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Team {
    // The admin is always the first member
    pub fn new(id: &str, admin_id: &str, project_idea: &str) -> Self {
        let now = Utc::now();
        let mut current_members = BTreeSet::new();
        current_members.insert(admin_id.to_string());

        Self {
            id: id.to_string(),
            name: String::new(),
            skills_needed: BTreeSet::new(),
            roles_needed: Vec::new(),
            project_idea: project_idea.to_string(),
            current_members,
            active_mentors: BTreeSet::new(),
            admin_id: admin_id.to_string(),
            status: TeamStatus::Forming,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_skills_needed<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills_needed = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_member(&self, profile_id: &str) -> bool {
        self.current_members.contains(profile_id)
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Team id is required".to_string()));
        }
        if self.admin_id.trim().is_empty() {
            return Err(ServiceError::InvalidInput(format!(
                "Team {} has no admin",
                self.id
            )));
        }
        if self.skills_needed.iter().any(|s| s.trim().is_empty()) {
            return Err(ServiceError::InvalidInput(format!(
                "Team {} has a blank skill entry",
                self.id
            )));
        }
        Ok(())
    }
}
