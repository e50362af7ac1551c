// hacknect-service/src/models/profile.rs
use crate::models::ServiceError;
use crate::services::vectorizer::parse_skill_list;
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;

// Experience ordinal: beginner=1, intermediate=3, expert=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    #[display(fmt = "beginner")]
    Beginner,
    #[display(fmt = "intermediate")]
    Intermediate,
    #[display(fmt = "expert")]
    Expert,
}

impl ExperienceLevel {
    pub fn ordinal(self) -> u8 {
        match self {
            ExperienceLevel::Beginner => 1,
            ExperienceLevel::Intermediate => 3,
            ExperienceLevel::Expert => 5,
        }
    }
}

impl Default for ExperienceLevel {
    fn default() -> Self {
        ExperienceLevel::Intermediate
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[display(fmt = "participant")]
    Participant,
    #[display(fmt = "mentor")]
    Mentor,
    #[display(fmt = "organizer")]
    Organizer,
}

// Skills arrive either as a list or as the single free-text field filled in at onboarding
#[derive(Deserialize)]
#[serde(untagged)]
enum SkillField {
    Text(String),
    List(Vec<String>),
}

pub(crate) fn deserialize_skills<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match SkillField::deserialize(deserializer)? {
        SkillField::Text(text) => parse_skill_list(&text).into_iter().collect(),
        SkillField::List(skills) => skills.into_iter().collect(),
    })
}

// Participant, mentor or organizer profile
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub role: Role,
    #[serde(deserialize_with = "deserialize_skills")]
    pub skills: BTreeSet<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    pub experience_level: ExperienceLevel,
    // Team ids this mentor advises
    #[serde(default)]
    pub mentor_for: BTreeSet<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(id: &str, role: Role, experience_level: ExperienceLevel) -> Self {
        let now = Utc::now();
        Self {
            id: id.to_string(),
            name: String::new(),
            role,
            skills: BTreeSet::new(),
            interests: BTreeSet::new(),
            experience_level,
            mentor_for: BTreeSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skills = skills.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_interests<I, S>(mut self, interests: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.interests = interests.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_mentor(&self) -> bool {
        self.role == Role::Mentor
    }

    // Reject malformed profiles before they reach scoring or the store
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.id.trim().is_empty() {
            return Err(ServiceError::InvalidInput("Profile id is required".to_string()));
        }
        if self.skills.iter().any(|s| s.trim().is_empty()) {
            return Err(ServiceError::InvalidInput(format!(
                "Profile {} has a blank skill entry",
                self.id
            )));
        }
        Ok(())
    }
}
