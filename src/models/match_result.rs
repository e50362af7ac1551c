use crate::models::{ExperienceLevel, Profile, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// Scoring view shared by profiles and teams
#[derive(Debug, Clone, PartialEq)]
pub struct MatchProfile {
    pub id: String,
    pub skills: BTreeSet<String>,
    pub interests: BTreeSet<String>,
    pub experience_level: ExperienceLevel,
}

impl From<&Profile> for MatchProfile {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id.clone(),
            skills: profile.skills.clone(),
            interests: profile.interests.clone(),
            experience_level: profile.experience_level,
        }
    }
}

// Teams are scored on what they need, with the project idea as their only interest
impl From<&Team> for MatchProfile {
    fn from(team: &Team) -> Self {
        let mut interests = BTreeSet::new();
        if !team.project_idea.trim().is_empty() {
            interests.insert(team.project_idea.clone());
        }

        Self {
            id: team.id.clone(),
            skills: team.skills_needed.clone(),
            interests,
            experience_level: ExperienceLevel::Intermediate,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub skill: f64,
    pub interest: f64,
    pub experience: f64,
    pub availability: f64,
}

// Ephemeral ranking entry, never persisted
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub candidate_id: String,
    pub score: f64,
    pub reasons: Vec<String>,
    pub breakdown: ScoreBreakdown,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MatchUserRequest {
    pub user: Profile,
    #[serde(default)]
    pub teams: Vec<Team>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct MatchMentorsRequest {
    pub team: Team,
    #[serde(default)]
    pub mentors: Vec<Profile>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SkillGapRequest {
    pub current_skills: Vec<String>,
    pub required_skills: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Coverage {
    Covered,
    Missing,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum GapStatus {
    Strong,
    NeedsImprovement,
    Critical,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SkillGapReport {
    pub missing_skills: Vec<String>,
    pub coverage_percent: f64,
    pub heatmap: std::collections::BTreeMap<String, Coverage>,
    pub status: GapStatus,
}
