// hacknect-service/src/services/score_engine.rs
use crate::models::{ExperienceLevel, MatchProfile, ScoreBreakdown};
use crate::services::vectorizer::SkillVocabulary;
use std::collections::BTreeSet;
use std::sync::Arc;

pub const SKILL_WEIGHT: f64 = 0.40;
pub const INTEREST_WEIGHT: f64 = 0.20;
pub const EXPERIENCE_WEIGHT: f64 = 0.25;
pub const AVAILABILITY_WEIGHT: f64 = 0.15;

// Interest similarity when neither side lists any interest
pub const NEUTRAL_INTEREST: f64 = 0.5;

// Widest ordinal spread: expert (5) - beginner (1)
const MAX_EXPERIENCE_SPREAD: f64 = 4.0;

const STRONG_SKILL_THRESHOLD: f64 = 0.7;
const COMPATIBLE_EXPERIENCE_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreCard {
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
}

/// Blends skill, interest, experience and availability into one compatibility score in [0, 1].
///
/// Pure and cheap to clone; safe to share across threads.
#[derive(Debug, Clone)]
pub struct ScoreEngine {
    vocabulary: Arc<SkillVocabulary>,
}

impl ScoreEngine {
    pub fn new(vocabulary: SkillVocabulary) -> Self {
        Self {
            vocabulary: Arc::new(vocabulary),
        }
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn skill_similarity(&self, a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
        let va = self.vocabulary.vectorize(a);
        let vb = self.vocabulary.vectorize(b);
        cosine_similarity(&va, &vb)
    }

    pub fn compute_score(&self, a: &MatchProfile, b: &MatchProfile) -> ScoreCard {
        let skill = self.skill_similarity(&a.skills, &b.skills);

        let interests_a = lowercase_set(&a.interests);
        let interests_b = lowercase_set(&b.interests);
        let interest = jaccard_similarity(&interests_a, &interests_b);

        let experience = experience_similarity(a.experience_level, b.experience_level);
        let availability = availability_score(a, b);

        let score = (SKILL_WEIGHT * skill
            + INTEREST_WEIGHT * interest
            + EXPERIENCE_WEIGHT * experience
            + AVAILABILITY_WEIGHT * availability)
            .clamp(0.0, 1.0);

        let mut reasons = Vec::new();
        if skill > STRONG_SKILL_THRESHOLD {
            reasons.push("strong skill alignment".to_string());
        }
        // BTreeSet iterates in lexicographic order, so the first common entry is the smallest
        if let Some(shared) = interests_a.intersection(&interests_b).next() {
            reasons.push(format!("shared interest in {}", shared));
        }
        if experience > COMPATIBLE_EXPERIENCE_THRESHOLD {
            reasons.push("compatible experience".to_string());
        }

        ScoreCard {
            score,
            breakdown: ScoreBreakdown {
                skill,
                interest,
                experience,
                availability,
            },
            reasons,
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(SkillVocabulary::default())
    }
}

// Zero when either vector has no magnitude
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.is_empty() || a.len() != b.len() {
        return 0.0;
    }

    let mag_a_sq: f64 = a.iter().map(|x| x * x).sum();
    let mag_b_sq: f64 = b.iter().map(|x| x * x).sum();
    if mag_a_sq == 0.0 || mag_b_sq == 0.0 {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    (dot / (mag_a_sq.sqrt() * mag_b_sq.sqrt())).clamp(0.0, 1.0)
}

// |A ∩ B| / |A ∪ B|, NEUTRAL_INTEREST when both are empty
pub fn jaccard_similarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return NEUTRAL_INTEREST;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / union as f64
}

pub fn experience_similarity(a: ExperienceLevel, b: ExperienceLevel) -> f64 {
    let spread = (f64::from(a.ordinal()) - f64::from(b.ordinal())).abs();
    (1.0 - spread / MAX_EXPERIENCE_SPREAD).clamp(0.0, 1.0)
}

// Placeholder bonus until availability windows are modelled
fn availability_score(_a: &MatchProfile, _b: &MatchProfile) -> f64 {
    1.0
}

fn lowercase_set(values: &BTreeSet<String>) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim().to_lowercase())
        .filter(|v| !v.is_empty())
        .collect()
}
