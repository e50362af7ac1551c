// hacknect-service/src/services/match_ranker.rs
use crate::models::{MatchProfile, MatchResult, Profile, Team};
use crate::services::score_engine::ScoreEngine;
use log::debug;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankOptions {
    pub min_score: f64,
    pub limit: Option<usize>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            min_score: 0.0,
            limit: None,
        }
    }
}

pub fn rank_teams_for_user(
    engine: &ScoreEngine,
    user: &Profile,
    teams: &[Team],
    options: &RankOptions,
) -> Vec<MatchResult> {
    let subject = MatchProfile::from(user);
    let candidates: Vec<MatchProfile> = teams.iter().map(MatchProfile::from).collect();

    let ranked = rank(engine, &subject, &candidates, options);
    debug!(
        "Ranked {} of {} teams for user {}",
        ranked.len(),
        teams.len(),
        user.id
    );
    ranked
}

// Only profiles with the mentor role are considered
pub fn rank_mentors_for_team(
    engine: &ScoreEngine,
    team: &Team,
    mentors: &[Profile],
    options: &RankOptions,
) -> Vec<MatchResult> {
    let subject = MatchProfile::from(team);
    let candidates: Vec<MatchProfile> = mentors
        .iter()
        .filter(|p| p.is_mentor())
        .map(MatchProfile::from)
        .collect();

    let ranked = rank(engine, &subject, &candidates, options);
    debug!(
        "Ranked {} of {} mentor candidates for team {}",
        ranked.len(),
        mentors.len(),
        team.id
    );
    ranked
}

// Score descending, candidate id ascending on ties
fn rank(
    engine: &ScoreEngine,
    subject: &MatchProfile,
    candidates: &[MatchProfile],
    options: &RankOptions,
) -> Vec<MatchResult> {
    let mut results: Vec<MatchResult> = candidates
        .iter()
        .map(|candidate| {
            let card = engine.compute_score(subject, candidate);
            MatchResult {
                candidate_id: candidate.id.clone(),
                score: card.score,
                reasons: card.reasons,
                breakdown: card.breakdown,
            }
        })
        .filter(|result| result.score >= options.min_score)
        .collect();

    results.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.candidate_id.cmp(&b.candidate_id))
    });

    if let Some(limit) = options.limit {
        results.truncate(limit);
    }

    results
}
