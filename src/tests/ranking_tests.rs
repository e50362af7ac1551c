use crate::models::{ExperienceLevel, Role, TeamStatus};
use crate::services::{rank_mentors_for_team, rank_teams_for_user, RankOptions, ScoreEngine};
use crate::tests::support::{profile, team};

#[test]
fn empty_pool_yields_empty_ranking() {
    let engine = ScoreEngine::default();
    let user = profile("u", Role::Participant, ExperienceLevel::Beginner, &["Python"], &[]);
    let t = team("t", "admin", &["Python"], "", TeamStatus::Forming);

    assert!(rank_teams_for_user(&engine, &user, &[], &RankOptions::default()).is_empty());
    assert!(rank_mentors_for_team(&engine, &t, &[], &RankOptions::default()).is_empty());
}

#[test]
fn teams_are_sorted_by_descending_score() {
    let engine = ScoreEngine::default();
    let user = profile("u", Role::Participant, ExperienceLevel::Intermediate, &["Python", "FastAPI"], &["ai/ml"]);
    let teams = vec![
        team("weak", "a1", &["Figma"], "gaming", TeamStatus::Forming),
        team("strong", "a2", &["Python", "FastAPI"], "ai/ml", TeamStatus::Recruiting),
        team("partial", "a3", &["Python", "Docker"], "fintech", TeamStatus::Forming),
    ];

    let ranked = rank_teams_for_user(&engine, &user, &teams, &RankOptions::default());

    let ids: Vec<&str> = ranked.iter().map(|m| m.candidate_id.as_str()).collect();
    assert_eq!(ids, vec!["strong", "partial", "weak"]);
    assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
    assert!(ranked[0].reasons.contains(&"strong skill alignment".to_string()));
}

#[test]
fn ranking_is_deterministic_with_id_tie_break() {
    let engine = ScoreEngine::default();
    let user = profile("u", Role::Participant, ExperienceLevel::Expert, &["Go"], &[]);
    let teams = vec![
        team("team-c", "a", &["Go"], "", TeamStatus::Forming),
        team("team-a", "a", &["Go"], "", TeamStatus::Forming),
        team("team-b", "a", &["Go"], "", TeamStatus::Forming),
    ];

    let first = rank_teams_for_user(&engine, &user, &teams, &RankOptions::default());
    let second = rank_teams_for_user(&engine, &user, &teams, &RankOptions::default());

    assert_eq!(first, second);
    let ids: Vec<&str> = first.iter().map(|m| m.candidate_id.as_str()).collect();
    assert_eq!(ids, vec!["team-a", "team-b", "team-c"]);
}

#[test]
fn only_mentors_are_ranked_for_a_team() {
    let engine = ScoreEngine::default();
    let t = team("t", "admin", &["Python", "Machine Learning"], "healthtech", TeamStatus::Recruiting);
    let pool = vec![
        profile("participant", Role::Participant, ExperienceLevel::Expert, &["Python", "Machine Learning"], &[]),
        profile("m-design", Role::Mentor, ExperienceLevel::Expert, &["Figma"], &[]),
        profile("m-ml", Role::Mentor, ExperienceLevel::Intermediate, &["Python", "Machine Learning"], &["HealthTech"]),
        profile("organizer", Role::Organizer, ExperienceLevel::Expert, &["Python"], &[]),
    ];

    let ranked = rank_mentors_for_team(&engine, &t, &pool, &RankOptions::default());

    let ids: Vec<&str> = ranked.iter().map(|m| m.candidate_id.as_str()).collect();
    assert_eq!(ids, vec!["m-ml", "m-design"]);
}

#[test]
fn options_filter_and_truncate() {
    let engine = ScoreEngine::default();
    let user = profile("u", Role::Participant, ExperienceLevel::Intermediate, &["Python"], &[]);
    let teams = vec![
        team("t1", "a", &["Python"], "", TeamStatus::Forming),
        team("t2", "a", &["Python", "React"], "", TeamStatus::Forming),
        team("t3", "a", &["Figma"], "", TeamStatus::Forming),
    ];

    let options = RankOptions {
        min_score: 0.6,
        limit: None,
    };
    let ranked = rank_teams_for_user(&engine, &user, &teams, &options);
    // t3 shares no skill and lands at 0.5
    assert_eq!(ranked.len(), 2);
    assert!(ranked.iter().all(|m| m.score >= 0.6));
    assert!(!ranked.iter().any(|m| m.candidate_id == "t3"));

    let limited = rank_teams_for_user(
        &engine,
        &user,
        &teams,
        &RankOptions {
            min_score: 0.0,
            limit: Some(1),
        },
    );
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].candidate_id, "t1");
}
