use crate::models::{Coverage, GapStatus, SkillGapReport};
use std::collections::{BTreeMap, HashSet};

// Coverage of a team's required skills by a member's current skills, ignoring case
pub fn analyze_skill_gaps(current_skills: &[String], required_skills: &[String]) -> SkillGapReport {
    let current: HashSet<String> = current_skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let mut seen = HashSet::new();
    let mut heatmap = BTreeMap::new();
    let mut missing_skills = Vec::new();
    let mut covered = 0usize;

    for skill in required_skills {
        let key = skill.trim().to_lowercase();
        if key.is_empty() || !seen.insert(key.clone()) {
            continue;
        }
        if current.contains(&key) {
            covered += 1;
            heatmap.insert(skill.trim().to_string(), Coverage::Covered);
        } else {
            missing_skills.push(skill.trim().to_string());
            heatmap.insert(skill.trim().to_string(), Coverage::Missing);
        }
    }

    let coverage_percent = if seen.is_empty() {
        100.0
    } else {
        ((covered as f64 / seen.len() as f64) * 1000.0).round() / 10.0
    };

    let status = if coverage_percent >= 80.0 {
        GapStatus::Strong
    } else if coverage_percent >= 50.0 {
        GapStatus::NeedsImprovement
    } else {
        GapStatus::Critical
    };

    SkillGapReport {
        missing_skills,
        coverage_percent,
        heatmap,
        status,
    }
}
