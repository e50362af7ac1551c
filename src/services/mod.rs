pub mod match_ranker;
pub mod request_lifecycle;
pub mod score_engine;
pub mod skill_gap;
pub mod vectorizer;

pub use match_ranker::{rank_mentors_for_team, rank_teams_for_user, RankOptions};
pub use request_lifecycle::RequestLifecycle;
pub use score_engine::{ScoreCard, ScoreEngine};
pub use skill_gap::analyze_skill_gaps;
pub use vectorizer::{parse_skill_list, SkillVocabulary};
