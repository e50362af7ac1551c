// src/routes/mod.rs
use crate::models::ServiceError;
use crate::services::{RankOptions, RequestLifecycle, ScoreEngine};
use actix_web::web;

pub mod match_routes;
pub mod request_routes;
pub mod team_routes;

// Shared handler state
pub struct AppState {
    pub engine: ScoreEngine,
    pub rank_options: RankOptions,
    pub lifecycle: RequestLifecycle,
}

// Malformed JSON bodies become InvalidInput instead of actix's plain-text 400
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ServiceError::InvalidInput(err.to_string()).into())
}

// Register every route module
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    match_routes::init_routes(cfg);
    request_routes::init_routes(cfg);
    team_routes::init_routes(cfg);
}
