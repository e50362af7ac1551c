// hacknect-service/src/utils/config.rs
use crate::services::match_ranker::RankOptions;
use crate::services::vectorizer::SkillVocabulary;
use crate::utils::store_client::StorePolicy;
use log::warn;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_ADDRESS: &str = "127.0.0.1:9090";
const DEFAULT_JWT_SECRET: &str = "hacknect_dev_secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub address: String,
    pub jwt_secret: String,
    pub vocabulary: SkillVocabulary,
    pub rank_options: RankOptions,
    pub store_policy: StorePolicy,
    pub seed_file: Option<String>,
}

impl AppConfig {
    // Environment (and .env) with defaults for anything unset
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = StorePolicy::default();

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set, using development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let vocabulary = match lookup("SKILL_VOCABULARY") {
            Some(list) if !list.trim().is_empty() => SkillVocabulary::new(list.split(',')),
            _ => SkillVocabulary::default(),
        };

        let min_score = parse_or(&lookup, "MATCH_MIN_SCORE", 0.0f64).clamp(0.0, 1.0);
        let limit = lookup("MATCH_LIMIT").and_then(|raw| match raw.trim().parse::<usize>() {
            Ok(limit) => Some(limit),
            Err(_) => {
                warn!("Ignoring invalid MATCH_LIMIT: {}", raw);
                None
            }
        });

        let store_policy = StorePolicy {
            call_timeout: Duration::from_millis(parse_or(
                &lookup,
                "STORE_CALL_TIMEOUT_MS",
                defaults.call_timeout.as_millis() as u64,
            )),
            max_attempts: parse_or(&lookup, "STORE_MAX_ATTEMPTS", defaults.max_attempts).max(1),
            base_backoff: Duration::from_millis(parse_or(
                &lookup,
                "STORE_BASE_BACKOFF_MS",
                defaults.base_backoff.as_millis() as u64,
            )),
            max_cas_attempts: parse_or(&lookup, "STORE_MAX_CAS_ATTEMPTS", defaults.max_cas_attempts)
                .max(1),
        };

        Self {
            address: lookup("SERVER_ADDRESS").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            jwt_secret,
            vocabulary,
            rank_options: RankOptions { min_score, limit },
            store_policy,
            seed_file: lookup("SEED_FILE").filter(|path| !path.trim().is_empty()),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}: {}", key, raw);
            default
        }),
        None => default,
    }
}
