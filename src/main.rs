//Third-party-dependencies
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use hacknect_service::routes::{self, AppState};
use hacknect_service::services::{RequestLifecycle, ScoreEngine};
use hacknect_service::utils::config::AppConfig;
use hacknect_service::utils::jwt::JwtKeys;
use hacknect_service::utils::registry::{InMemoryRegistry, Registry};
use hacknect_service::utils::store_client::RegistryClient;
use log::info;
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    let registry: Arc<dyn Registry> = match &config.seed_file {
        Some(path) => Arc::new(
            InMemoryRegistry::from_seed_file(path)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?,
        ),
        None => Arc::new(InMemoryRegistry::new()),
    };

    let state = web::Data::new(AppState {
        engine: ScoreEngine::new(config.vocabulary.clone()),
        rank_options: config.rank_options,
        lifecycle: RequestLifecycle::new(RegistryClient::new(registry, config.store_policy)),
    });
    let keys = web::Data::new(JwtKeys::from_secret(&config.jwt_secret));

    info!(
        "Server started at {} ({} vocabulary terms)",
        config.address,
        config.vocabulary.len()
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(keys.clone())
            .app_data(routes::json_config())
            .configure(routes::init_routes)
    })
    .bind(&config.address)?
    .run()
    .await
}
