use crate::models::ServiceError;
use crate::routes::AppState;
use crate::utils::AuthenticatedUser;
use actix_web::{get, post, web, HttpResponse};
use log::{error, info};
use serde_json::json;

// Get a specific team by ID
#[get("/teams/{team_id}")]
async fn get_team(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    info!("🔍 Fetching team: {}", team_id);

    let team = state.lifecycle.store().get_team(&team_id).await.map_err(|e| {
        error!("❌ Team not found or unavailable: {} ({})", team_id, e);
        ServiceError::from(e)
    })?;

    Ok(HttpResponse::Ok().json(team.value))
}

// Remove the caller from a team
#[post("/teams/{team_id}/leave")]
async fn leave_team(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();

    info!("🗑️ Removing user: {} from team: {}", user.user_id, team_id);

    let team = state.lifecycle.leave_team(&team_id, &user.user_id).await.map_err(|e| {
        error!("❌ Failed to leave team {}: {}", team_id, e);
        e
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Left team successfully",
        "user_id": user.user_id,
        "team_id": team.id,
        "current_members": team.current_members,
    })))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(get_team).service(leave_team);
}
