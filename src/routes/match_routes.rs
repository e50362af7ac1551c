// src/routes/match_routes.rs
use crate::models::{MatchMentorsRequest, MatchUserRequest, ServiceError, SkillGapRequest};
use crate::routes::AppState;
use crate::services::{analyze_skill_gaps, rank_mentors_for_team, rank_teams_for_user};
use crate::utils::registry::TeamFilter;
use actix_web::{get, post, web, HttpResponse};
use log::{error, info};

// Rank a caller-supplied pool of teams for a user
#[post("/match/user-to-teams")]
async fn match_user_to_teams(
    state: web::Data<AppState>,
    data: web::Json<MatchUserRequest>,
) -> Result<HttpResponse, ServiceError> {
    let MatchUserRequest { user, teams } = data.into_inner();

    info!("🔍 Ranking {} teams for user: {}", teams.len(), user.id);

    user.validate()?;
    for team in &teams {
        team.validate()?;
    }

    let matches = rank_teams_for_user(&state.engine, &user, &teams, &state.rank_options);

    info!("✅ Returning {} team matches for user: {}", matches.len(), user.id);
    Ok(HttpResponse::Ok().json(matches))
}

// Rank a caller-supplied pool of mentors for a team
#[post("/match/team-to-mentors")]
async fn match_team_to_mentors(
    state: web::Data<AppState>,
    data: web::Json<MatchMentorsRequest>,
) -> Result<HttpResponse, ServiceError> {
    let MatchMentorsRequest { team, mentors } = data.into_inner();

    info!("🔍 Ranking {} mentor candidates for team: {}", mentors.len(), team.id);

    team.validate()?;
    for mentor in &mentors {
        mentor.validate()?;
    }

    let matches = rank_mentors_for_team(&state.engine, &team, &mentors, &state.rank_options);

    info!("✅ Returning {} mentor matches for team: {}", matches.len(), team.id);
    Ok(HttpResponse::Ok().json(matches))
}

// Rank the registry's open teams for a stored profile
#[get("/users/{user_id}/matches")]
async fn get_user_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = path.into_inner();
    let store = state.lifecycle.store();

    info!("🔍 Fetching team matches for user: {}", user_id);

    let user = store.get_profile(&user_id).await.map_err(|e| {
        error!("❌ Failed to load profile {}: {}", user_id, e);
        ServiceError::from(e)
    })?;
    let teams = store.list_teams(&TeamFilter::open_for(&user_id)).await?;

    let matches = rank_teams_for_user(&state.engine, &user.value, &teams, &state.rank_options);

    info!("✅ Found {} team matches for user: {}", matches.len(), user_id);
    Ok(HttpResponse::Ok().json(matches))
}

// Rank the registry's mentors for a stored team
#[get("/teams/{team_id}/mentor-matches")]
async fn get_team_mentor_matches(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let team_id = path.into_inner();
    let store = state.lifecycle.store();

    info!("🔍 Fetching mentor matches for team: {}", team_id);

    let team = store.get_team(&team_id).await.map_err(|e| {
        error!("❌ Failed to load team {}: {}", team_id, e);
        ServiceError::from(e)
    })?;
    let mentors = store.list_mentors().await?;

    let matches = rank_mentors_for_team(&state.engine, &team.value, &mentors, &state.rank_options);

    info!("✅ Found {} mentor matches for team: {}", matches.len(), team_id);
    Ok(HttpResponse::Ok().json(matches))
}

#[post("/analyze/skills")]
async fn analyze_skills(data: web::Json<SkillGapRequest>) -> Result<HttpResponse, ServiceError> {
    info!(
        "📊 Analyzing skill gaps: {} current vs {} required",
        data.current_skills.len(),
        data.required_skills.len()
    );

    let report = analyze_skill_gaps(&data.current_skills, &data.required_skills);

    Ok(HttpResponse::Ok().json(report))
}

// Register all matching routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(match_user_to_teams)
        .service(match_team_to_mentors)
        .service(get_user_matches)
        .service(get_team_mentor_matches)
        .service(analyze_skills);
}
