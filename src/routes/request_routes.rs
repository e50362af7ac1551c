// src/routes/request_routes.rs
use crate::models::{
    CreateJoinRequest, CreateMentorshipRequest, RequestResponse, RequestStatus, ResolveRequest,
    ServiceError,
};
use crate::routes::AppState;
use crate::utils::AuthenticatedUser;
use actix_web::{get, post, put, web, HttpResponse};
use log::{error, info};
use serde::Deserialize;

#[derive(Deserialize, Debug)]
struct InboxQuery {
    #[serde(default)]
    pending_only: bool,
}

// Apply to join a team
#[post("/requests/join")]
async fn create_join_request(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    data: web::Json<CreateJoinRequest>,
) -> Result<HttpResponse, ServiceError> {
    let CreateJoinRequest {
        team_id,
        role_applying_for,
        message,
    } = data.into_inner();

    info!("📨 Join request from {} to team: {}", user.user_id, team_id);

    let request = state
        .lifecycle
        .create_join_request(&user.user_id, &team_id, role_applying_for, &message)
        .await
        .map_err(|e| {
            error!("❌ Failed to create join request: {}", e);
            e
        })?;

    Ok(HttpResponse::Created().json(request))
}

// Ask a mentor to advise the caller's team
#[post("/requests/mentorship")]
async fn create_mentorship_request(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    data: web::Json<CreateMentorshipRequest>,
) -> Result<HttpResponse, ServiceError> {
    let CreateMentorshipRequest {
        team_id,
        mentor_id,
        message,
    } = data.into_inner();

    info!("📨 Mentorship request from team {} to mentor: {}", team_id, mentor_id);

    let request = state
        .lifecycle
        .create_mentorship_request(&user.user_id, &team_id, &mentor_id, &message)
        .await
        .map_err(|e| {
            error!("❌ Failed to create mentorship request: {}", e);
            e
        })?;

    Ok(HttpResponse::Created().json(request))
}

// Accept, reject or cancel a request
#[put("/requests/{request_id}")]
async fn resolve_request(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    data: web::Json<ResolveRequest>,
) -> Result<HttpResponse, ServiceError> {
    let request_id = path.into_inner();
    let status = data.status;

    info!("🔄 Resolving request {} as {} by {}", request_id, status, user.user_id);

    let request = state
        .lifecycle
        .resolve(&request_id, &user.user_id, status)
        .await
        .map_err(|e| {
            error!("❌ Failed to resolve request {}: {}", request_id, e);
            e
        })?;

    let message = match request.status {
        RequestStatus::Accepted => "Request accepted successfully",
        RequestStatus::Rejected => "Request rejected",
        RequestStatus::Cancelled => "Request cancelled",
        RequestStatus::Pending => "Request status updated",
    };

    info!("✅ Request {} is now {}", request.id, request.status);

    Ok(HttpResponse::Ok().json(RequestResponse {
        id: request.id,
        status: request.status,
        message: message.to_string(),
    }))
}

// Re-run membership updates of an accepted request
#[post("/requests/{request_id}/reconcile")]
async fn reconcile_request(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let request_id = path.into_inner();

    info!("🔁 Reconciling request: {}", request_id);

    let request = state
        .lifecycle
        .reapply_side_effects(&request_id, &user.user_id)
        .await?;

    Ok(HttpResponse::Ok().json(RequestResponse {
        id: request.id,
        status: request.status,
        message: "Membership is up to date".to_string(),
    }))
}

// Requests addressed to the caller
#[get("/requests/inbox")]
async fn get_inbox(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<InboxQuery>,
) -> Result<HttpResponse, ServiceError> {
    info!("📋 Fetching inbox for user: {}", user.user_id);

    let requests = state.lifecycle.inbox(&user.user_id, query.pending_only).await?;

    info!("✅ Found {} requests for user", requests.len());
    Ok(HttpResponse::Ok().json(requests))
}

// Requests the caller has sent
#[get("/requests/sent")]
async fn get_sent(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ServiceError> {
    info!("📋 Fetching sent requests for user: {}", user.user_id);

    let requests = state.lifecycle.sent(&user.user_id).await?;

    Ok(HttpResponse::Ok().json(requests))
}

// Register all request routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_join_request)
        .service(create_mentorship_request)
        .service(get_inbox)
        .service(get_sent)
        .service(resolve_request)
        .service(reconcile_request);
}
