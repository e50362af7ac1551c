// hacknect-service/src/models/mod.rs
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

pub mod match_result;
pub use match_result::*;

pub mod profile;
pub use profile::*;

pub mod requests;
pub use requests::*;

pub mod team;
pub use team::*;

// JWT claims issued by the external auth service
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String, // Subject (profile ID)
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

// Service error kinds surfaced to callers
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    InvalidInput(String),
    InvalidStateTransition {
        from: RequestStatus,
        to: RequestStatus,
    },
    Conflict(String),
    StoreUnavailable(String),
    NotFound,
    Forbidden,
    Unauthorized,
    InternalServerError,
}

impl ServiceError {
    // Stable machine-readable code for response bodies
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::InvalidStateTransition { .. } => "invalid_state_transition",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::StoreUnavailable(_) => "store_unavailable",
            ServiceError::NotFound => "not_found",
            ServiceError::Forbidden => "forbidden",
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::InternalServerError => "internal_error",
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ServiceError::InvalidStateTransition { from, to } => {
                write!(f, "Cannot move request from {} to {}", from, to)
            }
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::StoreUnavailable(msg) => write!(f, "Store unavailable: {}", msg),
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::Forbidden => write!(f, "Forbidden"),
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidStateTransition { .. } | ServiceError::Conflict(_) => {
                StatusCode::CONFLICT
            }
            ServiceError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Forbidden => StatusCode::FORBIDDEN,
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.code(),
            "message": self.to_string(),
        }))
    }
}
