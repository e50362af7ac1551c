use crate::models::{Claims, ServiceError};
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::error;

pub mod config;
pub mod registry;
pub mod store_client;

// JWT verification. Tokens are issued by the external auth service.
pub mod jwt {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    pub struct JwtKeys {
        decoding: DecodingKey,
    }

    impl JwtKeys {
        pub fn from_secret(secret: &str) -> Self {
            Self {
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }
        }

        // Validate and decode a JWT token
        pub fn decode_token(&self, token: &str) -> Result<Claims, ServiceError> {
            decode::<Claims>(token, &self.decoding, &Validation::default())
                .map(|data| data.claims)
                .map_err(|_| ServiceError::Unauthorized)
        }
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        match auth_header.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ServiceError::Unauthorized),
        }
    }
}

// Caller identity taken from a verified bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl FromRequest for AuthenticatedUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, ServiceError> {
    let keys = req.app_data::<web::Data<jwt::JwtKeys>>().ok_or_else(|| {
        error!("❌ JWT keys are not registered as app data");
        ServiceError::InternalServerError
    })?;

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(ServiceError::Unauthorized)?;

    let token = jwt::extract_token_from_header(auth_header)?;
    let claims = keys.decode_token(&token)?;

    Ok(AuthenticatedUser { user_id: claims.sub })
}
