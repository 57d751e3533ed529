use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lazy_static::lazy_static;
use serde_json::json;
use thiserror::Error;
use tracing::error;

lazy_static! {
    static ref PRODUCTION: bool = std::env::var("APP_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);
}

/// Error taxonomy for the API surface. Validation and authorization errors
/// are produced by the owning handler or extractor; anything else bubbles up
/// as `Internal` and renders as a 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing '{0}' in request body")]
    MissingField(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Incorrect username or password")]
    IncorrectCredentials,
    #[error("Missing bearer token")]
    MissingBearerToken,
    #[error("Unauthorized request")]
    UnauthorizedRequest,
    #[error("{0} doesn't exist")]
    NotFound(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::Validation(_) | ApiError::UsernameTaken => {
                StatusCode::BAD_REQUEST
            }
            ApiError::IncorrectCredentials
            | ApiError::MissingBearerToken
            | ApiError::UnauthorizedRequest => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "unhandled error");
                if *PRODUCTION {
                    "server error".to_string()
                } else {
                    e.to_string()
                }
            }
            other => other.to_string(),
        };
        let body = Json(json!({ "error": { "message": message } }));
        (self.status(), body).into_response()
    }
}
