//! Custom error types for the API service
//!
//! Responses carry generic messages only; full failure detail stays in the
//! server-side logs. "No such user" and "wrong password" collapse into one
//! `InvalidCredential`, and "absent" and "not owned by the caller" collapse
//! into one `NotFound`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, malformed, expired, or revoked credential at the gate
    #[error("unauthorized")]
    Unauthorized,

    /// Sign-up/login domain failure; deliberately enumeration-safe
    #[error("invalid credentials")]
    InvalidCredential,

    /// Resource absent or not owned by the caller
    #[error("not found")]
    NotFound,

    /// Bad request with message
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Persistence-layer or unexpected failure
    #[error("internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized".to_string()),
            ApiError::InvalidCredential => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
