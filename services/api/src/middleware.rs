//! Request gate: bearer-token authentication middleware
//!
//! Every protected route passes through here before any handler logic runs.
//! The check is two-part: a stateless verify of the token itself, then a
//! re-check that the presented token is still the one stored on the user
//! row. The second part is what makes logout and re-login actually revoke
//! an already-issued, not-yet-expired token.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use tracing::error;
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated identity attached to the request after the gate
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
}

/// Extract the token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let token = header_value.strip_prefix("Bearer ")?;
    if token.is_empty() { None } else { Some(token) }
}

/// Authenticate the request and attach the caller's identity
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    let token = bearer_token(header_value).ok_or(ApiError::Unauthorized)?;

    // Stateless check: structure, signature, expiry
    let claims = state
        .token_service
        .verify(token)
        .map_err(|_| ApiError::Unauthorized)?;

    // Stateful check: the token must still be the one stored on the user
    // row, otherwise it was revoked by logout or superseded by a re-login
    let still_current = state
        .user_repository
        .token_matches(claims.sub, token)
        .await
        .map_err(|e| {
            error!("Failed to check stored token: {}", e);
            ApiError::InternalServerError
        })?;

    if !still_current {
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_accepts_well_formed_header() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
    }

    #[test]
    fn bearer_token_rejects_missing_scheme() {
        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token("Basic abc"), None);
    }

    #[test]
    fn bearer_token_rejects_wrong_case_and_empty() {
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token(""), None);
    }
}
