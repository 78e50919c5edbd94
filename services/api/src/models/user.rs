//! User model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User entity
///
/// Deliberately not `Serialize`: `password_hash` and `current_token` must
/// never leave the service. Outward-facing payloads go through
/// [`UserResponse`].
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub adventurer_name: String,
    pub current_token: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub adventurer_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            adventurer_name: user.adventurer_name,
            created_at: user.created_at,
        }
    }
}

/// Request for account creation
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    pub adventurer_name: String,
}

/// Request for user login
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request for updating the adventurer name
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNameRequest {
    pub adventurer_name: String,
}

/// Response for sign-up and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_response_carries_no_secrets() {
        let user = User {
            id: Uuid::new_v4(),
            username: "astra".to_string(),
            password_hash: "$argon2id$mock".to_string(),
            adventurer_name: "Zel".to_string(),
            current_token: Some("token".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let response = UserResponse::from(user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("astra"));
        assert!(json.contains("Zel"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("current_token"));
    }
}
