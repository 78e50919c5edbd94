//! Token service for session credential issuance and verification
//!
//! Tokens are HS256 JWTs bound to one (user id, username) pair at issuance.
//! Verification here is stateless: structure, signature, and expiry only.
//! Logout works by clearing the token stored on the user row, so every
//! protected request additionally re-checks the presented token against
//! that row (see the auth middleware). A token is valid iff it is
//! well-formed, unexpired, and still the user's currently stored token.

use anyhow::Result;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Shared secret for signing and verifying tokens
    pub secret: String,
    /// Token expiration time in seconds (default: 24 hours)
    pub token_expiry: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: Shared secret for signing tokens
    /// - `TOKEN_EXPIRY`: Token expiry in seconds (default: 86400)
    pub fn from_env() -> Result<Self> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?;

        let token_expiry = std::env::var("TOKEN_EXPIRY")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .unwrap_or(86400);

        Ok(TokenConfig {
            secret,
            token_expiry,
        })
    }
}

/// Token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    /// Username at issuance time
    pub username: String,
    /// Per-issue token id, so consecutive logins never produce equal tokens
    pub jti: Uuid,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
}

/// Error type for token verification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// Token is past its expiry
    #[error("token has expired")]
    Expired,
    /// Token is malformed or carries a bad signature
    #[error("invalid token")]
    Invalid,
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: TokenConfig,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.validate_exp = true;

        TokenService {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Issue a session token bound to (user id, username)
    ///
    /// The caller persists the returned value as the user's sole current
    /// token before handing it to the client.
    pub fn issue(&self, user_id: Uuid, username: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
            .as_secs();

        let claims = Claims {
            sub: user_id,
            username: username.to_string(),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + self.config.token_expiry,
        };

        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )?;
        Ok(token)
    }

    /// Verify a token and return its claims
    ///
    /// Stateless check only; the revocation check against the stored
    /// current token lives at the request gate.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;
        Ok(token_data.claims)
    }

    /// Get the token expiry time in seconds
    pub fn token_expiry(&self) -> u64 {
        self.config.token_expiry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn service(secret: &str) -> TokenService {
        TokenService::new(TokenConfig {
            secret: secret.to_string(),
            token_expiry: 3600,
        })
    }

    #[test]
    fn issue_then_verify_returns_bound_identity() {
        let service = service("test-secret");
        let user_id = Uuid::new_v4();

        let token = service.issue(user_id, "astra").unwrap();
        let claims = service.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.username, "astra");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn consecutive_issues_produce_distinct_tokens() {
        let service = service("test-secret");
        let user_id = Uuid::new_v4();

        let first = service.issue(user_id, "astra").unwrap();
        let second = service.issue(user_id, "astra").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn verify_rejects_garbage() {
        let service = service("test-secret");
        assert_eq!(
            service.verify("not-a-token").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn verify_rejects_foreign_signature() {
        let issuer = service("secret-a");
        let verifier = service("secret-b");

        let token = issuer.issue(Uuid::new_v4(), "astra").unwrap();
        assert_eq!(verifier.verify(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn verify_rejects_tampered_token() {
        let service = service("test-secret");
        let token = service.issue(Uuid::new_v4(), "astra").unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        assert!(service.verify(&tampered).is_err());
    }

    #[test]
    fn verify_rejects_expired_token() {
        let service = service("test-secret");
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();

        // Well past the default verification leeway
        let claims = Claims {
            sub: Uuid::new_v4(),
            username: "astra".to_string(),
            jti: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(jsonwebtoken::Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert_eq!(service.verify(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    #[serial]
    fn token_config_requires_secret() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("TOKEN_EXPIRY");
        }
        assert!(TokenConfig::from_env().is_err());

        unsafe {
            std::env::set_var("JWT_SECRET", "test-secret");
            std::env::set_var("TOKEN_EXPIRY", "600");
        }
        let config = TokenConfig::from_env().unwrap();
        assert_eq!(config.secret, "test-secret");
        assert_eq!(config.token_expiry, 600);

        unsafe {
            std::env::remove_var("JWT_SECRET");
            std::env::remove_var("TOKEN_EXPIRY");
        }
    }
}
