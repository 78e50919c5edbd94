//! User repository: the credential store access contract
//!
//! Every operation here is an exact-match lookup or a single-row mutation;
//! no query spans more than one user row.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use sqlx::{PgPool, Row};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::models::{SignupRequest, User};

/// Returned by [`UserRepository::create`] when the username is taken
#[derive(Debug, Error)]
#[error("username already exists")]
pub struct DuplicateUsername;

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user with a freshly hashed password
    ///
    /// Fails with [`DuplicateUsername`] if the username is already taken;
    /// uniqueness is enforced by the insert itself, not a prior lookup.
    pub async fn create(&self, req: &SignupRequest) -> Result<User> {
        info!("Creating new user: {}", req.username);

        let salt = SaltString::generate(&mut rand::thread_rng());
        let argon2 = Argon2::default();
        let password_hash = argon2
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
            .to_string();

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, adventurer_name)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, adventurer_name, current_token,
                      created_at, updated_at
            "#,
        )
        .bind(&req.username)
        .bind(&password_hash)
        .bind(&req.adventurer_name)
        .fetch_one(&self.pool)
        .await;

        let row = match result {
            Ok(row) => row,
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                return Err(DuplicateUsername.into());
            }
            Err(e) => return Err(e.into()),
        };

        Self::user_from_row(&row)
    }

    /// Find a user by username (exact match)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, password_hash, adventurer_name, current_token,
                   created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::user_from_row(&row)).transpose()
    }

    /// Set or clear the user's current session token
    ///
    /// Unconditional overwrite: a new login supersedes the previous token,
    /// and clearing an already-clear token is a no-op.
    pub async fn set_token(&self, user_id: Uuid, token: Option<&str>) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET current_token = $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Check that the presented token is still the user's stored token
    ///
    /// This is the revocation check: the predicate matches id and token in
    /// one statement, so a token cleared by logout or superseded by a newer
    /// login stops matching immediately.
    pub async fn token_matches(&self, user_id: Uuid, token: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT 1 AS matched
            FROM users
            WHERE id = $1 AND current_token = $2
            "#,
        )
        .bind(user_id)
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Update the user's adventurer name
    pub async fn update_adventurer_name(&self, user_id: Uuid, name: &str) -> Result<User> {
        info!("Updating adventurer name for user: {}", user_id);

        let row = sqlx::query(
            r#"
            UPDATE users
            SET adventurer_name = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, username, password_hash, adventurer_name, current_token,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Self::user_from_row(&row)
    }

    /// Verify a user's password against the stored hash
    pub async fn verify_password(&self, user: &User, password: &str) -> Result<bool> {
        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

        let argon2 = Argon2::default();
        let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

        Ok(result.is_ok())
    }

    fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            adventurer_name: row.try_get("adventurer_name")?,
            current_token: row.try_get("current_token")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}
