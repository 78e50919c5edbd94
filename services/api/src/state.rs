//! Application state shared across handlers
//!
//! Dependencies are injected here at construction rather than reached for
//! through module-level singletons, so tests can stand in their own.

use sqlx::PgPool;

use crate::{
    jwt::TokenService,
    repositories::{ContentRepository, ProgressRepository, UserRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub token_service: TokenService,
    pub user_repository: UserRepository,
    pub progress_repository: ProgressRepository,
    pub content_repository: ContentRepository,
}
