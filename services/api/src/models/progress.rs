//! Saved-progress model and related payloads

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One save slot
///
/// A new row per save action; "latest" is resolved by `created_at`,
/// never by name.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SavedProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub story_id: i32,
    pub chapter_id: i32,
    pub game_state: serde_json::Value,
    pub inventory: serde_json::Value,
    pub save_name: String,
    pub created_at: DateTime<Utc>,
}

/// Request for creating a save slot
#[derive(Debug, Clone, Deserialize)]
pub struct SaveProgressRequest {
    pub story_id: i32,
    pub chapter_id: i32,
    pub game_state: serde_json::Value,
    pub inventory: serde_json::Value,
    pub save_name: String,
}
