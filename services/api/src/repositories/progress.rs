//! Saved-progress repository: owner-scoped CRUD over save slots
//!
//! Every read and delete carries the owner in its predicate. A zero-row
//! match is reported the same whether the slot is absent or belongs to
//! someone else.

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::models::{SaveProgressRequest, SavedProgress};

/// Saved-progress repository
#[derive(Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    /// Create a new progress repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new save slot for the owner
    ///
    /// Always inserts a new row; save names are labels, not keys, so two
    /// saves with the same name are two slots.
    pub async fn create(&self, owner: Uuid, req: &SaveProgressRequest) -> Result<SavedProgress> {
        info!("Creating save slot for user: {}", owner);

        let row = sqlx::query(
            r#"
            INSERT INTO saved_progress (user_id, story_id, chapter_id, game_state, inventory, save_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, story_id, chapter_id, game_state, inventory,
                      save_name, created_at
            "#,
        )
        .bind(owner)
        .bind(req.story_id)
        .bind(req.chapter_id)
        .bind(&req.game_state)
        .bind(&req.inventory)
        .bind(&req.save_name)
        .fetch_one(&self.pool)
        .await?;

        Self::progress_from_row(&row)
    }

    /// Find the owner's most recent save, if any
    pub async fn find_latest(&self, owner: Uuid) -> Result<Option<SavedProgress>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, story_id, chapter_id, game_state, inventory,
                   save_name, created_at
            FROM saved_progress
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| Self::progress_from_row(&row)).transpose()
    }

    /// Delete a save slot iff it belongs to the owner
    ///
    /// The ownership check lives in the delete predicate itself; a
    /// fetch-then-delete pair would open a check/use gap. Returns false
    /// when nothing matched.
    pub async fn delete(&self, owner: Uuid, progress_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM saved_progress
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(progress_id)
        .bind(owner)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    fn progress_from_row(row: &sqlx::postgres::PgRow) -> Result<SavedProgress> {
        Ok(SavedProgress {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            story_id: row.try_get("story_id")?,
            chapter_id: row.try_get("chapter_id")?,
            game_state: row.try_get("game_state")?,
            inventory: row.try_get("inventory")?,
            save_name: row.try_get("save_name")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
