//! Content repository: read-only lookups over static reference data

use anyhow::Result;
use sqlx::PgPool;

use crate::models::{Chapter, Enemy, Item, Story};

/// Content repository
#[derive(Clone)]
pub struct ContentRepository {
    pool: PgPool,
}

impl ContentRepository {
    /// Create a new content repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List all stories
    pub async fn list_stories(&self) -> Result<Vec<Story>> {
        let stories = sqlx::query_as::<_, Story>(
            r#"
            SELECT id, title, synopsis
            FROM stories
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stories)
    }

    /// Find a story by ID
    pub async fn find_story(&self, id: i32) -> Result<Option<Story>> {
        let story = sqlx::query_as::<_, Story>(
            r#"
            SELECT id, title, synopsis
            FROM stories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(story)
    }

    /// List the chapters of a story in reading order
    pub async fn chapters_for_story(&self, story_id: i32) -> Result<Vec<Chapter>> {
        let chapters = sqlx::query_as::<_, Chapter>(
            r#"
            SELECT id, story_id, number, title, body
            FROM chapters
            WHERE story_id = $1
            ORDER BY number
            "#,
        )
        .bind(story_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(chapters)
    }

    /// Find a chapter by story and chapter number
    pub async fn find_chapter(&self, story_id: i32, number: i32) -> Result<Option<Chapter>> {
        let chapter = sqlx::query_as::<_, Chapter>(
            r#"
            SELECT id, story_id, number, title, body
            FROM chapters
            WHERE story_id = $1 AND number = $2
            "#,
        )
        .bind(story_id)
        .bind(number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chapter)
    }

    /// Find an item by ID
    pub async fn find_item(&self, id: i32) -> Result<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, description
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Find an enemy by ID
    pub async fn find_enemy(&self, id: i32) -> Result<Option<Enemy>> {
        let enemy = sqlx::query_as::<_, Enemy>(
            r#"
            SELECT id, name, description, level, health
            FROM enemies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(enemy)
    }
}
