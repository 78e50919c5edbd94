//! Static content models: stories, chapters, items, enemies
//!
//! Read-only reference data served without authentication.

use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Story {
    pub id: i32,
    pub title: String,
    pub synopsis: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Chapter {
    pub id: i32,
    pub story_id: i32,
    pub number: i32,
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Enemy {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub level: i32,
    pub health: i32,
}
