//! Manga collection model and DTOs.

use levelup_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `manga_collection` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MangaEntry {
    pub id: DbId,
    pub user_id: UserId,
    pub mal_id: Option<i64>,
    pub title: String,
    pub image_url: Option<String>,
    pub status: String,
    pub volumes_owned: i32,
    pub total_volumes: Option<i32>,
    pub chapters_read: i32,
    pub total_chapters: Option<i32>,
    pub score: Option<i16>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateMangaEntry {
    pub mal_id: Option<i64>,
    pub title: String,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub volumes_owned: Option<i32>,
    pub total_volumes: Option<i32>,
    pub chapters_read: Option<i32>,
    pub total_chapters: Option<i32>,
    pub score: Option<i16>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMangaEntry {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub volumes_owned: Option<i32>,
    pub total_volumes: Option<i32>,
    pub chapters_read: Option<i32>,
    pub total_chapters: Option<i32>,
    pub score: Option<i16>,
    pub notes: Option<String>,
}
