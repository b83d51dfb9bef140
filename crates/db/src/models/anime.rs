//! Anime watch-list model and DTOs.

use levelup_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `anime_list` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnimeEntry {
    pub id: DbId,
    pub user_id: UserId,
    pub mal_id: Option<i64>,
    pub title: String,
    pub image_url: Option<String>,
    pub status: String,
    pub episodes_watched: i32,
    pub total_episodes: Option<i32>,
    pub score: Option<i16>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for adding a title to the watch-list.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAnimeEntry {
    pub mal_id: Option<i64>,
    pub title: String,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub episodes_watched: Option<i32>,
    pub total_episodes: Option<i32>,
    pub score: Option<i16>,
    pub notes: Option<String>,
}

/// DTO for partially updating a watch-list entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAnimeEntry {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub episodes_watched: Option<i32>,
    pub total_episodes: Option<i32>,
    pub score: Option<i16>,
    pub notes: Option<String>,
}
