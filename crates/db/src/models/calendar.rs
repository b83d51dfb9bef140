//! Release calendar model and DTOs.

use chrono::NaiveDate;
use levelup_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `release_calendar` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CalendarEntry {
    pub id: DbId,
    pub user_id: Option<UserId>,
    pub mal_id: Option<i64>,
    pub title: String,
    pub media_type: String,
    pub release_date: NaiveDate,
    pub episode_number: Option<i32>,
    pub source: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCalendarEntry {
    pub mal_id: Option<i64>,
    pub title: String,
    pub media_type: Option<String>,
    pub release_date: NaiveDate,
    pub episode_number: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCalendarEntry {
    pub title: Option<String>,
    pub release_date: Option<NaiveDate>,
    pub episode_number: Option<i32>,
    pub notes: Option<String>,
}

/// A schedule entry imported from an external source (no owning user).
#[derive(Debug, Clone)]
pub struct SyncedRelease {
    pub mal_id: i64,
    pub title: String,
    pub media_type: String,
    pub release_date: NaiveDate,
    pub episode_number: Option<i32>,
    pub source: String,
}
