//! Quest and quest-completion models and DTOs.

use chrono::NaiveDate;
use levelup_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `quests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quest {
    pub id: DbId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub frequency: String,
    pub exp_reward: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A quest together with whether it is done for the current period.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestWithStatus {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub quest: Quest,
    pub completed_this_period: bool,
}

/// A row from the `quest_completions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestCompletion {
    pub id: DbId,
    pub quest_id: DbId,
    pub user_id: UserId,
    pub period_start: NaiveDate,
    pub exp_awarded: i32,
    pub completed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of completing a quest: the new completion row and the user's
/// EXP total after the award.
#[derive(Debug, Clone)]
pub struct CompletionOutcome {
    pub completion: QuestCompletion,
    pub total_exp: i64,
}

/// Result of undoing a completion.
#[derive(Debug, Clone, Copy)]
pub struct UndoOutcome {
    pub exp_removed: i32,
    pub total_exp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuest {
    pub title: String,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub exp_reward: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateQuest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub exp_reward: Option<i32>,
    pub is_active: Option<bool>,
}
