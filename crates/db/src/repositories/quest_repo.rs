//! Repository for the `quests` table.

use chrono::NaiveDate;
use levelup_core::quest;
use levelup_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::quest::{CreateQuest, Quest, QuestWithStatus, UpdateQuest};

const COLUMNS: &str =
    "id, user_id, title, description, frequency, exp_reward, is_active, created_at, updated_at";

/// Provides CRUD operations for quests.
pub struct QuestRepo;

impl QuestRepo {
    /// List a user's quests with a flag telling whether each one is already
    /// completed for the period containing `today`.
    ///
    /// The period start for each frequency is computed here and bound as a
    /// parameter so the database never re-derives week boundaries.
    pub async fn list_with_status(
        pool: &PgPool,
        user_id: UserId,
        today: NaiveDate,
        include_inactive: bool,
    ) -> Result<Vec<QuestWithStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, EXISTS (
                    SELECT 1 FROM quest_completions c
                    WHERE c.quest_id = quests.id
                      AND c.period_start = CASE quests.frequency
                          WHEN 'weekly' THEN $3
                          WHEN 'once' THEN $4
                          ELSE $2
                      END
                ) AS completed_this_period
             FROM quests
             WHERE user_id = $1 AND ($5 OR is_active)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, QuestWithStatus>(&query)
            .bind(user_id)
            .bind(quest::period_start(quest::FREQUENCY_DAILY, today))
            .bind(quest::period_start(quest::FREQUENCY_WEEKLY, today))
            .bind(quest::period_start(quest::FREQUENCY_ONCE, today))
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateQuest,
    ) -> Result<Quest, sqlx::Error> {
        let query = format!(
            "INSERT INTO quests (user_id, title, description, frequency, exp_reward)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(user_id)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.frequency.as_deref().unwrap_or(quest::DEFAULT_FREQUENCY))
            .bind(input.exp_reward.unwrap_or(quest::DEFAULT_EXP_REWARD))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        input: &UpdateQuest,
    ) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!(
            "UPDATE quests SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                frequency = COALESCE($5, frequency),
                exp_reward = COALESCE($6, exp_reward),
                is_active = COALESCE($7, is_active)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(&input.frequency)
            .bind(input.exp_reward)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a quest and, through the cascade, its completion history.
    /// EXP already awarded is kept.
    pub async fn delete(pool: &PgPool, user_id: UserId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM quests WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
