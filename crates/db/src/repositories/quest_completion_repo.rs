//! Repository for the `quest_completions` table.
//!
//! Completing and undoing a quest also moves the owner's `total_exp`; both
//! writes happen in one transaction so the EXP total always equals the
//! awards of the completions that exist (floored at zero).

use chrono::NaiveDate;
use levelup_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::quest::{CompletionOutcome, Quest, QuestCompletion, UndoOutcome};

const COLUMNS: &str =
    "id, quest_id, user_id, period_start, exp_awarded, completed_at, created_at, updated_at";

/// Provides completion bookkeeping for quests.
pub struct QuestCompletionRepo;

impl QuestCompletionRepo {
    /// Record a completion of `quest` for `period_start` and award its EXP.
    ///
    /// Returns `None` without touching EXP when the quest is already
    /// completed for that period.
    pub async fn complete(
        pool: &PgPool,
        quest: &Quest,
        period_start: NaiveDate,
    ) -> Result<Option<CompletionOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO quest_completions (quest_id, user_id, period_start, exp_awarded)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (quest_id, period_start) DO NOTHING
             RETURNING {COLUMNS}"
        );
        let completion = sqlx::query_as::<_, QuestCompletion>(&query)
            .bind(quest.id)
            .bind(quest.user_id)
            .bind(period_start)
            .bind(quest.exp_reward)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(completion) = completion else {
            tx.rollback().await?;
            return Ok(None);
        };

        let total_exp: i64 = sqlx::query_scalar(
            "UPDATE profiles SET total_exp = total_exp + $2
             WHERE id = $1
             RETURNING total_exp",
        )
        .bind(quest.user_id)
        .bind(i64::from(completion.exp_awarded))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(CompletionOutcome {
            completion,
            total_exp,
        }))
    }

    /// Remove the completion for `period_start` and take back the EXP it
    /// awarded. Returns `None` when there was nothing to undo.
    pub async fn undo(
        pool: &PgPool,
        quest_id: DbId,
        user_id: UserId,
        period_start: NaiveDate,
    ) -> Result<Option<UndoOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed: Option<i32> = sqlx::query_scalar(
            "DELETE FROM quest_completions
             WHERE quest_id = $1 AND user_id = $2 AND period_start = $3
             RETURNING exp_awarded",
        )
        .bind(quest_id)
        .bind(user_id)
        .bind(period_start)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(exp_removed) = removed else {
            tx.rollback().await?;
            return Ok(None);
        };

        let total_exp: i64 = sqlx::query_scalar(
            "UPDATE profiles SET total_exp = GREATEST(total_exp - $2, 0)
             WHERE id = $1
             RETURNING total_exp",
        )
        .bind(user_id)
        .bind(i64::from(exp_removed))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(UndoOutcome {
            exp_removed,
            total_exp,
        }))
    }

    /// Completions of a user between two dates (inclusive, by UTC day of
    /// `completed_at`), newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<QuestCompletion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM quest_completions
             WHERE user_id = $1
               AND (completed_at AT TIME ZONE 'UTC')::DATE BETWEEN $2 AND $3
             ORDER BY completed_at DESC, id DESC"
        );
        sqlx::query_as::<_, QuestCompletion>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Distinct UTC days on which the user completed at least one quest.
    pub async fn completion_days(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<NaiveDate>, sqlx::Error> {
        sqlx::query_scalar::<_, NaiveDate>(
            "SELECT DISTINCT (completed_at AT TIME ZONE 'UTC')::DATE AS day
             FROM quest_completions
             WHERE user_id = $1
             ORDER BY day DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Total number of completions ever recorded for the user.
    pub async fn count_for_user(pool: &PgPool, user_id: UserId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM quest_completions WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
