//! Repository for the `workouts` table.

use levelup_core::types::{DbId, UserId};
use levelup_core::workout;
use sqlx::PgPool;

use crate::models::workout::{CreateWorkout, UpdateWorkout, Workout};

const COLUMNS: &str =
    "id, user_id, name, status, started_at, completed_at, notes, created_at, updated_at";

/// Provides CRUD operations for workouts.
pub struct WorkoutRepo;

impl WorkoutRepo {
    /// List a user's workouts, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Workout>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workouts
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY started_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(user_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<Workout>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM workouts WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Workout>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Start a workout. `started_at` defaults to now.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateWorkout,
    ) -> Result<Workout, sqlx::Error> {
        let query = format!(
            "INSERT INTO workouts (user_id, name, notes, status, started_at)
             VALUES ($1, $2, $3, $4, COALESCE($5, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(user_id)
            .bind(input.name.trim())
            .bind(&input.notes)
            .bind(workout::STATUS_IN_PROGRESS)
            .bind(input.started_at)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        input: &UpdateWorkout,
    ) -> Result<Option<Workout>, sqlx::Error> {
        let query = format!(
            "UPDATE workouts SET
                name = COALESCE($3, name),
                notes = COALESCE($4, notes)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Mark an in-progress workout completed.
    ///
    /// Returns `None` if the workout does not exist or was not in progress,
    /// so a concurrent double-complete cannot overwrite `completed_at`.
    pub async fn complete(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<Workout>, sqlx::Error> {
        let query = format!(
            "UPDATE workouts SET status = $3, completed_at = NOW()
             WHERE id = $1 AND user_id = $2 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workout>(&query)
            .bind(id)
            .bind(user_id)
            .bind(workout::STATUS_COMPLETED)
            .bind(workout::STATUS_IN_PROGRESS)
            .fetch_optional(pool)
            .await
    }

    /// Delete a workout with its exercises and sets.
    pub async fn delete(pool: &PgPool, user_id: UserId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
