//! Repository for the `workout_exercises` table.
//!
//! Ownership is checked on the parent workout by the caller; every query
//! here is still scoped by `workout_id`.

use levelup_core::types::DbId;
use sqlx::PgPool;

use crate::models::workout::{CreateExercise, UpdateExercise, WorkoutExercise};

const COLUMNS: &str = "id, workout_id, name, sort_order, created_at, updated_at";

/// Provides CRUD operations for exercises within a workout.
pub struct WorkoutExerciseRepo;

impl WorkoutExerciseRepo {
    pub async fn list_for_workout(
        pool: &PgPool,
        workout_id: DbId,
    ) -> Result<Vec<WorkoutExercise>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workout_exercises
             WHERE workout_id = $1
             ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, WorkoutExercise>(&query)
            .bind(workout_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        workout_id: DbId,
        id: DbId,
    ) -> Result<Option<WorkoutExercise>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM workout_exercises WHERE id = $1 AND workout_id = $2");
        sqlx::query_as::<_, WorkoutExercise>(&query)
            .bind(id)
            .bind(workout_id)
            .fetch_optional(pool)
            .await
    }

    /// Add an exercise. Without an explicit `sort_order` it goes last.
    pub async fn create(
        pool: &PgPool,
        workout_id: DbId,
        input: &CreateExercise,
    ) -> Result<WorkoutExercise, sqlx::Error> {
        let query = format!(
            "INSERT INTO workout_exercises (workout_id, name, sort_order)
             VALUES ($1, $2, COALESCE($3, (
                 SELECT COALESCE(MAX(sort_order) + 1, 0)
                 FROM workout_exercises WHERE workout_id = $1
             )))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutExercise>(&query)
            .bind(workout_id)
            .bind(input.name.trim())
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        workout_id: DbId,
        id: DbId,
        input: &UpdateExercise,
    ) -> Result<Option<WorkoutExercise>, sqlx::Error> {
        let query = format!(
            "UPDATE workout_exercises SET
                name = COALESCE($3, name),
                sort_order = COALESCE($4, sort_order)
             WHERE id = $1 AND workout_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutExercise>(&query)
            .bind(id)
            .bind(workout_id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(input.sort_order)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, workout_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workout_exercises WHERE id = $1 AND workout_id = $2")
            .bind(id)
            .bind(workout_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
