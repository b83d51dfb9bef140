//! Repository for the `workout_sets` table.

use levelup_core::types::DbId;
use sqlx::PgPool;

use crate::models::workout::{CreateSet, UpdateSet, WorkoutSet};

const COLUMNS: &str = "id, exercise_id, set_number, reps, weight_kg, created_at, updated_at";

/// Provides CRUD operations for sets within an exercise.
pub struct WorkoutSetRepo;

impl WorkoutSetRepo {
    /// Every set of every exercise in a workout, grouped by exercise and
    /// ordered by set number.
    pub async fn list_for_workout(
        pool: &PgPool,
        workout_id: DbId,
    ) -> Result<Vec<WorkoutSet>, sqlx::Error> {
        sqlx::query_as::<_, WorkoutSet>(
            "SELECT s.id, s.exercise_id, s.set_number, s.reps, s.weight_kg,
                    s.created_at, s.updated_at
             FROM workout_sets s
             JOIN workout_exercises e ON e.id = s.exercise_id
             WHERE e.workout_id = $1
             ORDER BY s.exercise_id, s.set_number",
        )
        .bind(workout_id)
        .fetch_all(pool)
        .await
    }

    pub async fn list_for_exercise(
        pool: &PgPool,
        exercise_id: DbId,
    ) -> Result<Vec<WorkoutSet>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workout_sets
             WHERE exercise_id = $1
             ORDER BY set_number"
        );
        sqlx::query_as::<_, WorkoutSet>(&query)
            .bind(exercise_id)
            .fetch_all(pool)
            .await
    }

    /// Log a set. Without an explicit `set_number` it takes the next one.
    ///
    /// A duplicate `set_number` violates `uq_workout_sets_exercise_number`.
    pub async fn create(
        pool: &PgPool,
        exercise_id: DbId,
        input: &CreateSet,
    ) -> Result<WorkoutSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO workout_sets (exercise_id, set_number, reps, weight_kg)
             VALUES ($1, COALESCE($2, (
                 SELECT COALESCE(MAX(set_number), 0) + 1
                 FROM workout_sets WHERE exercise_id = $1
             )), $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutSet>(&query)
            .bind(exercise_id)
            .bind(input.set_number)
            .bind(input.reps)
            .bind(input.weight_kg.unwrap_or(0.0))
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        exercise_id: DbId,
        id: DbId,
        input: &UpdateSet,
    ) -> Result<Option<WorkoutSet>, sqlx::Error> {
        let query = format!(
            "UPDATE workout_sets SET
                reps = COALESCE($3, reps),
                weight_kg = COALESCE($4, weight_kg)
             WHERE id = $1 AND exercise_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutSet>(&query)
            .bind(id)
            .bind(exercise_id)
            .bind(input.reps)
            .bind(input.weight_kg)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, exercise_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM workout_sets WHERE id = $1 AND exercise_id = $2")
            .bind(id)
            .bind(exercise_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
