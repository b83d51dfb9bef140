//! Workout, exercise and set models and DTOs.

use levelup_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workouts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workout {
    pub id: DbId,
    pub user_id: UserId,
    pub name: String,
    pub status: String,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `workout_exercises` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkoutExercise {
    pub id: DbId,
    pub workout_id: DbId,
    pub name: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `workout_sets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkoutSet {
    pub id: DbId,
    pub exercise_id: DbId,
    pub set_number: i32,
    pub reps: i32,
    pub weight_kg: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An exercise with its sets, as returned by the workout detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ExerciseWithSets {
    #[serde(flatten)]
    pub exercise: WorkoutExercise,
    pub sets: Vec<WorkoutSet>,
}

/// Full workout detail.
#[derive(Debug, Clone, Serialize)]
pub struct WorkoutDetail {
    #[serde(flatten)]
    pub workout: Workout,
    pub exercises: Vec<ExerciseWithSets>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkout {
    pub name: String,
    pub notes: Option<String>,
    pub started_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWorkout {
    pub name: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

/// DTO for logging a set. `set_number` defaults to the next free number.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSet {
    pub set_number: Option<i32>,
    pub reps: i32,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSet {
    pub reps: Option<i32>,
    pub weight_kg: Option<f64>,
}
