//! Handlers for workouts and their exercises and sets.
//!
//! Exercises and sets are addressed through their workout, so every nested
//! handler first loads the workout for the caller; a workout that belongs to
//! someone else is reported as not found.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use levelup_core::error::CoreError;
use levelup_core::types::{DbId, UserId};
use levelup_core::workout;
use levelup_db::models::workout::{
    CreateExercise, CreateSet, CreateWorkout, ExerciseWithSets, UpdateExercise, UpdateSet,
    UpdateWorkout, Workout, WorkoutDetail, WorkoutExercise,
};
use levelup_db::repositories::{
    clamp_limit, clamp_offset, WorkoutExerciseRepo, WorkoutRepo, WorkoutSetRepo,
};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::profile::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::query::{PaginationParams, StatusFilter};
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_workout_exists(pool: &PgPool, user_id: UserId, id: DbId) -> AppResult<Workout> {
    WorkoutRepo::find_for_user(pool, user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workout",
            id,
        }))
}

async fn ensure_exercise_exists(
    pool: &PgPool,
    workout_id: DbId,
    id: DbId,
) -> AppResult<WorkoutExercise> {
    WorkoutExerciseRepo::find(pool, workout_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkoutExercise",
            id,
        }))
}

/// Load a workout the caller owns and check it still accepts edits.
async fn ensure_editable_workout(pool: &PgPool, user_id: UserId, id: DbId) -> AppResult<Workout> {
    let w = ensure_workout_exists(pool, user_id, id).await?;
    workout::ensure_editable(&w.status)?;
    Ok(w)
}

/// Assemble the nested detail view: exercises in order, each with its sets.
async fn load_detail(pool: &PgPool, w: Workout) -> AppResult<WorkoutDetail> {
    let exercises = WorkoutExerciseRepo::list_for_workout(pool, w.id).await?;
    let mut sets = WorkoutSetRepo::list_for_workout(pool, w.id).await?;

    let exercises = exercises
        .into_iter()
        .map(|exercise| {
            let (mine, rest): (Vec<_>, Vec<_>) =
                sets.drain(..).partition(|s| s.exercise_id == exercise.id);
            sets = rest;
            ExerciseWithSets {
                exercise,
                sets: mine,
            }
        })
        .collect();

    Ok(WorkoutDetail {
        workout: w,
        exercises,
    })
}

// ---------------------------------------------------------------------------
// GET /workouts
// ---------------------------------------------------------------------------

pub async fn list_workouts(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<StatusFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = filter.status {
        workout::validate_status(status)?;
    }
    let items = WorkoutRepo::list_for_user(
        &state.pool,
        auth.user_id,
        filter.status.as_deref(),
        clamp_limit(page.limit),
        clamp_offset(page.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /workouts
// ---------------------------------------------------------------------------

/// Start a workout. It begins `in_progress`.
pub async fn create_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateWorkout>,
) -> AppResult<impl IntoResponse> {
    workout::validate_name("workout", &input.name)?;

    ensure_profile(&state.pool, auth.user_id).await?;
    let created = WorkoutRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(id = created.id, name = %created.name, "Workout started");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /workouts/{id}
// ---------------------------------------------------------------------------

pub async fn get_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let w = ensure_workout_exists(&state.pool, auth.user_id, id).await?;
    let detail = load_detail(&state.pool, w).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// PATCH /workouts/{id}
// ---------------------------------------------------------------------------

/// Rename a workout or change its notes. Allowed after completion too.
pub async fn update_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkout>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        workout::validate_name("workout", name)?;
    }
    let updated = WorkoutRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workout",
            id,
        }))?;
    tracing::info!(id, "Workout updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /workouts/{id}
// ---------------------------------------------------------------------------

pub async fn delete_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = WorkoutRepo::delete(&state.pool, auth.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Workout",
            id,
        }));
    }
    tracing::info!(id, "Workout deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /workouts/{id}/complete
// ---------------------------------------------------------------------------

pub async fn complete_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let w = ensure_workout_exists(&state.pool, auth.user_id, id).await?;
    workout::validate_transition(&w.status, workout::STATUS_COMPLETED)?;

    // A concurrent completion wins the conditional update; report it the
    // same way as a repeated request.
    let completed = WorkoutRepo::complete(&state.pool, auth.user_id, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "workout is already completed".to_string(),
            ))
        })?;
    tracing::info!(id, "Workout completed");
    Ok(Json(DataResponse { data: completed }))
}

// ---------------------------------------------------------------------------
// GET /workouts/{id}/summary
// ---------------------------------------------------------------------------

pub async fn workout_summary(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let w = ensure_workout_exists(&state.pool, auth.user_id, id).await?;
    let exercises = WorkoutExerciseRepo::list_for_workout(&state.pool, id).await?;
    let sets: Vec<(i32, f64)> = WorkoutSetRepo::list_for_workout(&state.pool, id)
        .await?
        .into_iter()
        .map(|s| (s.reps, s.weight_kg))
        .collect();

    let summary = workout::summarize(
        exercises.len(),
        &sets,
        w.started_at,
        w.completed_at,
        Utc::now(),
    );
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// POST /workouts/{id}/exercises
// ---------------------------------------------------------------------------

pub async fn create_exercise(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(workout_id): Path<DbId>,
    Json(input): Json<CreateExercise>,
) -> AppResult<impl IntoResponse> {
    workout::validate_name("exercise", &input.name)?;
    ensure_editable_workout(&state.pool, auth.user_id, workout_id).await?;

    let created = WorkoutExerciseRepo::create(&state.pool, workout_id, &input).await?;
    tracing::info!(workout_id, id = created.id, name = %created.name, "Exercise added");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PATCH /workouts/{id}/exercises/{exercise_id}
// ---------------------------------------------------------------------------

pub async fn update_exercise(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((workout_id, exercise_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateExercise>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        workout::validate_name("exercise", name)?;
    }
    ensure_editable_workout(&state.pool, auth.user_id, workout_id).await?;

    let updated = WorkoutExerciseRepo::update(&state.pool, workout_id, exercise_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkoutExercise",
            id: exercise_id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /workouts/{id}/exercises/{exercise_id}
// ---------------------------------------------------------------------------

/// Remove an exercise and, by cascade, its sets.
pub async fn delete_exercise(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((workout_id, exercise_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_editable_workout(&state.pool, auth.user_id, workout_id).await?;

    let deleted = WorkoutExerciseRepo::delete(&state.pool, workout_id, exercise_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "WorkoutExercise",
            id: exercise_id,
        }));
    }
    tracing::info!(workout_id, exercise_id, "Exercise removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /workouts/{id}/exercises/{exercise_id}/sets
// ---------------------------------------------------------------------------

pub async fn create_set(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((workout_id, exercise_id)): Path<(DbId, DbId)>,
    Json(input): Json<CreateSet>,
) -> AppResult<impl IntoResponse> {
    workout::validate_reps(input.reps)?;
    if let Some(weight) = input.weight_kg {
        workout::validate_weight(weight)?;
    }
    if matches!(input.set_number, Some(n) if n < 1) {
        return Err(AppError::BadRequest(
            "set_number must be at least 1".to_string(),
        ));
    }
    ensure_editable_workout(&state.pool, auth.user_id, workout_id).await?;
    ensure_exercise_exists(&state.pool, workout_id, exercise_id).await?;

    let created = WorkoutSetRepo::create(&state.pool, exercise_id, &input).await?;
    tracing::debug!(
        exercise_id,
        set_number = created.set_number,
        reps = created.reps,
        weight_kg = created.weight_kg,
        "Set logged",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PATCH /workouts/{id}/exercises/{exercise_id}/sets/{set_id}
// ---------------------------------------------------------------------------

pub async fn update_set(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((workout_id, exercise_id, set_id)): Path<(DbId, DbId, DbId)>,
    Json(input): Json<UpdateSet>,
) -> AppResult<impl IntoResponse> {
    if let Some(reps) = input.reps {
        workout::validate_reps(reps)?;
    }
    if let Some(weight) = input.weight_kg {
        workout::validate_weight(weight)?;
    }
    ensure_editable_workout(&state.pool, auth.user_id, workout_id).await?;
    ensure_exercise_exists(&state.pool, workout_id, exercise_id).await?;

    let updated = WorkoutSetRepo::update(&state.pool, exercise_id, set_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "WorkoutSet",
            id: set_id,
        }))?;
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /workouts/{id}/exercises/{exercise_id}/sets/{set_id}
// ---------------------------------------------------------------------------

pub async fn delete_set(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((workout_id, exercise_id, set_id)): Path<(DbId, DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    ensure_editable_workout(&state.pool, auth.user_id, workout_id).await?;
    ensure_exercise_exists(&state.pool, workout_id, exercise_id).await?;

    let deleted = WorkoutSetRepo::delete(&state.pool, exercise_id, set_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "WorkoutSet",
            id: set_id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
