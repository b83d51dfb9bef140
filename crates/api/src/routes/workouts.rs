//! Route definitions for workouts, exercises and sets.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::workouts;
use crate::state::AppState;

/// Workout routes mounted at `/workouts`.
///
/// ```text
/// GET    /                                          -> list_workouts (?status=&limit=&offset=)
/// POST   /                                          -> create_workout
/// GET    /{id}                                      -> get_workout
/// PATCH  /{id}                                      -> update_workout
/// DELETE /{id}                                      -> delete_workout
/// POST   /{id}/complete                             -> complete_workout
/// GET    /{id}/summary                              -> workout_summary
/// POST   /{id}/exercises                            -> create_exercise
/// PATCH  /{id}/exercises/{exercise_id}              -> update_exercise
/// DELETE /{id}/exercises/{exercise_id}              -> delete_exercise
/// POST   /{id}/exercises/{exercise_id}/sets         -> create_set
/// PATCH  /{id}/exercises/{exercise_id}/sets/{set_id} -> update_set
/// DELETE /{id}/exercises/{exercise_id}/sets/{set_id} -> delete_set
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route(
            "/{id}",
            get(workouts::get_workout)
                .patch(workouts::update_workout)
                .delete(workouts::delete_workout),
        )
        .route("/{id}/complete", post(workouts::complete_workout))
        .route("/{id}/summary", get(workouts::workout_summary))
        .route("/{id}/exercises", post(workouts::create_exercise))
        .route(
            "/{id}/exercises/{exercise_id}",
            patch(workouts::update_exercise).delete(workouts::delete_exercise),
        )
        .route(
            "/{id}/exercises/{exercise_id}/sets",
            post(workouts::create_set),
        )
        .route(
            "/{id}/exercises/{exercise_id}/sets/{set_id}",
            patch(workouts::update_set).delete(workouts::delete_set),
        )
}
