use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use levelup_core::error::CoreError;

use crate::jikan::JikanError;
use crate::response::ErrorResponse;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error type returned by every handler.
///
/// Domain failures arrive as [`CoreError`]; the other variants cover the
/// database, the Jikan proxy and request-level problems. All of them render
/// as `{ "error": ..., "code": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The Jikan API could not be reached or answered with an error.
    #[error("Upstream error: {0}")]
    Upstream(#[from] JikanError),

    /// Something looked up by a key other than its id (an invite code, a
    /// party member) does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Logged in full, answered with a generic message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Status, machine-readable code and client-facing message.
type ErrorParts = (StatusCode, &'static str, String);

fn internal(detail: &dyn std::fmt::Display) -> ErrorParts {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

impl AppError {
    fn parts(&self) -> ErrorParts {
        match self {
            AppError::Core(core) => core_parts(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Upstream(err) => {
                tracing::warn!(error = %err, "Jikan request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The anime database is unavailable, try again later".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        }
    }
}

fn core_parts(err: &CoreError) -> ErrorParts {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.parts();
        (status, Json(ErrorResponse { error, code })).into_response()
    }
}

/// Readable message for the unique constraints a client can trip.
fn unique_violation_message(constraint: &str) -> String {
    match constraint {
        "uq_profiles_username" => "That username is already taken".to_string(),
        "uq_anime_list_user_mal" => "This anime is already in your list".to_string(),
        "uq_manga_collection_user_mal" => "This manga is already in your collection".to_string(),
        "uq_quest_completions_quest_period" => {
            "Quest already completed for this period".to_string()
        }
        "uq_workout_sets_exercise_number" => {
            "An exercise cannot have two sets with the same number".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

/// Map a sqlx error onto the API's error codes.
///
/// Only constraints following the `uq_` (409) and `ck_` (400) naming
/// convention are reported to the client; other database failures are
/// logged and answered with a generic 500.
fn classify_sqlx_error(err: &sqlx::Error) -> ErrorParts {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            );
        }
        return internal(err);
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        // unique_violation
        Some("23505") if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            unique_violation_message(constraint),
        ),
        // check_violation
        Some("23514") if constraint.starts_with("ck_") => (
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            format!("Value violates check constraint: {constraint}"),
        ),
        _ => internal(db_err),
    }
}
