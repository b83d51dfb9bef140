//! Route definitions for the release calendar.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::calendar;
use crate::state::AppState;

/// Calendar routes mounted at `/calendar`.
///
/// ```text
/// GET    /        -> list_calendar (?from=&to=&media_type=)
/// POST   /        -> create_calendar_entry
/// GET    /week    -> calendar_week (?date=&media_type=)
/// PATCH  /{id}    -> update_calendar_entry
/// DELETE /{id}    -> delete_calendar_entry
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(calendar::list_calendar).post(calendar::create_calendar_entry),
        )
        .route("/week", get(calendar::calendar_week))
        .route(
            "/{id}",
            patch(calendar::update_calendar_entry).delete(calendar::delete_calendar_entry),
        )
}
