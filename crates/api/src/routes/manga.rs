//! Route definitions for the manga collection.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::manga;
use crate::state::AppState;

/// Manga routes mounted at `/manga`.
///
/// ```text
/// GET    /                 -> list_manga (?status=)
/// POST   /                 -> create_manga
/// GET    /{id}             -> get_manga
/// PATCH  /{id}             -> update_manga
/// DELETE /{id}             -> delete_manga
/// POST   /{id}/increment   -> increment_manga (?field=chapters|volumes)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(manga::list_manga).post(manga::create_manga))
        .route(
            "/{id}",
            get(manga::get_manga)
                .patch(manga::update_manga)
                .delete(manga::delete_manga),
        )
        .route("/{id}/increment", post(manga::increment_manga))
}
