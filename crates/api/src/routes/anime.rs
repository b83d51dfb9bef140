//! Route definitions for the anime watch-list.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::anime;
use crate::state::AppState;

/// Anime routes mounted at `/anime`.
///
/// ```text
/// GET    /                 -> list_anime (?status=)
/// POST   /                 -> create_anime
/// GET    /{id}             -> get_anime
/// PATCH  /{id}             -> update_anime
/// DELETE /{id}             -> delete_anime
/// POST   /{id}/increment   -> increment_episode
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(anime::list_anime).post(anime::create_anime))
        .route(
            "/{id}",
            get(anime::get_anime)
                .patch(anime::update_anime)
                .delete(anime::delete_anime),
        )
        .route("/{id}/increment", post(anime::increment_episode))
}
