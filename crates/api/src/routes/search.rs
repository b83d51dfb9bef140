//! Route definitions for title search.

use axum::routing::get;
use axum::Router;

use crate::handlers::search;
use crate::state::AppState;

/// Search routes mounted at `/search`.
///
/// ```text
/// GET /anime  -> search_anime (?q=&limit=)
/// GET /manga  -> search_manga (?q=&limit=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/anime", get(search::search_anime))
        .route("/manga", get(search::search_manga))
}
