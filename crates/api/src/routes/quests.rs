//! Route definitions for quests.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::quests;
use crate::state::AppState;

/// Quest routes mounted at `/quests`.
///
/// ```text
/// GET    /                 -> list_quests (?include_inactive=)
/// POST   /                 -> create_quest
/// GET    /stats            -> quest_stats
/// GET    /completions      -> list_completions (?from=&to=)
/// GET    /{id}             -> get_quest
/// PATCH  /{id}             -> update_quest
/// DELETE /{id}             -> delete_quest
/// POST   /{id}/complete    -> complete_quest
/// DELETE /{id}/complete    -> undo_completion
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quests::list_quests).post(quests::create_quest))
        .route("/stats", get(quests::quest_stats))
        .route("/completions", get(quests::list_completions))
        .route(
            "/{id}",
            get(quests::get_quest)
                .patch(quests::update_quest)
                .delete(quests::delete_quest),
        )
        .route(
            "/{id}/complete",
            post(quests::complete_quest).delete(quests::undo_completion),
        )
}
