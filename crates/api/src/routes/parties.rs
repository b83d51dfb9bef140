//! Route definitions for parties and their shared lists.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::parties;
use crate::state::AppState;

/// Party routes mounted at `/parties`.
///
/// ```text
/// GET    /                                -> list_parties
/// POST   /                                -> create_party
/// POST   /join                            -> join_party
/// GET    /{id}                            -> get_party
/// PATCH  /{id}                            -> update_party (owner)
/// DELETE /{id}                            -> delete_party (owner)
/// POST   /{id}/leave                      -> leave_party
/// POST   /{id}/invite-code                -> regenerate_invite_code (owner)
/// DELETE /{id}/members/{user_id}          -> remove_member (owner)
/// GET    /{id}/lists                      -> list_shared_lists
/// POST   /{id}/lists                      -> create_shared_list
/// GET    /{id}/lists/{list_id}            -> get_shared_list
/// PATCH  /{id}/lists/{list_id}            -> update_shared_list
/// DELETE /{id}/lists/{list_id}            -> delete_shared_list
/// POST   /{id}/lists/{list_id}/moves      -> move_tier_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(parties::list_parties).post(parties::create_party),
        )
        .route("/join", post(parties::join_party))
        .route(
            "/{id}",
            get(parties::get_party)
                .patch(parties::update_party)
                .delete(parties::delete_party),
        )
        .route("/{id}/leave", post(parties::leave_party))
        .route("/{id}/invite-code", post(parties::regenerate_invite_code))
        .route("/{id}/members/{user_id}", delete(parties::remove_member))
        .route(
            "/{id}/lists",
            get(parties::list_shared_lists).post(parties::create_shared_list),
        )
        .route(
            "/{id}/lists/{list_id}",
            get(parties::get_shared_list)
                .patch(parties::update_shared_list)
                .delete(parties::delete_shared_list),
        )
        .route("/{id}/lists/{list_id}/moves", post(parties::move_tier_item))
}
