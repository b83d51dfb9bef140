pub mod anime;
pub mod calendar;
pub mod health;
pub mod manga;
pub mod parties;
pub mod profile;
pub mod quests;
pub mod search;
pub mod workouts;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a Bearer token.
///
/// Route hierarchy:
///
/// ```text
/// /profile                                         get, update
///
/// /anime                                           list, create
/// /anime/{id}                                      get, update, delete
/// /anime/{id}/increment                            +1 episode (POST)
///
/// /manga                                           list, create
/// /manga/{id}                                      get, update, delete
/// /manga/{id}/increment                            +1 chapter or volume (POST)
///
/// /quests                                          list, create
/// /quests/stats                                    streaks and exp (GET)
/// /quests/completions                              completion history (GET)
/// /quests/{id}                                     get, update, delete
/// /quests/{id}/complete                            complete (POST), undo (DELETE)
///
/// /workouts                                        list, start
/// /workouts/{id}                                   detail, update, delete
/// /workouts/{id}/complete                          finish (POST)
/// /workouts/{id}/summary                           totals (GET)
/// /workouts/{id}/exercises                         add exercise (POST)
/// /workouts/{id}/exercises/{eid}                   update, delete
/// /workouts/{id}/exercises/{eid}/sets              log set (POST)
/// /workouts/{id}/exercises/{eid}/sets/{sid}        update, delete
///
/// /parties                                         mine, create
/// /parties/join                                    join by invite code (POST)
/// /parties/{id}                                    detail, rename, disband
/// /parties/{id}/leave                              leave (POST)
/// /parties/{id}/invite-code                        regenerate (POST)
/// /parties/{id}/members/{user_id}                  remove member (DELETE)
/// /parties/{id}/lists                              list, create
/// /parties/{id}/lists/{list_id}                    get, update, delete
/// /parties/{id}/lists/{list_id}/moves              tier-list move (POST)
///
/// /calendar                                        range, create
/// /calendar/week                                   week view (GET)
/// /calendar/{id}                                   update, delete
///
/// /search/anime                                    Jikan anime search (GET)
/// /search/manga                                    Jikan manga search (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/profile", profile::router())
        // Personal tracking lists.
        .nest("/anime", anime::router())
        .nest("/manga", manga::router())
        // Gamification.
        .nest("/quests", quests::router())
        .nest("/workouts", workouts::router())
        // Social.
        .nest("/parties", parties::router())
        .nest("/calendar", calendar::router())
        // Jikan proxy.
        .nest("/search", search::router())
}
