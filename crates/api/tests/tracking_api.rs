//! HTTP-level tests for the anime watch-list and manga collection.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, new_user_id, patch_json_auth, post_auth, post_json_auth,
    token_for,
};
use serde_json::json;
use sqlx::PgPool;

async fn create_anime(pool: &PgPool, token: &str, body: serde_json::Value) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/anime", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Anime
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn new_anime_defaults_to_plan_to_watch(pool: PgPool) {
    let token = token_for(new_user_id());
    let entry = create_anime(&pool, &token, json!({"title": "Frieren", "mal_id": 52991})).await;

    assert_eq!(entry["status"], "plan_to_watch");
    assert_eq!(entry["episodes_watched"], 0);
    assert!(entry["id"].is_number());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn progress_on_create_starts_watching(pool: PgPool) {
    let token = token_for(new_user_id());
    let entry = create_anime(
        &pool,
        &token,
        json!({"title": "Dungeon Meshi", "episodes_watched": 3, "total_episodes": 24}),
    )
    .await;
    assert_eq!(entry["status"], "watching");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn increment_completes_on_last_episode(pool: PgPool) {
    let token = token_for(new_user_id());
    let entry = create_anime(
        &pool,
        &token,
        json!({"title": "Short", "episodes_watched": 1, "total_episodes": 2}),
    )
    .await;
    let id = entry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/anime/{id}/increment"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["episodes_watched"], 2);
    assert_eq!(json["data"]["status"], "completed");

    // Past the total is rejected and nothing changes.
    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/anime/{id}/increment"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/anime/{id}"), &token).await).await;
    assert_eq!(json["data"]["episodes_watched"], 2);
}

/// Fire `count` increments at once and return the status of each.
async fn increment_concurrently(pool: &PgPool, uri: String, token: &str, count: usize) -> Vec<StatusCode> {
    let mut handles = Vec::with_capacity(count);
    for _ in 0..count {
        let app = common::build_test_app(pool.clone());
        let uri = uri.clone();
        let token = token.to_string();
        handles.push(tokio::spawn(async move {
            post_auth(app, &uri, &token).await.status()
        }));
    }
    let mut statuses = Vec::with_capacity(count);
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }
    statuses
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_increments_are_all_counted(pool: PgPool) {
    let token = token_for(new_user_id());
    let entry = create_anime(&pool, &token, json!({"title": "Long", "total_episodes": 100})).await;
    let id = entry["id"].as_i64().unwrap();

    let statuses =
        increment_concurrently(&pool, format!("/api/v1/anime/{id}/increment"), &token, 20).await;
    assert!(statuses.iter().all(|s| *s == StatusCode::OK));

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/anime/{id}"), &token).await).await;
    assert_eq!(json["data"]["episodes_watched"], 20);
    assert_eq!(json["data"]["status"], "watching");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_increments_stop_at_total(pool: PgPool) {
    let token = token_for(new_user_id());
    let entry = create_anime(&pool, &token, json!({"title": "Five", "total_episodes": 5})).await;
    let id = entry["id"].as_i64().unwrap();

    let statuses =
        increment_concurrently(&pool, format!("/api/v1/anime/{id}/increment"), &token, 8).await;
    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let rejected = statuses.iter().filter(|s| **s == StatusCode::BAD_REQUEST).count();
    assert_eq!((ok, rejected), (5, 3));

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/anime/{id}"), &token).await).await;
    assert_eq!(json["data"]["episodes_watched"], 5);
    assert_eq!(json["data"]["status"], "completed");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_manga_increments_are_all_counted(pool: PgPool) {
    let token = token_for(new_user_id());
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/manga",
        json!({"title": "Vagabond", "total_chapters": 327, "total_volumes": 37}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let chapters =
        increment_concurrently(&pool, format!("/api/v1/manga/{id}/increment"), &token, 12).await;
    let volumes = increment_concurrently(
        &pool,
        format!("/api/v1/manga/{id}/increment?field=volumes"),
        &token,
        6,
    )
    .await;
    assert!(chapters.iter().chain(&volumes).all(|s| *s == StatusCode::OK));

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/manga/{id}"), &token).await).await;
    assert_eq!(json["data"]["chapters_read"], 12);
    assert_eq!(json["data"]["volumes_owned"], 6);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn duplicate_mal_id_is_a_conflict(pool: PgPool) {
    let token = token_for(new_user_id());
    create_anime(&pool, &token, json!({"title": "Frieren", "mal_id": 52991})).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/anime",
        json!({"title": "Frieren again", "mal_id": 52991}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn invalid_anime_input_is_rejected(pool: PgPool) {
    let token = token_for(new_user_id());

    for body in [
        json!({"title": ""}),
        json!({"title": "X", "status": "binging"}),
        json!({"title": "X", "score": 11}),
        json!({"title": "X", "episodes_watched": 5, "total_episodes": 3}),
        json!({"title": "X", "image_url": "ftp://nope"}),
    ] {
        let app = common::build_test_app(pool.clone());
        let response = post_json_auth(app, "/api/v1/anime", body.clone(), &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn list_filters_by_status_and_owner(pool: PgPool) {
    let token = token_for(new_user_id());
    let other = token_for(new_user_id());
    create_anime(&pool, &token, json!({"title": "A", "status": "watching"})).await;
    create_anime(&pool, &token, json!({"title": "B", "status": "dropped"})).await;
    create_anime(&pool, &other, json!({"title": "C", "status": "watching"})).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/anime", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/anime?status=watching", &token).await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "A");

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/anime?status=nope", &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn other_users_entries_are_invisible(pool: PgPool) {
    let owner = token_for(new_user_id());
    let intruder = token_for(new_user_id());
    let entry = create_anime(&pool, &owner, json!({"title": "Mine"})).await;
    let id = entry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/anime/{id}"), &intruder).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/anime/{id}"), &intruder).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn patch_progress_rederives_status(pool: PgPool) {
    let token = token_for(new_user_id());
    let entry = create_anime(&pool, &token, json!({"title": "Twelve", "total_episodes": 12})).await;
    let id = entry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/v1/anime/{id}"),
        json!({"episodes_watched": 12, "score": 9}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["score"], 9);

    // Shrinking the total below progress is rejected.
    let app = common::build_test_app(pool);
    let response = patch_json_auth(
        app,
        &format!("/api/v1/anime/{id}"),
        json!({"total_episodes": 6}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn delete_anime_returns_204(pool: PgPool) {
    let token = token_for(new_user_id());
    let entry = create_anime(&pool, &token, json!({"title": "Gone"})).await;
    let id = entry["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/anime/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/anime/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Manga
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn manga_increment_chapters_and_volumes(pool: PgPool) {
    let token = token_for(new_user_id());

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/manga",
        json!({"title": "Berserk", "total_volumes": 4, "total_chapters": 10}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["data"]["status"], "plan_to_read");
    assert_eq!(created["data"]["collection_percent"], 0);
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let json = body_json(post_auth(app, &format!("/api/v1/manga/{id}/increment"), &token).await).await;
    assert_eq!(json["data"]["chapters_read"], 1);
    assert_eq!(json["data"]["status"], "reading");

    let app = common::build_test_app(pool.clone());
    let json = body_json(
        post_auth(app, &format!("/api/v1/manga/{id}/increment?field=volumes"), &token).await,
    )
    .await;
    assert_eq!(json["data"]["volumes_owned"], 1);
    assert_eq!(json["data"]["chapters_read"], 1);
    assert_eq!(json["data"]["collection_percent"], 25);

    let app = common::build_test_app(pool);
    let response =
        post_auth(app, &format!("/api/v1/manga/{id}/increment?field=pages"), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn manga_crud_round_trip(pool: PgPool) {
    let token = token_for(new_user_id());

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/manga",
            json!({"title": "Vagabond", "status": "on_hold"}),
            &token,
        )
        .await,
    )
    .await;
    let id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/v1/manga/{id}"),
        json!({"notes": "waiting for the author"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["notes"], "waiting for the author");
    assert_eq!(json["data"]["status"], "on_hold");

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/manga?status=on_hold", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/manga/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
