//! HTTP-level tests for parties, invite codes and shared lists.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, delete_auth, get_auth, new_user_id, patch_json_auth, post_auth, post_json_auth,
    token_for,
};
use levelup_core::party;
use levelup_core::types::UserId;
use serde_json::json;
use sqlx::PgPool;

struct Member {
    id: UserId,
    token: String,
}

fn member() -> Member {
    let id = new_user_id();
    Member {
        id,
        token: token_for(id),
    }
}

/// Create a party and return `(party_id, invite_code)`.
async fn create_party(pool: &PgPool, owner: &Member, name: &str) -> (i64, String) {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/parties", json!({"name": name}), &owner.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    (
        json["data"]["id"].as_i64().unwrap(),
        json["data"]["invite_code"].as_str().unwrap().to_string(),
    )
}

async fn join(pool: &PgPool, who: &Member, code: &str) -> StatusCode {
    let app = common::build_test_app(pool.clone());
    post_json_auth(app, "/api/v1/parties/join", json!({"invite_code": code}), &who.token)
        .await
        .status()
}

#[sqlx::test(migrations = "../db/migrations")]
async fn creator_becomes_owner(pool: PgPool) {
    let owner = member();

    let app = common::build_test_app(pool.clone());
    let response =
        post_json_auth(app, "/api/v1/parties", json!({"name": "Watch club"}), &owner.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let code = json["data"]["invite_code"].as_str().unwrap();
    assert_eq!(code.len(), 6);
    assert_eq!(json["data"]["owner_id"], owner.id.to_string());
    assert_eq!(json["data"]["members"][0]["role"], "owner");

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/parties", &owner.token).await).await;
    assert_eq!(json["data"][0]["role"], "owner");
    assert_eq!(json["data"][0]["member_count"], 1);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn join_by_code_is_case_insensitive_and_idempotent(pool: PgPool) {
    let owner = member();
    let guest = member();
    let (party_id, code) = create_party(&pool, &owner, "Club").await;

    assert_eq!(join(&pool, &guest, &format!("  {} ", code.to_lowercase())).await, StatusCode::OK);
    assert_eq!(join(&pool, &guest, &code).await, StatusCode::OK);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/parties/{party_id}"), &guest.token).await).await;
    assert_eq!(json["data"]["members"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_or_malformed_codes_are_rejected(pool: PgPool) {
    let guest = member();
    assert_eq!(join(&pool, &guest, "ZZZZZZ").await, StatusCode::NOT_FOUND);
    assert_eq!(join(&pool, &guest, "abc").await, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn non_members_cannot_see_a_party(pool: PgPool) {
    let owner = member();
    let stranger = member();
    let (party_id, _) = create_party(&pool, &owner, "Private").await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/parties/{party_id}"), &stranger.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_only_actions(pool: PgPool) {
    let owner = member();
    let guest = member();
    let (party_id, code) = create_party(&pool, &owner, "Club").await;
    join(&pool, &guest, &code).await;

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/v1/parties/{party_id}"),
        json!({"name": "Hijacked"}),
        &guest.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("/api/v1/parties/{party_id}"),
        json!({"name": "Renamed"}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["name"], "Renamed");

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/parties/{party_id}/members/{}", owner.id),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(
        app,
        &format!("/api/v1/parties/{party_id}/members/{}", guest.id),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/parties/{party_id}"), &guest.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn regenerated_code_replaces_old_one(pool: PgPool) {
    let owner = member();
    let guest = member();
    let (party_id, old_code) = create_party(&pool, &owner, "Club").await;

    let app = common::build_test_app(pool.clone());
    let response = post_auth(app, &format!("/api/v1/parties/{party_id}/invite-code"), &owner.token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let new_code = body_json(response).await["data"]["invite_code"]
        .as_str()
        .unwrap()
        .to_string();

    if new_code != old_code {
        assert_eq!(join(&pool, &guest, &old_code).await, StatusCode::NOT_FOUND);
    }
    assert_eq!(join(&pool, &guest, &new_code).await, StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn owner_leaving_hands_over_then_last_leave_disbands(pool: PgPool) {
    let owner = member();
    let guest = member();
    let (party_id, code) = create_party(&pool, &owner, "Club").await;
    join(&pool, &guest, &code).await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(post_auth(app, &format!("/api/v1/parties/{party_id}/leave"), &owner.token).await).await;
    assert_eq!(json["data"]["outcome"], "ownership_transferred");
    assert_eq!(json["data"]["new_owner_id"], guest.id.to_string());

    let app = common::build_test_app(pool.clone());
    let json = body_json(post_auth(app, &format!("/api/v1/parties/{party_id}/leave"), &guest.token).await).await;
    assert_eq!(json["data"]["outcome"], "disbanded");

    // The code is free again and the party is gone.
    assert_eq!(join(&pool, &owner, &code).await, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn disbanded_party_is_hidden(pool: PgPool) {
    let owner = member();
    let (party_id, _) = create_party(&pool, &owner, "Short lived").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/parties/{party_id}"), &owner.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &format!("/api/v1/parties/{party_id}"), &owner.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/parties", &owner.token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Shared lists
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn tier_list_gets_default_tiers_and_accepts_moves(pool: PgPool) {
    let owner = member();
    let (party_id, _) = create_party(&pool, &owner, "Club").await;
    let lists_uri = format!("/api/v1/parties/{party_id}/lists");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &lists_uri,
        json!({"name": "Season ranking", "list_type": "tier_list"}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    let list_id = created["data"]["id"].as_i64().unwrap();
    assert_eq!(created["data"]["content"]["tiers"].as_array().unwrap().len(), 5);

    // Put two items in S through a whole-content update.
    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("{lists_uri}/{list_id}"),
        json!({"content": {"tiers": [
            {"name": "S", "items": [{"id": "a", "title": "Frieren"}, {"id": "b"}]},
            {"name": "A", "items": []}
        ]}}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("{lists_uri}/{list_id}/moves"),
        json!({"from_tier": 0, "from_index": 0, "to_tier": 1, "to_index": 0}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let tiers = &json["data"]["content"]["tiers"];
    assert_eq!(tiers[0]["items"].as_array().unwrap().len(), 1);
    assert_eq!(tiers[1]["items"][0]["id"], "a");
    assert_eq!(tiers[1]["items"][0]["title"], "Frieren");

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("{lists_uri}/{list_id}/moves"),
        json!({"from_tier": 7, "from_index": 0, "to_tier": 0, "to_index": 0}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn joining_a_full_party_is_a_conflict(pool: PgPool) {
    let owner = member();
    let (party_id, code) = create_party(&pool, &owner, "Full house").await;

    for _ in 1..party::MAX_PARTY_MEMBERS {
        assert_eq!(join(&pool, &member(), &code).await, StatusCode::OK);
    }

    let app = common::build_test_app(pool.clone());
    let late = member();
    let response = post_json_auth(
        app,
        "/api/v1/parties/join",
        json!({"invite_code": code}),
        &late.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("/api/v1/parties/{party_id}"), &owner.token).await).await;
    assert_eq!(
        json["data"]["members"].as_array().unwrap().len() as i64,
        party::MAX_PARTY_MEMBERS
    );
}

#[sqlx::test(migrations = "../db/migrations")]
async fn tier_move_over_a_newer_edit_is_a_conflict(pool: PgPool) {
    let owner = member();
    let (party_id, _) = create_party(&pool, &owner, "Club").await;
    let lists_uri = format!("/api/v1/parties/{party_id}/lists");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &lists_uri,
        json!({"name": "Ranking", "list_type": "tier_list"}),
        &owner.token,
    )
    .await;
    let list_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool.clone());
    let response = patch_json_auth(
        app,
        &format!("{lists_uri}/{list_id}"),
        json!({"content": {"tiers": [
            {"name": "S", "items": [{"id": "a"}]},
            {"name": "A", "items": []}
        ]}}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    // Another writer edits the list and holds its row lock until the move
    // has read the old version and is waiting to write.
    let mut other = pool.begin().await.unwrap();
    sqlx::query("UPDATE party_shared_lists SET name = 'Renamed' WHERE id = $1")
        .bind(list_id)
        .execute(&mut *other)
        .await
        .unwrap();

    let app = common::build_test_app(pool.clone());
    let uri = format!("{lists_uri}/{list_id}/moves");
    let token = owner.token.clone();
    let mv = tokio::spawn(async move {
        post_json_auth(
            app,
            &uri,
            json!({"from_tier": 0, "from_index": 0, "to_tier": 1, "to_index": 0}),
            &token,
        )
        .await
    });

    let mut waiting = false;
    for _ in 0..500 {
        waiting = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM pg_stat_activity
                WHERE datname = current_database() AND wait_event_type = 'Lock'
             )",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        if waiting {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    assert!(waiting, "the move never reached the locked row");
    other.commit().await.unwrap();

    let response = mv.await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");

    // A fresh read sees the other edit and the item still in S.
    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &format!("{lists_uri}/{list_id}"), &owner.token).await).await;
    assert_eq!(json["data"]["name"], "Renamed");
    assert_eq!(json["data"]["content"]["tiers"][0]["items"][0]["id"], "a");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn watchlist_rules(pool: PgPool) {
    let owner = member();
    let stranger = member();
    let (party_id, _) = create_party(&pool, &owner, "Club").await;
    let lists_uri = format!("/api/v1/parties/{party_id}/lists");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &lists_uri,
        json!({"name": "Backlog", "list_type": "watchlist", "content": {"items": "nope"}}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &lists_uri,
        json!({"name": "Backlog", "list_type": "watchlist"}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let list_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // Moves only apply to tier lists.
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("{lists_uri}/{list_id}/moves"),
        json!({"from_tier": 0, "from_index": 0, "to_tier": 0, "to_index": 0}),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, &lists_uri, &stranger.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("{lists_uri}/{list_id}"), &owner.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, &lists_uri, &owner.token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}
