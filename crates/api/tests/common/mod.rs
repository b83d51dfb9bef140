#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use levelup_core::types::UserId;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use levelup_api::auth::jwt::{generate_access_token, JwtConfig};
use levelup_api::config::ServerConfig;
use levelup_api::jikan::JikanClient;
use levelup_api::router::build_app_router;
use levelup_api::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-secret-for-integration-tests";

/// Unreachable Jikan address used by tests that never call out.
pub const OFFLINE_JIKAN_URL: &str = "http://127.0.0.1:9";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(jikan_base_url: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            audience: None,
            access_token_expiry_mins: 15,
        },
        jikan_base_url: jikan_base_url.to_string(),
        calendar_sync_interval_secs: 0,
    }
}

/// Build the full application router, using the given database pool and a
/// Jikan client that points nowhere.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_jikan(pool, OFFLINE_JIKAN_URL)
}

/// Build the full application router against a specific Jikan base URL.
pub fn build_test_app_with_jikan(pool: PgPool, jikan_base_url: &str) -> Router {
    let config = test_config(jikan_base_url);
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        jikan: Arc::new(JikanClient::new(jikan_base_url.to_string())),
    };
    build_app_router(state, &config)
}

/// A fresh random user id.
pub fn new_user_id() -> UserId {
    Uuid::new_v4()
}

/// Sign an access token for `user_id` with the test secret.
pub fn token_for(user_id: UserId) -> String {
    let config = test_config(OFFLINE_JIKAN_URL);
    generate_access_token(user_id, &config.jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

// ---------------------------------------------------------------------------
// Fake Jikan
// ---------------------------------------------------------------------------

/// Serve canned Jikan responses on an ephemeral local port and return the
/// base URL. `routes` maps a path (e.g. `/anime`) to the JSON it returns.
pub async fn spawn_fake_jikan(routes: Vec<(&'static str, serde_json::Value)>) -> String {
    let mut router = Router::new();
    for (path, payload) in routes {
        router = router.route(
            path,
            axum::routing::get(move || {
                let payload = payload.clone();
                async move { axum::Json(payload) }
            }),
        );
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}
