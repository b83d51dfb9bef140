//! Handlers for the caller's profile.
//!
//! Profiles are created lazily: the first authenticated request that needs
//! one inserts a row keyed by the token's user id.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use levelup_core::exp::ExpSummary;
use levelup_core::profile;
use levelup_core::types::UserId;
use levelup_db::models::profile::{Profile, UpdateProfile};
use levelup_db::repositories::ProfileRepo;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Profile plus derived level information.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub profile: Profile,
    pub exp: ExpSummary,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        let exp = ExpSummary::from_total(profile.total_exp);
        Self { profile, exp }
    }
}

/// Return the caller's profile, creating it on first use.
pub async fn ensure_profile(pool: &PgPool, user_id: UserId) -> AppResult<Profile> {
    let username = profile::default_username(&user_id);
    let fallback = profile::fallback_username(&user_id);
    let p = ProfileRepo::ensure_exists(pool, user_id, &username, &fallback).await?;
    Ok(p)
}

// ---------------------------------------------------------------------------
// GET /profile
// ---------------------------------------------------------------------------

pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let p = ensure_profile(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: ProfileResponse::from(p),
    }))
}

// ---------------------------------------------------------------------------
// PATCH /profile
// ---------------------------------------------------------------------------

pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref username) = input.username {
        profile::validate_username(username)?;
    }
    if let Some(ref name) = input.display_name {
        profile::validate_display_name(name)?;
    }
    if let Some(ref url) = input.avatar_url {
        profile::validate_image_url(url)?;
    }

    ensure_profile(&state.pool, auth.user_id).await?;
    let updated = ProfileRepo::update(&state.pool, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::InternalError("profile vanished during update".into()))?;

    tracing::info!(user_id = %auth.user_id, username = %updated.username, "Profile updated");
    Ok(Json(DataResponse {
        data: ProfileResponse::from(updated),
    }))
}
