//! Handlers for the anime watch-list.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use levelup_core::anime;
use levelup_core::error::CoreError;
use levelup_core::profile::validate_image_url;
use levelup_core::types::{DbId, UserId};
use levelup_db::models::anime::{AnimeEntry, CreateAnimeEntry, UpdateAnimeEntry};
use levelup_db::repositories::AnimeRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::profile::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_entry_exists(pool: &PgPool, user_id: UserId, id: DbId) -> AppResult<AnimeEntry> {
    AnimeRepo::find_for_user(pool, user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AnimeEntry",
            id,
        }))
}

// ---------------------------------------------------------------------------
// GET /anime
// ---------------------------------------------------------------------------

pub async fn list_anime(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        anime::validate_status(status)?;
    }
    let items = AnimeRepo::list_for_user(&state.pool, auth.user_id, params.status.as_deref()).await?;
    tracing::debug!(count = items.len(), "Listed anime entries");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /anime
// ---------------------------------------------------------------------------

/// Add a title. Without an explicit status the entry starts as
/// `plan_to_watch`, or `watching`/`completed` when progress is supplied.
pub async fn create_anime(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateAnimeEntry>,
) -> AppResult<impl IntoResponse> {
    anime::validate_title(&input.title)?;
    anime::validate_score(input.score)?;
    let watched = input.episodes_watched.unwrap_or(0);
    anime::validate_progress("episodes_watched", watched, input.total_episodes)?;
    if let Some(ref url) = input.image_url {
        validate_image_url(url)?;
    }
    let status = match input.status.as_deref() {
        Some(s) => {
            anime::validate_status(s)?;
            s
        }
        None => anime::next_status_after_progress(
            anime::DEFAULT_STATUS,
            watched,
            input.total_episodes,
        ),
    };

    ensure_profile(&state.pool, auth.user_id).await?;
    let created = AnimeRepo::create(&state.pool, auth.user_id, status, &input).await?;
    tracing::info!(id = created.id, title = %created.title, "Anime entry created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /anime/{id}
// ---------------------------------------------------------------------------

pub async fn get_anime(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = ensure_entry_exists(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: entry }))
}

// ---------------------------------------------------------------------------
// PATCH /anime/{id}
// ---------------------------------------------------------------------------

/// Partially update an entry. Counters are validated against the merged
/// totals; a progress change without an explicit status re-derives it.
pub async fn update_anime(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAnimeEntry>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_entry_exists(&state.pool, auth.user_id, id).await?;

    if let Some(ref title) = input.title {
        anime::validate_title(title)?;
    }
    if let Some(ref status) = input.status {
        anime::validate_status(status)?;
    }
    if let Some(ref url) = input.image_url {
        validate_image_url(url)?;
    }
    anime::validate_score(input.score)?;

    let watched = input.episodes_watched.unwrap_or(existing.episodes_watched);
    let total = input.total_episodes.or(existing.total_episodes);
    anime::validate_progress("episodes_watched", watched, total)?;

    if input.status.is_none() && watched != existing.episodes_watched {
        let next = anime::next_status_after_progress(&existing.status, watched, total);
        if next != existing.status {
            input.status = Some(next.to_string());
        }
    }

    let updated = AnimeRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AnimeEntry",
            id,
        }))?;
    tracing::info!(id, status = %updated.status, "Anime entry updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// POST /anime/{id}/increment
// ---------------------------------------------------------------------------

/// Mark one more episode watched.
pub async fn increment_episode(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let updated = AnimeRepo::update_progress(&state.pool, auth.user_id, id, |entry| {
        let watched = anime::increment_progress(
            "episodes_watched",
            entry.episodes_watched,
            entry.total_episodes,
        )?;
        let status = anime::next_status_after_progress(&entry.status, watched, entry.total_episodes);
        Ok::<_, AppError>((watched, status.to_string()))
    })
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "AnimeEntry",
        id,
    }))?;
    tracing::info!(
        id,
        episodes_watched = updated.episodes_watched,
        status = %updated.status,
        "Episode marked watched",
    );
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /anime/{id}
// ---------------------------------------------------------------------------

pub async fn delete_anime(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = AnimeRepo::delete(&state.pool, auth.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AnimeEntry",
            id,
        }));
    }
    tracing::info!(id, "Anime entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
