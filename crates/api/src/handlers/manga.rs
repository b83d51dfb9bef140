//! Handlers for the manga collection.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use levelup_core::error::CoreError;
use levelup_core::profile::validate_image_url;
use levelup_core::types::{DbId, UserId};
use levelup_core::{anime, manga};
use levelup_core::manga::ProgressField;
use levelup_db::models::manga::{CreateMangaEntry, MangaEntry, UpdateMangaEntry};
use levelup_db::repositories::MangaRepo;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::profile::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::query::StatusFilter;
use crate::response::DataResponse;
use crate::state::AppState;

/// Collection entry with the derived ownership percentage.
#[derive(Debug, Serialize)]
pub struct MangaResponse {
    #[serde(flatten)]
    pub entry: MangaEntry,
    pub collection_percent: Option<i32>,
}

impl From<MangaEntry> for MangaResponse {
    fn from(entry: MangaEntry) -> Self {
        let collection_percent = manga::collection_percent(entry.volumes_owned, entry.total_volumes);
        Self {
            entry,
            collection_percent,
        }
    }
}

/// `?field=chapters|volumes` for the increment endpoint.
#[derive(Debug, Deserialize)]
pub struct IncrementParams {
    pub field: Option<String>,
}

async fn ensure_entry_exists(pool: &PgPool, user_id: UserId, id: DbId) -> AppResult<MangaEntry> {
    MangaRepo::find_for_user(pool, user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MangaEntry",
            id,
        }))
}

// ---------------------------------------------------------------------------
// GET /manga
// ---------------------------------------------------------------------------

pub async fn list_manga(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<StatusFilter>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref status) = params.status {
        manga::validate_status(status)?;
    }
    let items: Vec<MangaResponse> =
        MangaRepo::list_for_user(&state.pool, auth.user_id, params.status.as_deref())
            .await?
            .into_iter()
            .map(MangaResponse::from)
            .collect();
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// POST /manga
// ---------------------------------------------------------------------------

pub async fn create_manga(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateMangaEntry>,
) -> AppResult<impl IntoResponse> {
    anime::validate_title(&input.title)?;
    anime::validate_score(input.score)?;
    let chapters = input.chapters_read.unwrap_or(0);
    anime::validate_progress("chapters_read", chapters, input.total_chapters)?;
    anime::validate_progress(
        "volumes_owned",
        input.volumes_owned.unwrap_or(0),
        input.total_volumes,
    )?;
    if let Some(ref url) = input.image_url {
        validate_image_url(url)?;
    }
    let status = match input.status.as_deref() {
        Some(s) => {
            manga::validate_status(s)?;
            s
        }
        None => manga::next_status_after_progress(
            manga::DEFAULT_STATUS,
            chapters,
            input.total_chapters,
        ),
    };

    ensure_profile(&state.pool, auth.user_id).await?;
    let created = MangaRepo::create(&state.pool, auth.user_id, status, &input).await?;
    tracing::info!(id = created.id, title = %created.title, "Manga entry created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MangaResponse::from(created),
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /manga/{id}
// ---------------------------------------------------------------------------

pub async fn get_manga(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entry = ensure_entry_exists(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse {
        data: MangaResponse::from(entry),
    }))
}

// ---------------------------------------------------------------------------
// PATCH /manga/{id}
// ---------------------------------------------------------------------------

pub async fn update_manga(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateMangaEntry>,
) -> AppResult<impl IntoResponse> {
    let existing = ensure_entry_exists(&state.pool, auth.user_id, id).await?;

    if let Some(ref title) = input.title {
        anime::validate_title(title)?;
    }
    if let Some(ref status) = input.status {
        manga::validate_status(status)?;
    }
    if let Some(ref url) = input.image_url {
        validate_image_url(url)?;
    }
    anime::validate_score(input.score)?;

    let chapters = input.chapters_read.unwrap_or(existing.chapters_read);
    let total_chapters = input.total_chapters.or(existing.total_chapters);
    anime::validate_progress("chapters_read", chapters, total_chapters)?;
    anime::validate_progress(
        "volumes_owned",
        input.volumes_owned.unwrap_or(existing.volumes_owned),
        input.total_volumes.or(existing.total_volumes),
    )?;

    if input.status.is_none() && chapters != existing.chapters_read {
        let next = manga::next_status_after_progress(&existing.status, chapters, total_chapters);
        if next != existing.status {
            input.status = Some(next.to_string());
        }
    }

    let updated = MangaRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "MangaEntry",
            id,
        }))?;
    tracing::info!(id, status = %updated.status, "Manga entry updated");
    Ok(Json(DataResponse {
        data: MangaResponse::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// POST /manga/{id}/increment
// ---------------------------------------------------------------------------

/// Bump the chapter counter, or the owned-volume counter with
/// `?field=volumes`.
pub async fn increment_manga(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<IncrementParams>,
) -> AppResult<impl IntoResponse> {
    let field = ProgressField::parse(params.field.as_deref())?;
    let updated = MangaRepo::update_progress(&state.pool, auth.user_id, id, |entry| {
        match field {
            ProgressField::Chapters => {
                let chapters = anime::increment_progress(
                    field.column_label(),
                    entry.chapters_read,
                    entry.total_chapters,
                )?;
                let status =
                    manga::next_status_after_progress(&entry.status, chapters, entry.total_chapters);
                Ok::<_, AppError>((chapters, entry.volumes_owned, status.to_string()))
            }
            ProgressField::Volumes => {
                let volumes = anime::increment_progress(
                    field.column_label(),
                    entry.volumes_owned,
                    entry.total_volumes,
                )?;
                Ok((entry.chapters_read, volumes, entry.status.clone()))
            }
        }
    })
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "MangaEntry",
        id,
    }))?;
    tracing::info!(
        id,
        field = field.column_label(),
        chapters_read = updated.chapters_read,
        volumes_owned = updated.volumes_owned,
        "Manga progress incremented",
    );
    Ok(Json(DataResponse {
        data: MangaResponse::from(updated),
    }))
}

// ---------------------------------------------------------------------------
// DELETE /manga/{id}
// ---------------------------------------------------------------------------

pub async fn delete_manga(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = MangaRepo::delete(&state.pool, auth.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "MangaEntry",
            id,
        }));
    }
    tracing::info!(id, "Manga entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
