//! Handlers for the release calendar.
//!
//! The calendar shows the caller's own entries plus schedule entries synced
//! from Jikan for titles the caller is still following.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{NaiveDate, Utc};
use levelup_core::calendar;
use levelup_core::error::CoreError;
use levelup_core::types::DbId;
use levelup_db::models::calendar::{CalendarEntry, CreateCalendarEntry, UpdateCalendarEntry};
use levelup_db::repositories::CalendarRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::profile::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// `?from=&to=&media_type=` for the calendar list.
#[derive(Debug, Deserialize)]
pub struct CalendarParams {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub media_type: Option<String>,
}

/// `?date=&media_type=` for the week view.
#[derive(Debug, Deserialize)]
pub struct WeekParams {
    pub date: Option<NaiveDate>,
    pub media_type: Option<String>,
}

/// A calendar entry with display fields relative to today.
#[derive(Debug, Serialize)]
pub struct CalendarEntryView {
    #[serde(flatten)]
    pub entry: CalendarEntry,
    pub days_until: i64,
    pub label: String,
    pub display: String,
}

impl CalendarEntryView {
    fn new(entry: CalendarEntry, today: NaiveDate) -> Self {
        Self {
            days_until: calendar::days_until(entry.release_date, today),
            label: calendar::relative_label(entry.release_date, today),
            display: calendar::format_release_date(entry.release_date),
            entry,
        }
    }
}

// ---------------------------------------------------------------------------
// GET /calendar
// ---------------------------------------------------------------------------

/// Entries in an inclusive date range, ordered by date. The range defaults
/// to the current Monday-to-Sunday week.
pub async fn list_calendar(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CalendarParams>,
) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let (week_start, week_end) = calendar::week_bounds(today)?;
    let from = params.from.unwrap_or(week_start);
    let to = params.to.unwrap_or(week_end);
    calendar::validate_range(from, to)?;
    if let Some(ref media_type) = params.media_type {
        calendar::validate_media_type(media_type)?;
    }

    let entries: Vec<CalendarEntryView> =
        CalendarRepo::list_for_user(&state.pool, auth.user_id, from, to, params.media_type.as_deref())
            .await?
            .into_iter()
            .map(|e| CalendarEntryView::new(e, today))
            .collect();
    Ok(Json(DataResponse { data: entries }))
}

// ---------------------------------------------------------------------------
// GET /calendar/week
// ---------------------------------------------------------------------------

/// The week containing `date` (default today), one bucket per day.
pub async fn calendar_week(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<WeekParams>,
) -> AppResult<impl IntoResponse> {
    let today = Utc::now().date_naive();
    let anchor = params.date.unwrap_or(today);
    if let Some(ref media_type) = params.media_type {
        calendar::validate_media_type(media_type)?;
    }
    let (monday, sunday) = calendar::week_bounds(anchor)?;

    let entries: Vec<CalendarEntryView> = CalendarRepo::list_for_user(
        &state.pool,
        auth.user_id,
        monday,
        sunday,
        params.media_type.as_deref(),
    )
    .await?
    .into_iter()
    .map(|e| CalendarEntryView::new(e, today))
    .collect();

    let days = calendar::group_by_week(entries, anchor, today, |v| v.entry.release_date)?;
    Ok(Json(DataResponse { data: days }))
}

// ---------------------------------------------------------------------------
// POST /calendar
// ---------------------------------------------------------------------------

pub async fn create_calendar_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateCalendarEntry>,
) -> AppResult<impl IntoResponse> {
    levelup_core::anime::validate_title(&input.title)?;
    if let Some(ref media_type) = input.media_type {
        calendar::validate_media_type(media_type)?;
    }
    if matches!(input.episode_number, Some(n) if n < 0) {
        return Err(AppError::BadRequest(
            "episode_number must not be negative".to_string(),
        ));
    }

    ensure_profile(&state.pool, auth.user_id).await?;
    let created = CalendarRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        id = created.id,
        release_date = %created.release_date,
        media_type = %created.media_type,
        "Calendar entry created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// PATCH /calendar/{id}
// ---------------------------------------------------------------------------

/// Update one of the caller's own entries. Synced entries are read-only and
/// report as not found.
pub async fn update_calendar_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCalendarEntry>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        levelup_core::anime::validate_title(title)?;
    }
    if matches!(input.episode_number, Some(n) if n < 0) {
        return Err(AppError::BadRequest(
            "episode_number must not be negative".to_string(),
        ));
    }

    let updated = CalendarRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CalendarEntry",
            id,
        }))?;
    tracing::info!(id, "Calendar entry updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /calendar/{id}
// ---------------------------------------------------------------------------

pub async fn delete_calendar_entry(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = CalendarRepo::delete(&state.pool, auth.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "CalendarEntry",
            id,
        }));
    }
    tracing::info!(id, "Calendar entry deleted");
    Ok(StatusCode::NO_CONTENT)
}
