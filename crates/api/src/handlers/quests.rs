//! Handlers for quests, completions and quest statistics.
//!
//! "Today" is the UTC calendar date at request time; completion periods are
//! derived from it with [`quest::period_start`].

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{Days, NaiveDate, Utc};
use levelup_core::error::CoreError;
use levelup_core::exp::ExpSummary;
use levelup_core::quest;
use levelup_core::types::{DbId, UserId};
use levelup_db::models::quest::{CreateQuest, Quest, QuestCompletion, UpdateQuest};
use levelup_db::repositories::{QuestCompletionRepo, QuestRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::profile::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::query::{DateRangeParams, IncludeInactiveParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Default look-back for the completion history when `from` is omitted.
const DEFAULT_HISTORY_DAYS: u64 = 30;

/// Returned after completing a quest.
#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub completion: QuestCompletion,
    pub exp: ExpSummary,
    pub leveled_up: bool,
}

/// Returned after undoing a completion.
#[derive(Debug, Serialize)]
pub struct UndoResponse {
    pub exp_removed: i32,
    pub exp: ExpSummary,
}

#[derive(Debug, Serialize)]
pub struct QuestStats {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub completed_today: usize,
    pub total_completions: i64,
    pub exp: ExpSummary,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

async fn ensure_quest_exists(pool: &PgPool, user_id: UserId, id: DbId) -> AppResult<Quest> {
    QuestRepo::find_for_user(pool, user_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quest", id }))
}

// ---------------------------------------------------------------------------
// GET /quests
// ---------------------------------------------------------------------------

/// List quests with a flag telling whether each is done for its current
/// period. Inactive quests are hidden unless `?include_inactive=true`.
pub async fn list_quests(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let quests =
        QuestRepo::list_with_status(&state.pool, auth.user_id, today(), params.include_inactive)
            .await?;
    Ok(Json(DataResponse { data: quests }))
}

// ---------------------------------------------------------------------------
// POST /quests
// ---------------------------------------------------------------------------

pub async fn create_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuest>,
) -> AppResult<impl IntoResponse> {
    quest::validate_title(&input.title)?;
    if let Some(ref frequency) = input.frequency {
        quest::validate_frequency(frequency)?;
    }
    if let Some(reward) = input.exp_reward {
        quest::validate_exp_reward(reward)?;
    }

    ensure_profile(&state.pool, auth.user_id).await?;
    let created = QuestRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(
        id = created.id,
        frequency = %created.frequency,
        exp_reward = created.exp_reward,
        "Quest created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /quests/{id}
// ---------------------------------------------------------------------------

pub async fn get_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let q = ensure_quest_exists(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: q }))
}

// ---------------------------------------------------------------------------
// PATCH /quests/{id}
// ---------------------------------------------------------------------------

pub async fn update_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateQuest>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref title) = input.title {
        quest::validate_title(title)?;
    }
    if let Some(ref frequency) = input.frequency {
        quest::validate_frequency(frequency)?;
    }
    if let Some(reward) = input.exp_reward {
        quest::validate_exp_reward(reward)?;
    }

    let updated = QuestRepo::update(&state.pool, auth.user_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Quest", id }))?;
    tracing::info!(id, is_active = updated.is_active, "Quest updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /quests/{id}
// ---------------------------------------------------------------------------

/// Delete a quest. EXP already earned from it is kept.
pub async fn delete_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = QuestRepo::delete(&state.pool, auth.user_id, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Quest", id }));
    }
    tracing::info!(id, "Quest deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /quests/{id}/complete
// ---------------------------------------------------------------------------

/// Complete a quest for its current period and award its EXP.
///
/// A second completion in the same period is a 409; the award happens in
/// the same transaction as the completion row.
pub async fn complete_quest(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let q = ensure_quest_exists(&state.pool, auth.user_id, id).await?;
    if !q.is_active {
        return Err(AppError::Core(CoreError::Conflict(
            "inactive quests cannot be completed".to_string(),
        )));
    }

    ensure_profile(&state.pool, auth.user_id).await?;
    let period = quest::period_start(&q.frequency, today());
    let outcome = QuestCompletionRepo::complete(&state.pool, &q, period)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "quest already completed for the period starting {period}"
            )))
        })?;

    let exp = ExpSummary::from_total(outcome.total_exp);
    let before = outcome.total_exp - i64::from(outcome.completion.exp_awarded);
    let leveled_up = exp.leveled_up_from(before);

    tracing::info!(
        quest_id = id,
        user_id = %auth.user_id,
        exp_awarded = outcome.completion.exp_awarded,
        total_exp = outcome.total_exp,
        leveled_up,
        "Quest completed",
    );
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CompletionResponse {
                completion: outcome.completion,
                exp,
                leveled_up,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// DELETE /quests/{id}/complete
// ---------------------------------------------------------------------------

/// Undo the current-period completion and take back the EXP it awarded.
pub async fn undo_completion(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let q = ensure_quest_exists(&state.pool, auth.user_id, id).await?;
    let period = quest::period_start(&q.frequency, today());

    let outcome = QuestCompletionRepo::undo(&state.pool, q.id, auth.user_id, period)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "QuestCompletion",
            id,
        }))?;

    tracing::info!(
        quest_id = id,
        exp_removed = outcome.exp_removed,
        total_exp = outcome.total_exp,
        "Quest completion undone",
    );
    Ok(Json(DataResponse {
        data: UndoResponse {
            exp_removed: outcome.exp_removed,
            exp: ExpSummary::from_total(outcome.total_exp),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /quests/stats
// ---------------------------------------------------------------------------

pub async fn quest_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state.pool, auth.user_id).await?;
    let today = today();

    let days = QuestCompletionRepo::completion_days(&state.pool, auth.user_id).await?;
    let completed_today =
        QuestCompletionRepo::list_for_user(&state.pool, auth.user_id, today, today)
            .await?
            .len();
    let total_completions = QuestCompletionRepo::count_for_user(&state.pool, auth.user_id).await?;

    Ok(Json(DataResponse {
        data: QuestStats {
            current_streak: quest::current_streak(&days, today),
            longest_streak: quest::longest_streak(&days),
            completed_today,
            total_completions,
            exp: ExpSummary::from_total(profile.total_exp),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /quests/completions
// ---------------------------------------------------------------------------

/// Completion history, newest first. Defaults to the last 30 days.
pub async fn list_completions(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> AppResult<impl IntoResponse> {
    let to = params.to.unwrap_or_else(today);
    let from = match params.from {
        Some(from) => from,
        None => to
            .checked_sub_days(Days::new(DEFAULT_HISTORY_DAYS))
            .ok_or_else(|| {
                CoreError::Validation(format!("'to' ({to}) is outside the supported calendar"))
            })?,
    };
    if to < from {
        return Err(AppError::BadRequest(format!(
            "'to' ({to}) must not be before 'from' ({from})"
        )));
    }

    let completions = QuestCompletionRepo::list_for_user(&state.pool, auth.user_id, from, to).await?;
    Ok(Json(DataResponse { data: completions }))
}
