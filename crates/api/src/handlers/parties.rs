//! Handlers for parties, membership and shared lists.
//!
//! Parties are visible only to their members; for everyone else a party
//! looks the same as one that does not exist. Disbanded (inactive) parties
//! are hidden from every endpoint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use levelup_core::error::CoreError;
use levelup_core::invite;
use levelup_core::party;
use levelup_core::tier_list::{TierList, TierMove};
use levelup_core::types::{DbId, UserId};
use levelup_db::models::party::{
    CreateParty, CreateSharedList, JoinOutcome, JoinParty, LeaveOutcome, Party, PartyDetail,
    SharedList, UpdateParty, UpdateSharedList,
};
use levelup_db::repositories::{PartyListRepo, PartyMemberRepo, PartyRepo};
use serde::Serialize;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::handlers::profile::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of `POST /parties/{id}/leave`.
#[derive(Debug, Serialize)]
pub struct LeaveResponse {
    /// `left`, `ownership_transferred` or `disbanded`.
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_owner_id: Option<UserId>,
}

impl From<LeaveOutcome> for LeaveResponse {
    fn from(outcome: LeaveOutcome) -> Self {
        match outcome {
            LeaveOutcome::Left => Self {
                outcome: "left",
                new_owner_id: None,
            },
            LeaveOutcome::OwnershipTransferred(owner) => Self {
                outcome: "ownership_transferred",
                new_owner_id: Some(owner),
            },
            LeaveOutcome::Disbanded => Self {
                outcome: "disbanded",
                new_owner_id: None,
            },
        }
    }
}

fn party_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Party",
        id,
    })
}

fn list_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "SharedList",
        id,
    })
}

/// Load an active party and the caller's role in it.
async fn require_membership(
    pool: &PgPool,
    party_id: DbId,
    user_id: UserId,
) -> AppResult<(Party, String)> {
    let p = PartyRepo::find_active(pool, party_id)
        .await?
        .ok_or_else(|| party_not_found(party_id))?;
    let role = PartyMemberRepo::find_role(pool, party_id, user_id)
        .await?
        .ok_or_else(|| party_not_found(party_id))?;
    Ok((p, role))
}

/// Like [`require_membership`] but only for the owner.
async fn require_owner(pool: &PgPool, party_id: DbId, user_id: UserId) -> AppResult<Party> {
    let (p, role) = require_membership(pool, party_id, user_id).await?;
    party::ensure_owner(&role)?;
    Ok(p)
}

async fn allocate_invite_code(pool: &PgPool) -> AppResult<String> {
    let code = invite::find_unique_invite_code(|code| async move {
        PartyRepo::invite_code_in_use(pool, &code).await
    })
    .await?;
    code.ok_or_else(|| {
        AppError::InternalError(format!(
            "no free invite code after {} attempts",
            invite::MAX_INVITE_CODE_ATTEMPTS
        ))
    })
}

async fn load_detail(pool: &PgPool, p: Party) -> AppResult<PartyDetail> {
    let members = PartyMemberRepo::list(pool, p.id).await?;
    Ok(PartyDetail { party: p, members })
}

// ---------------------------------------------------------------------------
// GET /parties
// ---------------------------------------------------------------------------

pub async fn list_parties(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let parties = PartyRepo::list_for_user(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: parties }))
}

// ---------------------------------------------------------------------------
// POST /parties
// ---------------------------------------------------------------------------

/// Create a party with the caller as owner and a fresh invite code.
pub async fn create_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateParty>,
) -> AppResult<impl IntoResponse> {
    party::validate_name(&input.name)?;
    ensure_profile(&state.pool, auth.user_id).await?;

    let code = allocate_invite_code(&state.pool).await?;
    let created =
        PartyRepo::create_with_owner(&state.pool, input.name.trim(), auth.user_id, &code).await?;
    tracing::info!(id = created.id, owner_id = %auth.user_id, "Party created");

    let detail = load_detail(&state.pool, created).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

// ---------------------------------------------------------------------------
// POST /parties/join
// ---------------------------------------------------------------------------

/// Join an active party by invite code. Joining twice is a no-op.
pub async fn join_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<JoinParty>,
) -> AppResult<impl IntoResponse> {
    let code = invite::normalize_invite_code(&input.invite_code);
    invite::validate_invite_code(&code)?;

    let p = PartyRepo::find_active_by_invite_code(&state.pool, &code)
        .await?
        .ok_or_else(|| AppError::NotFound("No active party with that invite code".to_string()))?;

    ensure_profile(&state.pool, auth.user_id).await?;
    match PartyMemberRepo::join(&state.pool, p.id, auth.user_id, party::MAX_PARTY_MEMBERS).await? {
        JoinOutcome::Joined => {
            tracing::info!(party_id = p.id, user_id = %auth.user_id, "Joined party");
        }
        JoinOutcome::AlreadyMember => {
            tracing::debug!(party_id = p.id, user_id = %auth.user_id, "Already a member");
        }
        JoinOutcome::Full => {
            party::ensure_has_room(party::MAX_PARTY_MEMBERS)?;
        }
        JoinOutcome::Inactive => {
            return Err(AppError::NotFound(
                "No active party with that invite code".to_string(),
            ));
        }
    }

    let detail = load_detail(&state.pool, p).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// GET /parties/{id}
// ---------------------------------------------------------------------------

pub async fn get_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let (p, _) = require_membership(&state.pool, id, auth.user_id).await?;
    let detail = load_detail(&state.pool, p).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// PATCH /parties/{id}
// ---------------------------------------------------------------------------

pub async fn update_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateParty>,
) -> AppResult<impl IntoResponse> {
    let p = require_owner(&state.pool, id, auth.user_id).await?;
    let Some(name) = input.name else {
        return Ok(Json(DataResponse { data: p }));
    };
    party::validate_name(&name)?;

    let updated = PartyRepo::update_name(&state.pool, id, name.trim())
        .await?
        .ok_or_else(|| party_not_found(id))?;
    tracing::info!(id, name = %updated.name, "Party renamed");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /parties/{id}
// ---------------------------------------------------------------------------

/// Disband a party. The row is kept but hidden, freeing its invite code.
pub async fn delete_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_owner(&state.pool, id, auth.user_id).await?;
    if !PartyRepo::deactivate(&state.pool, id).await? {
        return Err(party_not_found(id));
    }
    tracing::info!(id, "Party disbanded");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /parties/{id}/leave
// ---------------------------------------------------------------------------

pub async fn leave_party(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_membership(&state.pool, id, auth.user_id).await?;
    let outcome = PartyMemberRepo::leave(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| party_not_found(id))?;

    match outcome {
        LeaveOutcome::Left => tracing::info!(id, user_id = %auth.user_id, "Left party"),
        LeaveOutcome::OwnershipTransferred(owner) => {
            tracing::info!(id, new_owner_id = %owner, "Owner left, ownership transferred")
        }
        LeaveOutcome::Disbanded => tracing::info!(id, "Last member left, party disbanded"),
    }
    Ok(Json(DataResponse {
        data: LeaveResponse::from(outcome),
    }))
}

// ---------------------------------------------------------------------------
// POST /parties/{id}/invite-code
// ---------------------------------------------------------------------------

/// Replace the invite code. The old code stops working immediately.
pub async fn regenerate_invite_code(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_owner(&state.pool, id, auth.user_id).await?;
    let code = allocate_invite_code(&state.pool).await?;
    let updated = PartyRepo::set_invite_code(&state.pool, id, &code)
        .await?
        .ok_or_else(|| party_not_found(id))?;
    tracing::info!(id, "Invite code regenerated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /parties/{id}/members/{user_id}
// ---------------------------------------------------------------------------

pub async fn remove_member(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, member_id)): Path<(DbId, UserId)>,
) -> AppResult<impl IntoResponse> {
    require_owner(&state.pool, id, auth.user_id).await?;
    if member_id == auth.user_id {
        return Err(AppError::BadRequest(
            "The owner cannot remove themselves; leave the party instead".to_string(),
        ));
    }
    if !PartyMemberRepo::remove_member(&state.pool, id, member_id).await? {
        return Err(AppError::NotFound(format!(
            "User {member_id} is not a member of party {id}"
        )));
    }
    tracing::info!(id, member_id = %member_id, "Member removed");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// GET /parties/{id}/lists
// ---------------------------------------------------------------------------

pub async fn list_shared_lists(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    require_membership(&state.pool, id, auth.user_id).await?;
    let lists = PartyListRepo::list(&state.pool, id).await?;
    Ok(Json(DataResponse { data: lists }))
}

// ---------------------------------------------------------------------------
// POST /parties/{id}/lists
// ---------------------------------------------------------------------------

/// Create a shared list. Missing content starts from the type's default
/// (an empty watch-list, or a tier list with the standard tiers).
pub async fn create_shared_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateSharedList>,
) -> AppResult<impl IntoResponse> {
    party::validate_list_name(&input.name)?;
    party::validate_list_type(&input.list_type)?;
    let content = match input.content {
        Some(content) => {
            party::validate_list_content(&input.list_type, &content)?;
            content
        }
        None => party::default_list_content(&input.list_type)?,
    };
    require_membership(&state.pool, id, auth.user_id).await?;

    let created = PartyListRepo::create(
        &state.pool,
        id,
        auth.user_id,
        input.name.trim(),
        &input.list_type,
        &content,
    )
    .await?;
    tracing::info!(party_id = id, id = created.id, list_type = %created.list_type, "Shared list created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /parties/{id}/lists/{list_id}
// ---------------------------------------------------------------------------

async fn ensure_list_exists(pool: &PgPool, party_id: DbId, list_id: DbId) -> AppResult<SharedList> {
    PartyListRepo::find(pool, party_id, list_id)
        .await?
        .ok_or_else(|| list_not_found(list_id))
}

pub async fn get_shared_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, list_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    require_membership(&state.pool, id, auth.user_id).await?;
    let list = ensure_list_exists(&state.pool, id, list_id).await?;
    Ok(Json(DataResponse { data: list }))
}

// ---------------------------------------------------------------------------
// PATCH /parties/{id}/lists/{list_id}
// ---------------------------------------------------------------------------

/// Rename a list or replace its whole content.
pub async fn update_shared_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, list_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateSharedList>,
) -> AppResult<impl IntoResponse> {
    if let Some(ref name) = input.name {
        party::validate_list_name(name)?;
    }
    require_membership(&state.pool, id, auth.user_id).await?;
    let existing = ensure_list_exists(&state.pool, id, list_id).await?;
    if let Some(ref content) = input.content {
        party::validate_list_content(&existing.list_type, content)?;
    }

    let updated = PartyListRepo::update(
        &state.pool,
        id,
        list_id,
        input.name.as_deref().map(str::trim),
        input.content.as_ref(),
    )
    .await?
    .ok_or_else(|| list_not_found(list_id))?;
    tracing::info!(party_id = id, id = list_id, "Shared list updated");
    Ok(Json(DataResponse { data: updated }))
}

// ---------------------------------------------------------------------------
// DELETE /parties/{id}/lists/{list_id}
// ---------------------------------------------------------------------------

pub async fn delete_shared_list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, list_id)): Path<(DbId, DbId)>,
) -> AppResult<impl IntoResponse> {
    require_membership(&state.pool, id, auth.user_id).await?;
    if !PartyListRepo::delete(&state.pool, id, list_id).await? {
        return Err(list_not_found(list_id));
    }
    tracing::info!(party_id = id, id = list_id, "Shared list deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /parties/{id}/lists/{list_id}/moves
// ---------------------------------------------------------------------------

/// Apply one drag-and-drop move to a tier list.
///
/// The write only lands if the list is unchanged since it was read; a
/// concurrent edit yields 409 and the client reloads before retrying.
pub async fn move_tier_item(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, list_id)): Path<(DbId, DbId)>,
    Json(mv): Json<TierMove>,
) -> AppResult<impl IntoResponse> {
    require_membership(&state.pool, id, auth.user_id).await?;
    let list = ensure_list_exists(&state.pool, id, list_id).await?;
    if list.list_type != party::LIST_TYPE_TIER_LIST {
        return Err(AppError::BadRequest(format!(
            "Moves only apply to tier lists, this list is a {}",
            list.list_type
        )));
    }

    let mut tiers = TierList::from_value(&list.content)?;
    tiers.move_item(mv)?;
    let content = tiers.to_value()?;

    let updated =
        PartyListRepo::update_content_if_unchanged(&state.pool, id, list_id, &content, list.updated_at)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(
                    "tier list was modified concurrently; reload and retry".to_string(),
                ))
            })?;
    tracing::debug!(
        party_id = id,
        id = list_id,
        from_tier = mv.from_tier,
        to_tier = mv.to_tier,
        "Tier item moved",
    );
    Ok(Json(DataResponse { data: updated }))
}
