//! Party, membership and shared-list models and DTOs.

use levelup_core::types::{DbId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `parties` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Party {
    pub id: DbId,
    pub name: String,
    pub owner_id: UserId,
    pub invite_code: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A party as seen by one member: includes that member's role and the
/// current member count.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartySummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub party: Party,
    pub role: String,
    pub member_count: i64,
}

/// A row from the `party_members` table joined with the member's profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartyMember {
    pub id: DbId,
    pub party_id: DbId,
    pub user_id: UserId,
    pub role: String,
    pub joined_at: Timestamp,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub total_exp: i64,
}

/// Party detail: the party plus its members.
#[derive(Debug, Clone, Serialize)]
pub struct PartyDetail {
    #[serde(flatten)]
    pub party: Party,
    pub members: Vec<PartyMember>,
}

/// A row from the `party_shared_lists` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SharedList {
    pub id: DbId,
    pub party_id: DbId,
    pub created_by: Option<UserId>,
    pub name: String,
    pub list_type: String,
    pub content: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
    Full,
    /// The party was disbanded before the join could land.
    Inactive,
}

/// Result of a member leaving a party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// A regular member left.
    Left,
    /// The owner left and ownership passed to the longest-standing member.
    OwnershipTransferred(UserId),
    /// The last member left and the party was disbanded.
    Disbanded,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateParty {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateParty {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinParty {
    pub invite_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSharedList {
    pub name: String,
    pub list_type: String,
    pub content: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSharedList {
    pub name: Option<String>,
    pub content: Option<serde_json::Value>,
}
