//! Repository for the `parties` table.
//!
//! Parties are soft-deleted: disbanding clears `is_active`, which also
//! releases the invite code for reuse.

use levelup_core::party;
use levelup_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::party::{Party, PartySummary};

const COLUMNS: &str = "id, name, owner_id, invite_code, is_active, created_at, updated_at";

/// Provides data access for parties.
pub struct PartyRepo;

impl PartyRepo {
    /// Create a party and enrol `owner_id` as its owner in one transaction.
    pub async fn create_with_owner(
        pool: &PgPool,
        name: &str,
        owner_id: UserId,
        invite_code: &str,
    ) -> Result<Party, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO parties (name, owner_id, invite_code)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, Party>(&query)
            .bind(name.trim())
            .bind(owner_id)
            .bind(invite_code)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO party_members (party_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(created.id)
            .bind(owner_id)
            .bind(party::ROLE_OWNER)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(created)
    }

    /// Whether an active party already uses `code`.
    pub async fn invite_code_in_use(pool: &PgPool, code: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM parties WHERE invite_code = $1 AND is_active)",
        )
        .bind(code)
        .fetch_one(pool)
        .await
    }

    pub async fn find_active(pool: &PgPool, id: DbId) -> Result<Option<Party>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parties WHERE id = $1 AND is_active");
        sqlx::query_as::<_, Party>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_active_by_invite_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Party>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM parties WHERE invite_code = $1 AND is_active");
        sqlx::query_as::<_, Party>(&query)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Active parties the user belongs to, with their role and the member
    /// count of each.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Vec<PartySummary>, sqlx::Error> {
        sqlx::query_as::<_, PartySummary>(
            "SELECT p.id, p.name, p.owner_id, p.invite_code, p.is_active,
                    p.created_at, p.updated_at,
                    m.role,
                    (SELECT COUNT(*) FROM party_members pm WHERE pm.party_id = p.id)
                        AS member_count
             FROM parties p
             JOIN party_members m ON m.party_id = p.id
             WHERE m.user_id = $1 AND p.is_active
             ORDER BY m.joined_at DESC, p.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn update_name(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Party>, sqlx::Error> {
        let query = format!(
            "UPDATE parties SET name = $2
             WHERE id = $1 AND is_active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Party>(&query)
            .bind(id)
            .bind(name.trim())
            .fetch_optional(pool)
            .await
    }

    /// Replace the invite code; the old one stops working immediately.
    pub async fn set_invite_code(
        pool: &PgPool,
        id: DbId,
        code: &str,
    ) -> Result<Option<Party>, sqlx::Error> {
        let query = format!(
            "UPDATE parties SET invite_code = $2
             WHERE id = $1 AND is_active
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Party>(&query)
            .bind(id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    /// Disband a party. Returns `true` if it was active.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE parties SET is_active = FALSE WHERE id = $1 AND is_active")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
