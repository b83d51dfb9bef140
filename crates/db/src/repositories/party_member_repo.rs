//! Repository for the `party_members` table.

use levelup_core::party;
use levelup_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::party::{JoinOutcome, LeaveOutcome, PartyMember};

/// Member columns joined with the member's profile.
const MEMBER_SELECT: &str = "SELECT m.id, m.party_id, m.user_id, m.role, m.joined_at,
        pr.username, pr.display_name, pr.avatar_url, pr.total_exp
     FROM party_members m
     JOIN profiles pr ON pr.id = m.user_id";

/// Provides membership operations for parties.
pub struct PartyMemberRepo;

impl PartyMemberRepo {
    /// Members in join order, owner first.
    pub async fn list(pool: &PgPool, party_id: DbId) -> Result<Vec<PartyMember>, sqlx::Error> {
        let query = format!(
            "{MEMBER_SELECT}
             WHERE m.party_id = $1
             ORDER BY (m.role = '{owner}') DESC, m.joined_at, m.id",
            owner = party::ROLE_OWNER,
        );
        sqlx::query_as::<_, PartyMember>(&query)
            .bind(party_id)
            .fetch_all(pool)
            .await
    }

    /// Role of `user_id` in an active party, or `None` if not a member.
    pub async fn find_role(
        pool: &PgPool,
        party_id: DbId,
        user_id: UserId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT m.role FROM party_members m
             JOIN parties p ON p.id = m.party_id
             WHERE m.party_id = $1 AND m.user_id = $2 AND p.is_active",
        )
        .bind(party_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count(pool: &PgPool, party_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM party_members WHERE party_id = $1")
            .bind(party_id)
            .fetch_one(pool)
            .await
    }

    /// Add `user_id` to a party unless it is already a member or the party
    /// already holds `max_members`.
    ///
    /// The party row is locked for the duration so concurrent joins cannot
    /// overshoot the cap, and a party disbanded in the meantime (or missing)
    /// yields [`JoinOutcome::Inactive`].
    pub async fn join(
        pool: &PgPool,
        party_id: DbId,
        user_id: UserId,
        max_members: i64,
    ) -> Result<JoinOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let is_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM parties WHERE id = $1 FOR UPDATE")
                .bind(party_id)
                .fetch_optional(&mut *tx)
                .await?;
        if is_active != Some(true) {
            tx.rollback().await?;
            return Ok(JoinOutcome::Inactive);
        }

        let already: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                SELECT 1 FROM party_members WHERE party_id = $1 AND user_id = $2
             )",
        )
        .bind(party_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if already {
            tx.rollback().await?;
            return Ok(JoinOutcome::AlreadyMember);
        }

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM party_members WHERE party_id = $1")
            .bind(party_id)
            .fetch_one(&mut *tx)
            .await?;
        if count >= max_members {
            tx.rollback().await?;
            return Ok(JoinOutcome::Full);
        }

        sqlx::query("INSERT INTO party_members (party_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(party_id)
            .bind(user_id)
            .bind(party::ROLE_MEMBER)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(JoinOutcome::Joined)
    }

    /// Remove `user_id` from a party.
    ///
    /// When the owner leaves, ownership passes to the longest-standing
    /// remaining member; when nobody remains the party is disbanded.
    /// Returns `None` if the user was not a member.
    pub async fn leave(
        pool: &PgPool,
        party_id: DbId,
        user_id: UserId,
    ) -> Result<Option<LeaveOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM parties WHERE id = $1 FOR UPDATE")
            .bind(party_id)
            .execute(&mut *tx)
            .await?;

        let role: Option<String> = sqlx::query_scalar(
            "DELETE FROM party_members WHERE party_id = $1 AND user_id = $2 RETURNING role",
        )
        .bind(party_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(role) = role else {
            tx.rollback().await?;
            return Ok(None);
        };

        if role != party::ROLE_OWNER {
            tx.commit().await?;
            return Ok(Some(LeaveOutcome::Left));
        }

        let successor: Option<UserId> = sqlx::query_scalar(
            "SELECT user_id FROM party_members
             WHERE party_id = $1
             ORDER BY joined_at, id
             LIMIT 1",
        )
        .bind(party_id)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match successor {
            Some(next_owner) => {
                sqlx::query("UPDATE party_members SET role = $3 WHERE party_id = $1 AND user_id = $2")
                    .bind(party_id)
                    .bind(next_owner)
                    .bind(party::ROLE_OWNER)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query("UPDATE parties SET owner_id = $2 WHERE id = $1")
                    .bind(party_id)
                    .bind(next_owner)
                    .execute(&mut *tx)
                    .await?;
                LeaveOutcome::OwnershipTransferred(next_owner)
            }
            None => {
                sqlx::query("UPDATE parties SET is_active = FALSE WHERE id = $1")
                    .bind(party_id)
                    .execute(&mut *tx)
                    .await?;
                LeaveOutcome::Disbanded
            }
        };

        tx.commit().await?;
        Ok(Some(outcome))
    }

    /// Remove a regular member. The owner row is never removed here.
    pub async fn remove_member(
        pool: &PgPool,
        party_id: DbId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM party_members WHERE party_id = $1 AND user_id = $2 AND role = $3",
        )
        .bind(party_id)
        .bind(user_id)
        .bind(party::ROLE_MEMBER)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
