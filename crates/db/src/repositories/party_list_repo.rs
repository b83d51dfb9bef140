//! Repository for the `party_shared_lists` table.

use levelup_core::types::{DbId, Timestamp, UserId};
use sqlx::PgPool;

use crate::models::party::SharedList;

const COLUMNS: &str = "id, party_id, created_by, name, list_type, content, created_at, updated_at";

/// Provides CRUD operations for lists shared within a party.
pub struct PartyListRepo;

impl PartyListRepo {
    pub async fn list(pool: &PgPool, party_id: DbId) -> Result<Vec<SharedList>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM party_shared_lists
             WHERE party_id = $1
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, SharedList>(&query)
            .bind(party_id)
            .fetch_all(pool)
            .await
    }

    pub async fn find(
        pool: &PgPool,
        party_id: DbId,
        id: DbId,
    ) -> Result<Option<SharedList>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM party_shared_lists WHERE id = $1 AND party_id = $2");
        sqlx::query_as::<_, SharedList>(&query)
            .bind(id)
            .bind(party_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        party_id: DbId,
        created_by: UserId,
        name: &str,
        list_type: &str,
        content: &serde_json::Value,
    ) -> Result<SharedList, sqlx::Error> {
        let query = format!(
            "INSERT INTO party_shared_lists (party_id, created_by, name, list_type, content)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SharedList>(&query)
            .bind(party_id)
            .bind(created_by)
            .bind(name.trim())
            .bind(list_type)
            .bind(content)
            .fetch_one(pool)
            .await
    }

    /// Overwrite name and/or content. Last write wins.
    pub async fn update(
        pool: &PgPool,
        party_id: DbId,
        id: DbId,
        name: Option<&str>,
        content: Option<&serde_json::Value>,
    ) -> Result<Option<SharedList>, sqlx::Error> {
        let query = format!(
            "UPDATE party_shared_lists SET
                name = COALESCE($3, name),
                content = COALESCE($4, content)
             WHERE id = $1 AND party_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SharedList>(&query)
            .bind(id)
            .bind(party_id)
            .bind(name.map(str::trim))
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Write `content` only if the row still carries `expected_updated_at`.
    ///
    /// Returns `None` when another writer got there first (or the list is
    /// gone); the caller re-reads and retries.
    pub async fn update_content_if_unchanged(
        pool: &PgPool,
        party_id: DbId,
        id: DbId,
        content: &serde_json::Value,
        expected_updated_at: Timestamp,
    ) -> Result<Option<SharedList>, sqlx::Error> {
        let query = format!(
            "UPDATE party_shared_lists SET content = $3
             WHERE id = $1 AND party_id = $2 AND updated_at = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SharedList>(&query)
            .bind(id)
            .bind(party_id)
            .bind(content)
            .bind(expected_updated_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, party_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM party_shared_lists WHERE id = $1 AND party_id = $2")
            .bind(id)
            .bind(party_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
