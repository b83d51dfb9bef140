//! Repository for the `profiles` table.

use levelup_core::types::UserId;
use sqlx::PgPool;

use crate::models::profile::{Profile, UpdateProfile};

const COLUMNS: &str = "id, username, display_name, avatar_url, total_exp, created_at, updated_at";

/// Provides data access for user profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    pub async fn find_by_id(pool: &PgPool, id: UserId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Return the profile for `id`, creating it on first use.
    ///
    /// Users arrive already authenticated by the identity provider, so the
    /// profile row is created lazily rather than through a sign-up call.
    /// `fallback_username` is used when `username` is already taken.
    pub async fn ensure_exists(
        pool: &PgPool,
        id: UserId,
        username: &str,
        fallback_username: &str,
    ) -> Result<Profile, sqlx::Error> {
        if let Some(profile) = Self::find_by_id(pool, id).await? {
            return Ok(profile);
        }

        for candidate in [username, fallback_username] {
            let query = format!(
                "INSERT INTO profiles (id, username) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING
                 RETURNING {COLUMNS}"
            );
            let inserted = sqlx::query_as::<_, Profile>(&query)
                .bind(id)
                .bind(candidate)
                .fetch_optional(pool)
                .await?;
            if let Some(profile) = inserted {
                return Ok(profile);
            }
            // A concurrent request may have created the row in the meantime.
            if let Some(profile) = Self::find_by_id(pool, id).await? {
                return Ok(profile);
            }
        }

        Err(sqlx::Error::RowNotFound)
    }

    /// Partially update a profile. Only provided fields change.
    pub async fn update(
        pool: &PgPool,
        id: UserId,
        dto: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                username = COALESCE($2, username),
                display_name = COALESCE($3, display_name),
                avatar_url = COALESCE($4, avatar_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&dto.username)
            .bind(&dto.display_name)
            .bind(&dto.avatar_url)
            .fetch_optional(pool)
            .await
    }
}
