//! Repository for the `anime_list` table.

use levelup_core::anime;
use levelup_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::anime::{AnimeEntry, CreateAnimeEntry, UpdateAnimeEntry};

const COLUMNS: &str = "id, user_id, mal_id, title, image_url, status, episodes_watched, \
    total_episodes, score, notes, created_at, updated_at";

/// Provides CRUD operations for a user's anime watch-list.
pub struct AnimeRepo;

impl AnimeRepo {
    /// List a user's entries, most recently touched first, optionally
    /// filtered by status.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        status: Option<&str>,
    ) -> Result<Vec<AnimeEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM anime_list
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, AnimeEntry>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<AnimeEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM anime_list WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, AnimeEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new entry. `status` is the already-resolved status.
    ///
    /// Adding the same `mal_id` twice violates `uq_anime_list_user_mal`.
    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        status: &str,
        input: &CreateAnimeEntry,
    ) -> Result<AnimeEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO anime_list
                (user_id, mal_id, title, image_url, status, episodes_watched,
                 total_episodes, score, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnimeEntry>(&query)
            .bind(user_id)
            .bind(input.mal_id)
            .bind(input.title.trim())
            .bind(&input.image_url)
            .bind(status)
            .bind(input.episodes_watched.unwrap_or(0))
            .bind(input.total_episodes)
            .bind(input.score)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Partially update an entry. Only non-`None` fields are changed.
    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        input: &UpdateAnimeEntry,
    ) -> Result<Option<AnimeEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE anime_list SET
                title = COALESCE($3, title),
                image_url = COALESCE($4, image_url),
                status = COALESCE($5, status),
                episodes_watched = COALESCE($6, episodes_watched),
                total_episodes = COALESCE($7, total_episodes),
                score = COALESCE($8, score),
                notes = COALESCE($9, notes)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AnimeEntry>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.image_url)
            .bind(&input.status)
            .bind(input.episodes_watched)
            .bind(input.total_episodes)
            .bind(input.score)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Change the episode counter and status of a locked row.
    ///
    /// The row is read with `FOR UPDATE` and `apply` computes the new
    /// `(episodes_watched, status)` from it, so concurrent increments queue
    /// up instead of overwriting each other. An error from `apply` rolls the
    /// transaction back. Returns `Ok(None)` if the entry does not exist.
    pub async fn update_progress<F, E>(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        apply: F,
    ) -> Result<Option<AnimeEntry>, E>
    where
        F: FnOnce(&AnimeEntry) -> Result<(i32, String), E>,
        E: From<sqlx::Error>,
    {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM anime_list WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, AnimeEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let (episodes_watched, status) = apply(&current)?;

        let query = format!(
            "UPDATE anime_list SET episodes_watched = $3, status = $4
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, AnimeEntry>(&query)
            .bind(id)
            .bind(user_id)
            .bind(episodes_watched)
            .bind(&status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete an entry. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: UserId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM anime_list WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Distinct `mal_id`s that any user is actively following, used by the
    /// schedule sync to decide which titles to fetch.
    pub async fn list_tracked_mal_ids(pool: &PgPool) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT DISTINCT mal_id FROM anime_list
             WHERE mal_id IS NOT NULL AND status = ANY($1)
             ORDER BY mal_id",
        )
        .bind(anime::TRACKED_STATUSES)
        .fetch_all(pool)
        .await
    }
}
