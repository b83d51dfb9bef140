//! Repository for the `manga_collection` table.

use levelup_core::types::{DbId, UserId};
use sqlx::PgPool;

use crate::models::manga::{CreateMangaEntry, MangaEntry, UpdateMangaEntry};

const COLUMNS: &str = "id, user_id, mal_id, title, image_url, status, volumes_owned, \
    total_volumes, chapters_read, total_chapters, score, notes, created_at, updated_at";

/// Provides CRUD operations for a user's manga collection.
pub struct MangaRepo;

impl MangaRepo {
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        status: Option<&str>,
    ) -> Result<Vec<MangaEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM manga_collection
             WHERE user_id = $1 AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, MangaEntry>(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<MangaEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM manga_collection WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, MangaEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        status: &str,
        input: &CreateMangaEntry,
    ) -> Result<MangaEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO manga_collection
                (user_id, mal_id, title, image_url, status, volumes_owned, total_volumes,
                 chapters_read, total_chapters, score, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MangaEntry>(&query)
            .bind(user_id)
            .bind(input.mal_id)
            .bind(input.title.trim())
            .bind(&input.image_url)
            .bind(status)
            .bind(input.volumes_owned.unwrap_or(0))
            .bind(input.total_volumes)
            .bind(input.chapters_read.unwrap_or(0))
            .bind(input.total_chapters)
            .bind(input.score)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        input: &UpdateMangaEntry,
    ) -> Result<Option<MangaEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE manga_collection SET
                title = COALESCE($3, title),
                image_url = COALESCE($4, image_url),
                status = COALESCE($5, status),
                volumes_owned = COALESCE($6, volumes_owned),
                total_volumes = COALESCE($7, total_volumes),
                chapters_read = COALESCE($8, chapters_read),
                total_chapters = COALESCE($9, total_chapters),
                score = COALESCE($10, score),
                notes = COALESCE($11, notes)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MangaEntry>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.image_url)
            .bind(&input.status)
            .bind(input.volumes_owned)
            .bind(input.total_volumes)
            .bind(input.chapters_read)
            .bind(input.total_chapters)
            .bind(input.score)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Change the counters and status of a locked row.
    ///
    /// `apply` receives the row read with `FOR UPDATE` and returns
    /// `(chapters_read, volumes_owned, status)`. An error from `apply` rolls
    /// the transaction back. Returns `Ok(None)` if the entry does not exist.
    pub async fn update_progress<F, E>(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        apply: F,
    ) -> Result<Option<MangaEntry>, E>
    where
        F: FnOnce(&MangaEntry) -> Result<(i32, i32, String), E>,
        E: From<sqlx::Error>,
    {
        let mut tx = pool.begin().await?;

        let query = format!(
            "SELECT {COLUMNS} FROM manga_collection WHERE id = $1 AND user_id = $2 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, MangaEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(current) = current else {
            return Ok(None);
        };

        let (chapters_read, volumes_owned, status) = apply(&current)?;

        let query = format!(
            "UPDATE manga_collection
             SET chapters_read = $3, volumes_owned = $4, status = $5
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, MangaEntry>(&query)
            .bind(id)
            .bind(user_id)
            .bind(chapters_read)
            .bind(volumes_owned)
            .bind(&status)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn delete(pool: &PgPool, user_id: UserId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM manga_collection WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
