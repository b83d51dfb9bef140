//! Repository for the `release_calendar` table.
//!
//! A user's calendar is the union of their own manual entries and the
//! synced (user-less) entries for titles they follow.

use chrono::NaiveDate;
use levelup_core::types::{DbId, UserId};
use levelup_core::{anime, calendar, manga};
use sqlx::PgPool;

use crate::models::calendar::{
    CalendarEntry, CreateCalendarEntry, SyncedRelease, UpdateCalendarEntry,
};

const COLUMNS: &str = "id, user_id, mal_id, title, media_type, release_date, episode_number, \
    source, notes, created_at, updated_at";

/// Provides data access for the release calendar.
pub struct CalendarRepo;

impl CalendarRepo {
    /// Entries visible to `user_id` with `release_date` in `from..=to`,
    /// ordered by date.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
        media_type: Option<&str>,
    ) -> Result<Vec<CalendarEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM release_calendar rc
             WHERE rc.release_date BETWEEN $2 AND $3
               AND ($4::TEXT IS NULL OR rc.media_type = $4)
               AND (
                   rc.user_id = $1
                   OR (rc.user_id IS NULL AND (
                       (rc.media_type = '{anime_type}' AND rc.mal_id IN (
                           SELECT a.mal_id FROM anime_list a
                           WHERE a.user_id = $1 AND a.status = ANY($5)
                       ))
                       OR (rc.media_type = '{manga_type}' AND rc.mal_id IN (
                           SELECT m.mal_id FROM manga_collection m
                           WHERE m.user_id = $1 AND m.status = ANY($6)
                       ))
                   ))
               )
             ORDER BY rc.release_date, rc.title, rc.id",
            anime_type = calendar::MEDIA_TYPE_ANIME,
            manga_type = calendar::MEDIA_TYPE_MANGA,
        );
        sqlx::query_as::<_, CalendarEntry>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .bind(media_type)
            .bind(anime::TRACKED_STATUSES)
            .bind(manga::TRACKED_STATUSES)
            .fetch_all(pool)
            .await
    }

    /// A manual entry owned by `user_id`. Synced entries are read-only and
    /// never returned here.
    pub async fn find_for_user(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
    ) -> Result<Option<CalendarEntry>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM release_calendar WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, CalendarEntry>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &PgPool,
        user_id: UserId,
        input: &CreateCalendarEntry,
    ) -> Result<CalendarEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO release_calendar
                (user_id, mal_id, title, media_type, release_date, episode_number, source, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEntry>(&query)
            .bind(user_id)
            .bind(input.mal_id)
            .bind(input.title.trim())
            .bind(input.media_type.as_deref().unwrap_or(calendar::MEDIA_TYPE_ANIME))
            .bind(input.release_date)
            .bind(input.episode_number)
            .bind(calendar::SOURCE_MANUAL)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        user_id: UserId,
        id: DbId,
        input: &UpdateCalendarEntry,
    ) -> Result<Option<CalendarEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE release_calendar SET
                title = COALESCE($3, title),
                release_date = COALESCE($4, release_date),
                episode_number = COALESCE($5, episode_number),
                notes = COALESCE($6, notes)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CalendarEntry>(&query)
            .bind(id)
            .bind(user_id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(input.release_date)
            .bind(input.episode_number)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, user_id: UserId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM release_calendar WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert or refresh synced entries in one transaction.
    ///
    /// Entries are keyed by `(source, mal_id, release_date)`; an existing
    /// entry gets the latest title and episode number. Returns the number
    /// of rows written.
    pub async fn upsert_synced(
        pool: &PgPool,
        releases: &[SyncedRelease],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut written = 0;

        for release in releases {
            let result = sqlx::query(
                "INSERT INTO release_calendar
                    (user_id, mal_id, title, media_type, release_date, episode_number, source)
                 VALUES (NULL, $1, $2, $3, $4, $5, $6)
                 ON CONFLICT (source, mal_id, release_date) WHERE user_id IS NULL
                 DO UPDATE SET
                    title = EXCLUDED.title,
                    episode_number = EXCLUDED.episode_number",
            )
            .bind(release.mal_id)
            .bind(&release.title)
            .bind(&release.media_type)
            .bind(release.release_date)
            .bind(release.episode_number)
            .bind(&release.source)
            .execute(&mut *tx)
            .await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        Ok(written)
    }

    /// Drop synced entries released before `cutoff`. Manual entries are
    /// never pruned.
    pub async fn delete_synced_before(pool: &PgPool, cutoff: NaiveDate) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM release_calendar WHERE user_id IS NULL AND release_date < $1")
                .bind(cutoff)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
