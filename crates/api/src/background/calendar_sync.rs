//! Periodic import of the Jikan airing schedule into the release calendar.
//!
//! Each run fetches the schedule for the next seven days, keeps only the
//! titles some user is following, and upserts them as user-less calendar
//! rows. Synced rows older than [`RETENTION_DAYS`] are pruned.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, Utc};
use levelup_core::calendar;
use levelup_db::models::calendar::SyncedRelease;
use levelup_db::repositories::{AnimeRepo, CalendarRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use crate::jikan::{JikanClient, JikanError};

/// Days ahead covered by one sync, today included.
pub const SYNC_WINDOW_DAYS: i64 = 7;

/// Synced entries released more than this many days ago are deleted.
pub const RETENTION_DAYS: i64 = 30;

/// Upper bound on schedule pages fetched per weekday.
const MAX_PAGES_PER_DAY: u32 = 5;

/// Pause between Jikan requests; the public API allows about 3 per second.
const REQUEST_SPACING: Duration = Duration::from_millis(400);

/// Errors that abort a sync run.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("jikan error: {0}")]
    Jikan(#[from] JikanError),

    /// Shutdown was requested while the schedule was being fetched.
    #[error("sync cancelled")]
    Cancelled,
}

/// Counters from one sync run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncReport {
    pub tracked_titles: usize,
    pub releases_found: usize,
    pub rows_written: u64,
    pub rows_pruned: u64,
}

/// Run the calendar sync loop every `interval` until `cancel` is triggered.
///
/// The first run happens immediately. A failed run is logged and retried
/// on the next tick.
pub async fn run(
    pool: PgPool,
    jikan: Arc<JikanClient>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Calendar sync job started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Calendar sync job stopping");
                break;
            }
            _ = ticker.tick() => {
                let today = Utc::now().date_naive();
                match sync_once(&pool, &jikan, today, &cancel).await {
                    Ok(report) => {
                        tracing::info!(
                            tracked = report.tracked_titles,
                            found = report.releases_found,
                            written = report.rows_written,
                            pruned = report.rows_pruned,
                            "Calendar sync: run complete"
                        );
                    }
                    Err(SyncError::Cancelled) => {
                        tracing::info!("Calendar sync: run interrupted by shutdown");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Calendar sync: run failed");
                    }
                }
            }
        }
    }
}

/// Perform one sync for the window starting at `today`.
///
/// `cancel` is checked before every schedule page; a cancelled run returns
/// [`SyncError::Cancelled`] without writing anything.
pub async fn sync_once(
    pool: &PgPool,
    jikan: &JikanClient,
    today: NaiveDate,
    cancel: &CancellationToken,
) -> Result<SyncReport, SyncError> {
    let tracked: HashSet<i64> = AnimeRepo::list_tracked_mal_ids(pool)
        .await?
        .into_iter()
        .collect();

    let mut report = SyncReport {
        tracked_titles: tracked.len(),
        ..Default::default()
    };

    if !tracked.is_empty() {
        let releases = collect_releases(jikan, &tracked, today, cancel).await?;
        report.releases_found = releases.len();
        report.rows_written = CalendarRepo::upsert_synced(pool, &releases).await?;
    } else {
        tracing::debug!("Calendar sync: no tracked titles, skipping fetch");
    }

    let cutoff = today - chrono::Duration::days(RETENTION_DAYS);
    report.rows_pruned = CalendarRepo::delete_synced_before(pool, cutoff).await?;

    Ok(report)
}

async fn collect_releases(
    jikan: &JikanClient,
    tracked: &HashSet<i64>,
    today: NaiveDate,
    cancel: &CancellationToken,
) -> Result<Vec<SyncedRelease>, SyncError> {
    let mut releases = Vec::new();
    let mut first_request = true;

    for offset in 0..SYNC_WINDOW_DAYS {
        let date = today + chrono::Duration::days(offset);
        let mut seen_today = HashSet::new();

        for page in 1..=MAX_PAGES_PER_DAY {
            if !first_request {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(SyncError::Cancelled),
                    _ = tokio::time::sleep(REQUEST_SPACING) => {}
                }
            }
            first_request = false;
            if cancel.is_cancelled() {
                tracing::debug!(%date, page, "Calendar sync: cancelled before page");
                return Err(SyncError::Cancelled);
            }

            let (entries, has_next) = jikan.schedule_page(date.weekday(), page).await?;
            for entry in entries {
                if tracked.contains(&entry.mal_id) && seen_today.insert(entry.mal_id) {
                    releases.push(SyncedRelease {
                        mal_id: entry.mal_id,
                        title: entry.title,
                        media_type: calendar::MEDIA_TYPE_ANIME.to_string(),
                        release_date: date,
                        episode_number: None,
                        source: calendar::SOURCE_JIKAN.to_string(),
                    });
                }
            }
            if !has_next {
                break;
            }
        }
    }

    Ok(releases)
}
