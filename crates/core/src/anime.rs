//! Anime watch-list statuses, validation and progress rules.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

pub const STATUS_WATCHING: &str = "watching";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ON_HOLD: &str = "on_hold";
pub const STATUS_DROPPED: &str = "dropped";
pub const STATUS_PLAN_TO_WATCH: &str = "plan_to_watch";

/// All valid watch-list statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_WATCHING,
    STATUS_COMPLETED,
    STATUS_ON_HOLD,
    STATUS_DROPPED,
    STATUS_PLAN_TO_WATCH,
];

/// Statuses whose titles count as followed for release tracking.
pub const TRACKED_STATUSES: &[&str] = &[STATUS_WATCHING, STATUS_PLAN_TO_WATCH, STATUS_ON_HOLD];

/// Status assigned when a new entry does not specify one.
pub const DEFAULT_STATUS: &str = STATUS_PLAN_TO_WATCH;

/// Lowest and highest allowed user score.
pub const MIN_SCORE: i16 = 1;
pub const MAX_SCORE: i16 = 10;

/// Maximum length of a title.
pub const MAX_TITLE_LEN: usize = 300;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown anime status: '{status}'. Valid statuses: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Validate a title shared by anime and manga entries.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// A score is optional, but when present must be within 1..=10.
pub fn validate_score(score: Option<i16>) -> Result<(), CoreError> {
    match score {
        Some(s) if !(MIN_SCORE..=MAX_SCORE).contains(&s) => Err(CoreError::Validation(format!(
            "score must be between {MIN_SCORE} and {MAX_SCORE}, got {s}"
        ))),
        _ => Ok(()),
    }
}

/// Validate a progress counter against an optional known total.
///
/// `field` names the counter in the error message.
pub fn validate_progress(field: &str, count: i32, total: Option<i32>) -> Result<(), CoreError> {
    if count < 0 {
        return Err(CoreError::Validation(format!(
            "{field} must be >= 0, got {count}"
        )));
    }
    if let Some(total) = total {
        if total < 0 {
            return Err(CoreError::Validation(format!(
                "total for {field} must be >= 0, got {total}"
            )));
        }
        if count > total {
            return Err(CoreError::Validation(format!(
                "{field} ({count}) exceeds total ({total})"
            )));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Progress rules
// ---------------------------------------------------------------------------

/// Status an entry should move to after its episode count changes.
///
/// - Reaching the known final episode completes the entry unless it was
///   dropped or put on hold.
/// - A planned entry with any progress is being watched.
pub fn next_status_after_progress(current: &str, watched: i32, total: Option<i32>) -> &str {
    let finished = matches!(total, Some(t) if t > 0 && watched >= t);
    match current {
        STATUS_WATCHING | STATUS_PLAN_TO_WATCH if finished => STATUS_COMPLETED,
        STATUS_PLAN_TO_WATCH if watched > 0 => STATUS_WATCHING,
        other => other,
    }
}

/// Increment a progress counter by one, refusing to pass a known total.
pub fn increment_progress(field: &str, count: i32, total: Option<i32>) -> Result<i32, CoreError> {
    let next = count.saturating_add(1);
    validate_progress(field, next, total)?;
    Ok(next)
}
