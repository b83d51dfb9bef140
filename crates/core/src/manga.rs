//! Manga collection statuses and progress rules.
//!
//! Title, score and counter validation are shared with [`crate::anime`].

use crate::error::CoreError;

pub const STATUS_READING: &str = "reading";
pub const STATUS_COMPLETED: &str = "completed";
pub const STATUS_ON_HOLD: &str = "on_hold";
pub const STATUS_DROPPED: &str = "dropped";
pub const STATUS_PLAN_TO_READ: &str = "plan_to_read";

/// All valid reading statuses.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_READING,
    STATUS_COMPLETED,
    STATUS_ON_HOLD,
    STATUS_DROPPED,
    STATUS_PLAN_TO_READ,
];

pub const DEFAULT_STATUS: &str = STATUS_PLAN_TO_READ;

/// Statuses whose titles count as followed for release tracking.
pub const TRACKED_STATUSES: &[&str] = &[STATUS_READING, STATUS_PLAN_TO_READ, STATUS_ON_HOLD];

/// Counter targeted by `POST /manga/{id}/increment`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressField {
    Chapters,
    Volumes,
}

impl ProgressField {
    /// Parse the `?field=` query value; `None` means chapters.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw {
            None | Some("chapters") => Ok(Self::Chapters),
            Some("volumes") => Ok(Self::Volumes),
            Some(other) => Err(CoreError::Validation(format!(
                "Unknown progress field: '{other}'. Valid fields: chapters, volumes"
            ))),
        }
    }

    pub fn column_label(self) -> &'static str {
        match self {
            Self::Chapters => "chapters_read",
            Self::Volumes => "volumes_owned",
        }
    }
}

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown manga status: '{status}'. Valid statuses: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// Status after the chapter count changes. Owning volumes never changes
/// the reading status.
pub fn next_status_after_progress(current: &str, chapters_read: i32, total: Option<i32>) -> &str {
    let finished = matches!(total, Some(t) if t > 0 && chapters_read >= t);
    match current {
        STATUS_READING | STATUS_PLAN_TO_READ if finished => STATUS_COMPLETED,
        STATUS_PLAN_TO_READ if chapters_read > 0 => STATUS_READING,
        other => other,
    }
}

/// Share of known volumes owned, as a whole percentage.
pub fn collection_percent(volumes_owned: i32, total_volumes: Option<i32>) -> Option<i32> {
    match total_volumes {
        Some(total) if total > 0 => Some((volumes_owned.max(0).min(total) * 100) / total),
        _ => None,
    }
}
