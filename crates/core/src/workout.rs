//! Workout status lifecycle, set validation and training summaries.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

pub const VALID_STATUSES: &[&str] = &[STATUS_IN_PROGRESS, STATUS_COMPLETED];

pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown workout status: '{status}'. Valid statuses: {}",
            VALID_STATUSES.join(", ")
        )))
    }
}

/// A workout only ever moves from `in_progress` to `completed`.
pub fn validate_transition(from: &str, to: &str) -> Result<(), CoreError> {
    validate_status(to)?;
    match (from, to) {
        (STATUS_IN_PROGRESS, STATUS_COMPLETED) => Ok(()),
        (STATUS_COMPLETED, STATUS_COMPLETED) => Err(CoreError::Conflict(
            "workout is already completed".to_string(),
        )),
        _ => Err(CoreError::Validation(format!(
            "cannot change workout status from '{from}' to '{to}'"
        ))),
    }
}

/// Exercises and sets can only be edited while the workout is running.
pub fn ensure_editable(status: &str) -> Result<(), CoreError> {
    if status == STATUS_COMPLETED {
        return Err(CoreError::Conflict(
            "completed workouts cannot be edited".to_string(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Names and sets
// ---------------------------------------------------------------------------

pub const MAX_NAME_LEN: usize = 120;

/// Heaviest weight accepted for a single set, in kilograms.
pub const MAX_WEIGHT_KG: f64 = 1000.0;

/// Most repetitions accepted for a single set.
pub const MAX_REPS: i32 = 10_000;

pub fn validate_name(kind: &str, name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!(
            "{kind} name must not be empty"
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "{kind} name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_reps(reps: i32) -> Result<(), CoreError> {
    if !(0..=MAX_REPS).contains(&reps) {
        return Err(CoreError::Validation(format!(
            "reps must be between 0 and {MAX_REPS}, got {reps}"
        )));
    }
    Ok(())
}

pub fn validate_weight(weight_kg: f64) -> Result<(), CoreError> {
    if !weight_kg.is_finite() {
        return Err(CoreError::Validation(
            "weight_kg must be a finite number".to_string(),
        ));
    }
    if !(0.0..=MAX_WEIGHT_KG).contains(&weight_kg) {
        return Err(CoreError::Validation(format!(
            "weight_kg must be between 0 and {MAX_WEIGHT_KG}, got {weight_kg}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Total lifted load: the sum of `reps * weight_kg` over all sets.
pub fn training_volume<I>(sets: I) -> f64
where
    I: IntoIterator<Item = (i32, f64)>,
{
    sets.into_iter()
        .map(|(reps, weight)| f64::from(reps) * weight)
        .sum()
}

/// Aggregated numbers for one workout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkoutSummary {
    pub exercise_count: usize,
    pub set_count: usize,
    pub total_reps: i64,
    pub total_volume_kg: f64,
    /// Elapsed seconds; up to `now` while the workout is still running.
    pub duration_secs: i64,
}

/// Build a summary from `(reps, weight_kg)` pairs of every set.
pub fn summarize(
    exercise_count: usize,
    sets: &[(i32, f64)],
    started_at: Timestamp,
    completed_at: Option<Timestamp>,
    now: Timestamp,
) -> WorkoutSummary {
    let end = completed_at.unwrap_or(now);
    WorkoutSummary {
        exercise_count,
        set_count: sets.len(),
        total_reps: sets.iter().map(|(reps, _)| i64::from(*reps)).sum(),
        total_volume_kg: training_volume(sets.iter().copied()),
        duration_secs: (end - started_at).num_seconds().max(0),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    #[test]
    fn only_in_progress_to_completed_is_allowed() {
        assert!(validate_transition(STATUS_IN_PROGRESS, STATUS_COMPLETED).is_ok());
        assert!(matches!(
            validate_transition(STATUS_COMPLETED, STATUS_COMPLETED),
            Err(CoreError::Conflict(_))
        ));
        assert!(matches!(
            validate_transition(STATUS_COMPLETED, STATUS_IN_PROGRESS),
            Err(CoreError::Validation(_))
        ));
        assert!(validate_transition(STATUS_IN_PROGRESS, "paused").is_err());
    }

    #[test]
    fn completed_workouts_are_frozen() {
        assert!(ensure_editable(STATUS_IN_PROGRESS).is_ok());
        assert!(ensure_editable(STATUS_COMPLETED).is_err());
    }

    #[test]
    fn set_validation() {
        assert!(validate_reps(0).is_ok());
        assert!(validate_reps(-1).is_err());
        assert!(validate_weight(0.0).is_ok());
        assert!(validate_weight(102.5).is_ok());
        assert!(validate_weight(-2.5).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
    }

    #[test]
    fn name_validation() {
        assert!(validate_name("exercise", "Bench press").is_ok());
        assert!(validate_name("exercise", " ").is_err());
    }

    #[test]
    fn volume_sums_reps_times_weight() {
        let sets = [(10, 60.0), (8, 70.0), (5, 0.0)];
        assert_eq!(training_volume(sets), 1160.0);
        assert_eq!(training_volume(Vec::<(i32, f64)>::new()), 0.0);
    }

    #[test]
    fn summary_uses_completion_time() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let end = start + Duration::minutes(45);
        let now = start + Duration::hours(5);
        let s = summarize(2, &[(10, 50.0), (10, 50.0), (12, 20.0)], start, Some(end), now);
        assert_eq!(s.exercise_count, 2);
        assert_eq!(s.set_count, 3);
        assert_eq!(s.total_reps, 32);
        assert_eq!(s.total_volume_kg, 1240.0);
        assert_eq!(s.duration_secs, 45 * 60);
    }

    #[test]
    fn running_summary_uses_now() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        let now = start + Duration::minutes(10);
        let s = summarize(0, &[], start, None, now);
        assert_eq!(s.duration_secs, 600);
        assert_eq!(s.total_volume_kg, 0.0);
    }
}
