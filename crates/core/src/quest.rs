//! Quest frequencies, rewards, completion periods and streaks.
//!
//! A completion belongs to a *period*: the calendar day for daily quests,
//! the ISO week (starting Monday) for weekly quests, and a single fixed
//! period for one-off quests. The database keeps at most one completion per
//! quest and period.

use std::collections::HashSet;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Frequencies
// ---------------------------------------------------------------------------

pub const FREQUENCY_DAILY: &str = "daily";
pub const FREQUENCY_WEEKLY: &str = "weekly";
pub const FREQUENCY_ONCE: &str = "once";

pub const VALID_FREQUENCIES: &[&str] = &[FREQUENCY_DAILY, FREQUENCY_WEEKLY, FREQUENCY_ONCE];

pub const DEFAULT_FREQUENCY: &str = FREQUENCY_DAILY;

// ---------------------------------------------------------------------------
// Rewards
// ---------------------------------------------------------------------------

pub const DEFAULT_EXP_REWARD: i32 = 10;
pub const MIN_EXP_REWARD: i32 = 1;
pub const MAX_EXP_REWARD: i32 = 1000;

pub const MAX_TITLE_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

pub fn validate_frequency(frequency: &str) -> Result<(), CoreError> {
    if VALID_FREQUENCIES.contains(&frequency) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown quest frequency: '{frequency}'. Valid frequencies: {}",
            VALID_FREQUENCIES.join(", ")
        )))
    }
}

pub fn validate_exp_reward(reward: i32) -> Result<(), CoreError> {
    if !(MIN_EXP_REWARD..=MAX_EXP_REWARD).contains(&reward) {
        return Err(CoreError::Validation(format!(
            "exp_reward must be between {MIN_EXP_REWARD} and {MAX_EXP_REWARD}, got {reward}"
        )));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), CoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "quest title must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "quest title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// First day of the period that `date` falls in for the given frequency.
///
/// Unknown frequencies are treated as daily; they are rejected on write.
pub fn period_start(frequency: &str, date: NaiveDate) -> NaiveDate {
    match frequency {
        FREQUENCY_WEEKLY => {
            date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
        }
        // 1970-01-01: every completion of a one-off quest shares this period.
        FREQUENCY_ONCE => NaiveDate::default(),
        _ => date,
    }
}

// ---------------------------------------------------------------------------
// Streaks
// ---------------------------------------------------------------------------

/// Count consecutive days with at least one completion, ending today.
///
/// If nothing has been completed today yet, the streak is still alive when
/// yesterday had a completion, and is counted from yesterday.
pub fn current_streak(completion_dates: &[NaiveDate], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = completion_dates.iter().copied().collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        let yesterday = today - Duration::days(1);
        if !days.contains(&yesterday) {
            return 0;
        }
        yesterday
    };

    let mut streak = 0;
    while days.contains(&cursor) {
        streak += 1;
        cursor -= Duration::days(1);
    }
    streak
}

/// Longest run of consecutive completion days anywhere in the history.
pub fn longest_streak(completion_dates: &[NaiveDate]) -> u32 {
    let mut days: Vec<NaiveDate> = completion_dates.to_vec();
    days.sort_unstable();
    days.dedup();

    let mut best = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;
    for day in days {
        run = match prev {
            Some(p) if day - p == Duration::days(1) => run + 1,
            _ => 1,
        };
        best = best.max(run);
        prev = Some(day);
    }
    best
}
