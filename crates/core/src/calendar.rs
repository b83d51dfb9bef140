//! Release calendar: media types, date ranges and display labels.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::error::CoreError;

pub const MEDIA_TYPE_ANIME: &str = "anime";
pub const MEDIA_TYPE_MANGA: &str = "manga";

pub const VALID_MEDIA_TYPES: &[&str] = &[MEDIA_TYPE_ANIME, MEDIA_TYPE_MANGA];

/// Entry added by the user.
pub const SOURCE_MANUAL: &str = "manual";
/// Entry imported by the schedule sync.
pub const SOURCE_JIKAN: &str = "jikan";

/// Widest range a single calendar query may cover.
pub const MAX_RANGE_DAYS: i64 = 366;

pub fn validate_media_type(media_type: &str) -> Result<(), CoreError> {
    if VALID_MEDIA_TYPES.contains(&media_type) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown media type: '{media_type}'. Valid types: {}",
            VALID_MEDIA_TYPES.join(", ")
        )))
    }
}

pub fn validate_range(from: NaiveDate, to: NaiveDate) -> Result<(), CoreError> {
    if to < from {
        return Err(CoreError::Validation(format!(
            "'to' ({to}) must not be before 'from' ({from})"
        )));
    }
    if (to - from).num_days() > MAX_RANGE_DAYS {
        return Err(CoreError::Validation(format!(
            "calendar range may span at most {MAX_RANGE_DAYS} days"
        )));
    }
    Ok(())
}

/// Monday and Sunday of the week containing `date`.
///
/// Fails for the first and last partial weeks of the supported date range.
pub fn week_bounds(date: NaiveDate) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset))
        .and_then(|monday| Some((monday, monday.checked_add_days(Days::new(6))?)))
        .ok_or_else(|| CoreError::Validation(format!("{date} is outside the supported calendar")))
}

/// Signed whole days from `today` to `date`.
pub fn days_until(date: NaiveDate, today: NaiveDate) -> i64 {
    (date - today).num_days()
}

/// Human label relative to today: "Today", "Tomorrow", "In 3 days", ...
pub fn relative_label(date: NaiveDate, today: NaiveDate) -> String {
    match days_until(date, today) {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        n if n > 1 => format!("In {n} days"),
        n => format!("{} days ago", -n),
    }
}

/// Short display form, e.g. `Mon, Jan 6`.
pub fn format_release_date(date: NaiveDate) -> String {
    date.format("%a, %b %-d").to_string()
}

/// One day of the week view.
#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay<T> {
    pub date: NaiveDate,
    pub label: String,
    pub display: String,
    pub entries: Vec<T>,
}

/// Lay entries out over the Monday-to-Sunday week containing `anchor`.
///
/// All seven days are present, in order, even when empty. Entries outside
/// the week are dropped; entries keep their input order within a day.
pub fn group_by_week<T, F>(
    entries: Vec<T>,
    anchor: NaiveDate,
    today: NaiveDate,
    date_of: F,
) -> Result<Vec<CalendarDay<T>>, CoreError>
where
    F: Fn(&T) -> NaiveDate,
{
    let (monday, _) = week_bounds(anchor)?;
    let mut days: Vec<CalendarDay<T>> = monday
        .iter_days()
        .take(7)
        .map(|date| {
            CalendarDay {
                date,
                label: relative_label(date, today),
                display: format_release_date(date),
                entries: Vec::new(),
            }
        })
        .collect();

    for entry in entries {
        let offset = (date_of(&entry) - monday).num_days();
        if let Ok(idx) = usize::try_from(offset) {
            if let Some(day) = days.get_mut(idx) {
                day.entries.push(entry);
            }
        }
    }
    Ok(days)
}
