//! EXP and level arithmetic.
//!
//! Levels are linear: every [`EXP_PER_LEVEL`] points is one level, and a
//! fresh profile starts at level 1.

use serde::Serialize;

/// EXP required to advance one level.
pub const EXP_PER_LEVEL: i64 = 100;

/// Compute the level for a total EXP value: `floor(total / 100) + 1`.
///
/// Negative totals are treated as zero.
pub fn level_for_exp(total_exp: i64) -> i64 {
    total_exp.max(0) / EXP_PER_LEVEL + 1
}

/// EXP earned since reaching the current level.
pub fn exp_into_level(total_exp: i64) -> i64 {
    total_exp.max(0) % EXP_PER_LEVEL
}

/// EXP still needed to reach the next level.
pub fn exp_to_next_level(total_exp: i64) -> i64 {
    EXP_PER_LEVEL - exp_into_level(total_exp)
}

/// Progress through the current level as a whole percentage (0..=99).
pub fn level_progress_percent(total_exp: i64) -> i64 {
    exp_into_level(total_exp) * 100 / EXP_PER_LEVEL
}

/// Apply a signed EXP change, never going below zero.
pub fn apply_exp_delta(total_exp: i64, delta: i64) -> i64 {
    total_exp.saturating_add(delta).max(0)
}

/// Derived level information attached to profile responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpSummary {
    pub total_exp: i64,
    pub level: i64,
    pub exp_into_level: i64,
    pub exp_to_next_level: i64,
    pub progress_percent: i64,
}

impl ExpSummary {
    pub fn from_total(total_exp: i64) -> Self {
        Self {
            total_exp,
            level: level_for_exp(total_exp),
            exp_into_level: exp_into_level(total_exp),
            exp_to_next_level: exp_to_next_level(total_exp),
            progress_percent: level_progress_percent(total_exp),
        }
    }

    /// Whether moving from `before` to `self` crossed at least one level.
    pub fn leveled_up_from(&self, before: i64) -> bool {
        self.level > level_for_exp(before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_profile_is_level_one() {
        assert_eq!(level_for_exp(0), 1);
    }

    #[test]
    fn level_boundaries() {
        assert_eq!(level_for_exp(99), 1);
        assert_eq!(level_for_exp(100), 2);
        assert_eq!(level_for_exp(199), 2);
        assert_eq!(level_for_exp(250), 3);
        assert_eq!(level_for_exp(1000), 11);
    }

    #[test]
    fn negative_exp_clamps_to_level_one() {
        assert_eq!(level_for_exp(-50), 1);
        assert_eq!(exp_into_level(-50), 0);
    }

    #[test]
    fn progress_within_level() {
        assert_eq!(exp_into_level(250), 50);
        assert_eq!(exp_to_next_level(250), 50);
        assert_eq!(level_progress_percent(275), 75);
        assert_eq!(exp_to_next_level(300), 100);
    }

    #[test]
    fn delta_never_goes_negative() {
        assert_eq!(apply_exp_delta(30, -50), 0);
        assert_eq!(apply_exp_delta(30, 20), 50);
        assert_eq!(apply_exp_delta(i64::MAX, 1), i64::MAX);
    }

    #[test]
    fn summary_fields_agree() {
        let s = ExpSummary::from_total(345);
        assert_eq!(s.level, 4);
        assert_eq!(s.exp_into_level, 45);
        assert_eq!(s.exp_to_next_level, 55);
        assert_eq!(s.progress_percent, 45);
    }

    #[test]
    fn level_up_detection() {
        assert!(ExpSummary::from_total(110).leveled_up_from(95));
        assert!(!ExpSummary::from_total(150).leveled_up_from(110));
    }
}
