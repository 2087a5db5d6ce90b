//! Pregnancy and child age arithmetic.
//!
//! All functions here are pure and total: nonsensical inputs (a due date in
//! the far past, a birth date in the future) clamp to zero rather than
//! failing, since every caller has a reasonable empty display to fall back
//! on.

use crate::utils::time::{Millis, MILLIS_PER_DAY};

/// Assumed gestation length from last menstrual period to due date.
pub const GESTATION_DAYS: i64 = 280;

/// Average month length used for child ages. Matches the service's own
/// rendering of the same records; not calendar-accurate.
pub const AVG_DAYS_PER_MONTH: f64 = 30.44;

/// Gestational age derived from an expected due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestationalAge {
    pub weeks: u32,
    /// Remainder days past the full weeks, always 0..=6.
    pub days: u32,
}

/// Gestational age at `now` for a pregnancy with the given due date.
///
/// The implied last menstrual period is `due_date - 280 days`; the result
/// counts whole elapsed days since that instant. Zero before the implied
/// LMP; no upper clamp, so an overdue pregnancy reads past 40 weeks.
pub fn gestational_age(due_date: Millis, now: Millis) -> GestationalAge {
    let lmp = due_date.0.saturating_sub(GESTATION_DAYS * MILLIS_PER_DAY);
    let elapsed_days = now.0.saturating_sub(lmp).div_euclid(MILLIS_PER_DAY);
    if elapsed_days <= 0 {
        return GestationalAge { weeks: 0, days: 0 };
    }
    GestationalAge {
        weeks: (elapsed_days / 7) as u32,
        days: (elapsed_days % 7) as u32,
    }
}

/// Pregnancy trimester classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trimester {
    First,
    Second,
    Third,
}

impl Trimester {
    /// Classify a gestational week. Boundary weeks (13, 27) belong to the
    /// lower trimester.
    pub fn from_weeks(weeks: u32) -> Self {
        if weeks <= 13 {
            Trimester::First
        } else if weeks <= 27 {
            Trimester::Second
        } else {
            Trimester::Third
        }
    }

    /// Ordinal 1..=3 for display.
    pub fn number(self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }
}

impl std::fmt::Display for Trimester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trimester::First => write!(f, "First trimester"),
            Trimester::Second => write!(f, "Second trimester"),
            Trimester::Third => write!(f, "Third trimester"),
        }
    }
}

/// A child's age broken into display figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildAge {
    pub years: u32,
    /// Months past the full years, always 0..=11.
    pub months: u32,
    pub total_months: u32,
}

/// Child age at `now` for the given date of birth, using the average-month
/// approximation. Zero when `now` precedes the birth date.
pub fn child_age(dob: Millis, now: Millis) -> ChildAge {
    let elapsed_days = now.0.saturating_sub(dob.0).div_euclid(MILLIS_PER_DAY);
    if elapsed_days <= 0 {
        return ChildAge {
            years: 0,
            months: 0,
            total_months: 0,
        };
    }
    let total_months = (elapsed_days as f64 / AVG_DAYS_PER_MONTH).floor() as u32;
    ChildAge {
        years: total_months / 12,
        months: total_months % 12,
        total_months,
    }
}

// ============================================================================
// Tests
// ============================================================================
