//! Closure policy: weekly off-day, fixed annual holidays, declared closures

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

use crate::models::ClosedDay;

/// The studio's only weekly day off. Saturday is a regular working day.
pub const WEEKLY_OFF_DAY: Weekday = Weekday::Sun;

/// (month, day) of the annual public holidays
pub const FIXED_HOLIDAYS: [(u32, u32); 10] = [
    (1, 1),   // New Year's Day
    (1, 6),   // Epiphany
    (4, 25),  // Liberation Day
    (5, 1),   // Labour Day
    (6, 2),   // Republic Day
    (8, 15),  // Ferragosto
    (11, 1),  // All Saints
    (12, 8),  // Immaculate Conception
    (12, 25), // Christmas
    (12, 26), // St Stephen
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosureReason {
    WeeklyOffDay,
    Holiday,
    Declared,
}

pub fn is_weekly_off_day(date: NaiveDate) -> bool {
    date.weekday() == WEEKLY_OFF_DAY
}

pub fn is_fixed_holiday(date: NaiveDate) -> bool {
    FIXED_HOLIDAYS.contains(&(date.month(), date.day()))
}

/// First matching reason the studio is closed on `date`, if any.
/// `declared` tells whether the closed-day register has an entry for it.
pub fn closure_reason(date: NaiveDate, declared: bool) -> Option<ClosureReason> {
    if is_weekly_off_day(date) {
        Some(ClosureReason::WeeklyOffDay)
    } else if is_fixed_holiday(date) {
        Some(ClosureReason::Holiday)
    } else if declared {
        Some(ClosureReason::Declared)
    } else {
        None
    }
}

pub fn is_closed(date: NaiveDate, declared: bool) -> bool {
    closure_reason(date, declared).is_some()
}

/// Dates carrying at least one declared closure
#[derive(Debug, Clone, Default)]
pub struct DeclaredClosures(BTreeSet<NaiveDate>);

impl DeclaredClosures {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0.contains(&date)
    }

    pub fn is_closed(&self, date: NaiveDate) -> bool {
        is_closed(date, self.contains(date))
    }
}

impl<'a> FromIterator<&'a ClosedDay> for DeclaredClosures {
    fn from_iter<I: IntoIterator<Item = &'a ClosedDay>>(iter: I) -> Self {
        Self(iter.into_iter().map(|c| c.date).collect())
    }
}

impl FromIterator<NaiveDate> for DeclaredClosures {
    fn from_iter<I: IntoIterator<Item = NaiveDate>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
