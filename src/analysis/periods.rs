//! Reporting windows.
//!
//! Weeks start on Monday and run up to the reference day. Pay periods start
//! on a fixed day of the month (the 26th by default) and end the day before
//! the next one starts. All windows are inclusive on both ends.

use chrono::{Datelike, Days, Months, NaiveDate};
use std::fmt;

use crate::models::AttendanceRecord;

/// Latest day of the month a pay period may start on, so that every month
/// contains it.
pub const MAX_PERIOD_START_DAY: u32 = 28;

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Sum of worked seconds over the records falling inside this range,
    /// saturating at `u64::MAX`.
    pub fn total_seconds(&self, records: &[AttendanceRecord]) -> u64 {
        records
            .iter()
            .filter(|r| self.contains(r.date))
            .fold(0u64, |total, r| total.saturating_add(r.worked_seconds))
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%a %d %b %Y"),
            self.end.format("%a %d %b %Y")
        )
    }
}

/// Monday of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.weekday().num_days_from_monday()))
}

/// Monday of this week through `today`.
pub fn current_week(today: NaiveDate) -> DateRange {
    DateRange::new(week_start(today), today)
}

/// The full Monday-to-Sunday week before the one containing `today`.
pub fn previous_week(today: NaiveDate) -> DateRange {
    let monday = week_start(today);
    DateRange::new(monday - Days::new(7), monday - Days::new(1))
}

/// The pay period containing `today`.
///
/// Before `start_day` the period began last month; from `start_day` on it
/// began this month. `start_day` is clamped to `1..=28`.
pub fn current_pay_period(today: NaiveDate, start_day: u32) -> DateRange {
    let start_day = clamp_start_day(start_day);
    let this_month = first_of_month(today);

    let month = if today.day() < start_day {
        this_month - Months::new(1)
    } else {
        this_month
    };

    pay_period_starting_in(month, start_day)
}

/// The pay period immediately before the one containing `today`.
pub fn previous_pay_period(today: NaiveDate, start_day: u32) -> DateRange {
    let current = current_pay_period(today, start_day);
    let month = first_of_month(current.start) - Months::new(1);
    pay_period_starting_in(month, clamp_start_day(start_day))
}

fn clamp_start_day(start_day: u32) -> u32 {
    start_day.clamp(1, MAX_PERIOD_START_DAY)
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Days::new(u64::from(day.day0()))
}

/// The period starting on `start_day` of the month beginning at `month`.
fn pay_period_starting_in(month: NaiveDate, start_day: u32) -> DateRange {
    let offset = Days::new(u64::from(start_day - 1));
    let start = month + offset;
    let next_start = (month + Months::new(1)) + offset;
    DateRange::new(start, next_start - Days::new(1))
}
