//! Data models for attendance aggregation.
//!
//! This module contains the row, record, and result types that flow from the
//! scraped table through the aggregator to the report.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::AttendanceError;

/// Minimum number of cells a table row needs to be considered.
pub const MIN_ROW_CELLS: usize = 7;

const DATE_CELL: usize = 1;
const DAY_STATUS_CELL: usize = 2;
const CHECK_IN_CELL: usize = 3;
const WORKED_CELL: usize = 5;

/// One row of the attendance table, with the positional cells resolved to
/// named fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceRow {
    /// Date text, e.g. `05 Jan 2025`.
    pub date: String,
    /// Day status label, e.g. `Working Day`, `Weekend`, `Holiday`.
    pub day_status: String,
    /// Check-in time on a 12-hour clock, e.g. `09:12 AM`.
    pub check_in: String,
    /// Worked duration as `HH:MM:SS`.
    pub worked_duration: String,
}

impl AttendanceRow {
    /// Build a row from its text cells.
    ///
    /// Returns `None` for rows narrower than [`MIN_ROW_CELLS`]. Cells are
    /// trimmed; a missing cell reads as an empty string.
    pub fn from_cells<S: AsRef<str>>(cells: &[S]) -> Option<Self> {
        if cells.len() < MIN_ROW_CELLS {
            return None;
        }

        let cell = |i: usize| {
            cells
                .get(i)
                .map(|c| c.as_ref().trim().to_string())
                .unwrap_or_default()
        };

        Some(Self {
            date: cell(DATE_CELL),
            day_status: cell(DAY_STATUS_CELL),
            check_in: cell(CHECK_IN_CELL),
            worked_duration: cell(WORKED_CELL),
        })
    }
}

/// A single working day extracted from the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttendanceRecord {
    /// Calendar day the record belongs to.
    pub date: NaiveDate,
    /// Seconds worked that day.
    pub worked_seconds: u64,
}

impl AttendanceRecord {
    pub fn new(date: NaiveDate, worked_seconds: u64) -> Self {
        Self {
            date,
            worked_seconds,
        }
    }
}

/// An hour quantity held in hundredths of an hour.
///
/// Built from seconds with half-up rounding and displayed with exactly two
/// fractional digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours(u64);

impl Hours {
    /// Convert seconds to hours, rounding half-up to two decimals.
    pub fn from_seconds(seconds: u64) -> Self {
        Hours((seconds.saturating_mul(100).saturating_add(1800)) / 3600)
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Hours {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The five totals returned on success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceData {
    /// Hours worked from Monday of this week through today.
    pub weekly_hours: Hours,
    /// Hours still needed to reach the weekly target, never negative.
    pub weekly_hours_left: Hours,
    /// Hours worked in the previous Monday-to-Sunday week.
    #[serde(rename = "prevWeeklyHours")]
    pub previous_weekly_hours: Hours,
    /// Hours worked in the current pay period.
    pub monthly_hours: Hours,
    /// Hours worked in the previous pay period.
    #[serde(rename = "prevMonthlyHours")]
    pub previous_monthly_hours: Hours,
}

/// The answer to an attendance request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum AggregationResult {
    Success { data: AttendanceData },
    Error { message: String },
}

impl AggregationResult {
    pub fn error(message: impl Into<String>) -> Self {
        AggregationResult::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AggregationResult::Success { .. })
    }

    /// The totals, if the request succeeded.
    pub fn data(&self) -> Option<&AttendanceData> {
        match self {
            AggregationResult::Success { data } => Some(data),
            AggregationResult::Error { .. } => None,
        }
    }
}

impl From<AttendanceError> for AggregationResult {
    fn from(err: AttendanceError) -> Self {
        AggregationResult::error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_row_from_cells() {
        let row = AttendanceRow::from_cells(&cells(&[
            "1",
            " 05 Jan 2025 ",
            "Working Day",
            "09:12 AM",
            "05:30 PM",
            "08:18:00",
            "",
        ]))
        .unwrap();

        assert_eq!(row.date, "05 Jan 2025");
        assert_eq!(row.day_status, "Working Day");
        assert_eq!(row.check_in, "09:12 AM");
        assert_eq!(row.worked_duration, "08:18:00");
    }

    #[test]
    fn test_short_row_is_rejected() {
        let row = AttendanceRow::from_cells(&cells(&[
            "1",
            "05 Jan 2025",
            "Working Day",
            "",
            "",
            "08:00:00",
        ]));
        assert!(row.is_none());
    }

    #[test]
    fn test_hours_rounding_half_up() {
        assert_eq!(Hours::from_seconds(0).to_string(), "0.00");
        assert_eq!(Hours::from_seconds(17).to_string(), "0.00");
        // 18s is exactly 0.005h
        assert_eq!(Hours::from_seconds(18).to_string(), "0.01");
        assert_eq!(Hours::from_seconds(29730).to_string(), "8.26");
        assert_eq!(Hours::from_seconds(35 * 3600).to_string(), "35.00");
    }

    #[test]
    fn test_hours_ordering() {
        assert!(Hours::from_seconds(5400) > Hours::from_seconds(3600));
        assert_eq!(Hours::default(), Hours::from_seconds(0));
    }

    #[test]
    fn test_success_serialization() {
        let result = AggregationResult::Success {
            data: AttendanceData {
                weekly_hours: Hours::from_seconds(27000),
                weekly_hours_left: Hours::from_seconds(99000),
                previous_weekly_hours: Hours::from_seconds(126000),
                monthly_hours: Hours::default(),
                previous_monthly_hours: Hours::from_seconds(3600),
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"]["weeklyHours"], "7.50");
        assert_eq!(json["data"]["weeklyHoursLeft"], "27.50");
        assert_eq!(json["data"]["prevWeeklyHours"], "35.00");
        assert_eq!(json["data"]["monthlyHours"], "0.00");
        assert_eq!(json["data"]["prevMonthlyHours"], "1.00");
    }

    #[test]
    fn test_error_serialization() {
        let result = AggregationResult::from(AttendanceError::NoQualifyingRecords);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["status"], "error");
        assert_eq!(
            json["message"],
            "No working day attendance data found in the table."
        );
        assert!(json.get("data").is_none());
        assert!(result.data().is_none());
        assert!(!result.is_success());
    }
}
