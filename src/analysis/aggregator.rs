//! Period aggregation and totals.
//!
//! This module buckets extracted records into the weekly and pay-period
//! windows and converts the sums to hours.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::analysis::extract::extract_records;
use crate::analysis::periods::{self, DateRange};
use crate::error::AttendanceError;
use crate::models::{AggregationResult, AttendanceData, AttendanceRecord, AttendanceRow, Hours};

/// Rules for how totals are bucketed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPolicy {
    /// Hours expected per week.
    pub weekly_target_hours: u32,
    /// Day of the month each pay period starts on.
    pub period_start_day: u32,
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self {
            weekly_target_hours: 35,
            period_start_day: 26,
        }
    }
}

impl From<&crate::config::PolicyConfig> for AggregationPolicy {
    fn from(config: &crate::config::PolicyConfig) -> Self {
        Self {
            weekly_target_hours: config.weekly_target_hours,
            period_start_day: config.period_start_day,
        }
    }
}

impl AggregationPolicy {
    pub fn weekly_target_seconds(&self) -> u64 {
        u64::from(self.weekly_target_hours) * 3600
    }
}

/// The four windows totals are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriods {
    pub current_week: DateRange,
    pub previous_week: DateRange,
    pub current_pay_period: DateRange,
    pub previous_pay_period: DateRange,
}

impl ReportingPeriods {
    /// Resolve the windows relative to `today`.
    pub fn resolve(today: NaiveDate, policy: &AggregationPolicy) -> Self {
        Self {
            current_week: periods::current_week(today),
            previous_week: periods::previous_week(today),
            current_pay_period: periods::current_pay_period(today, policy.period_start_day),
            previous_pay_period: periods::previous_pay_period(today, policy.period_start_day),
        }
    }
}

/// Totals plus the context they were computed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub data: AttendanceData,
    pub periods: ReportingPeriods,
    /// Number of working-day records that went into the totals.
    pub record_count: usize,
    /// Date of the most recent record, if any.
    pub latest_record: Option<NaiveDate>,
}

impl From<&AttendanceSummary> for AggregationResult {
    fn from(summary: &AttendanceSummary) -> Self {
        AggregationResult::Success { data: summary.data }
    }
}

/// Bucket sorted records into the reporting windows around `today`.
///
/// This never fails: an empty slice produces all-zero totals.
pub fn aggregate(
    records: &[AttendanceRecord],
    today: NaiveDate,
    policy: &AggregationPolicy,
) -> AttendanceSummary {
    let periods = ReportingPeriods::resolve(today, policy);

    let current_week = periods.current_week.total_seconds(records);
    let previous_week = periods.previous_week.total_seconds(records);
    let current_period = periods.current_pay_period.total_seconds(records);
    let previous_period = periods.previous_pay_period.total_seconds(records);

    debug!("Current week {}: {}s", periods.current_week, current_week);
    debug!("Previous week {}: {}s", periods.previous_week, previous_week);
    debug!(
        "Current pay period {}: {}s",
        periods.current_pay_period, current_period
    );
    debug!(
        "Previous pay period {}: {}s",
        periods.previous_pay_period, previous_period
    );

    let remaining = policy.weekly_target_seconds().saturating_sub(current_week);

    AttendanceSummary {
        data: AttendanceData {
            weekly_hours: Hours::from_seconds(current_week),
            weekly_hours_left: Hours::from_seconds(remaining),
            previous_weekly_hours: Hours::from_seconds(previous_week),
            monthly_hours: Hours::from_seconds(current_period),
            previous_monthly_hours: Hours::from_seconds(previous_period),
        },
        periods,
        record_count: records.len(),
        latest_record: records.last().map(|r| r.date),
    }
}

/// Run extraction and aggregation over a scraped table.
///
/// `rows` is `None` when the table could not be located. `now` is the
/// reference moment; its date anchors every window.
pub fn summarize(
    rows: Option<&[AttendanceRow]>,
    now: NaiveDateTime,
    policy: &AggregationPolicy,
) -> Result<AttendanceSummary, AttendanceError> {
    let rows = rows.ok_or(AttendanceError::TableNotFound)?;

    let records = extract_records(rows, now);
    if records.is_empty() {
        return Err(AttendanceError::NoQualifyingRecords);
    }

    Ok(aggregate(&records, now.date(), policy))
}
