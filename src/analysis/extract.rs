//! Record extraction.
//!
//! Turns scraped table rows into typed [`AttendanceRecord`]s. Every parse
//! failure here is handled by skipping or defaulting; nothing in this module
//! returns an error, since the portal markup is outside our control.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::models::{AttendanceRecord, AttendanceRow};

const WORKING_DAY: &str = "working day";

/// Extract working-day records from table rows, sorted by date.
///
/// `now` is the reference moment used to estimate the duration of a day that
/// is still in progress. The sort is stable, so rows sharing a date keep
/// their table order.
pub fn extract_records(rows: &[AttendanceRow], now: NaiveDateTime) -> Vec<AttendanceRecord> {
    let mut records: Vec<AttendanceRecord> = rows
        .iter()
        .filter_map(|row| parse_row(row, now))
        .collect();

    records.sort_by_key(|r| r.date);

    debug!(
        "Extracted {} working-day records from {} rows",
        records.len(),
        rows.len()
    );

    records
}

/// Parse a single row, returning `None` when it does not qualify.
fn parse_row(row: &AttendanceRow, now: NaiveDateTime) -> Option<AttendanceRecord> {
    if !is_working_day(&row.day_status) {
        return None;
    }

    let Some(date) = parse_record_date(&row.date) else {
        debug!("Skipping row with unparseable date: {:?}", row.date);
        return None;
    };

    let worked_seconds = resolve_worked_seconds(row, date, now);
    Some(AttendanceRecord::new(date, worked_seconds))
}

/// Case-insensitive match on the "working day" status label.
pub fn is_working_day(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case(WORKING_DAY)
}

/// Parse a `day month year` date such as `05 Jan 2025`.
///
/// The month may be abbreviated or spelled out (`Jan`, `January`). Anything
/// after the year token is ignored, as are non-digit characters trailing the
/// year itself (`2025,`). The tokens are reassembled month-first
/// before conversion so the day and month can never be confused.
pub fn parse_record_date(text: &str) -> Option<NaiveDate> {
    let mut tokens = text.split_whitespace();
    let day = tokens.next()?;
    let month = tokens.next()?;
    let year: String = tokens
        .next()?
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if year.is_empty() {
        return None;
    }

    let reassembled = format!("{} {} {}", month, day, year);
    NaiveDate::parse_from_str(&reassembled, "%B %d %Y").ok()
}

/// Parse an `H:M:S` duration into seconds.
///
/// Durations too large to count in seconds are rejected.
pub fn parse_duration(text: &str) -> Option<u64> {
    let mut parts = text.trim().split(':');

    let hours: u64 = parts.next()?.trim().parse().ok()?;
    let minutes: u64 = parts.next()?.trim().parse().ok()?;
    let seconds: u64 = parts.next()?.trim().parse().ok()?;

    if parts.next().is_some() {
        return None;
    }

    hours
        .checked_mul(3600)?
        .checked_add(minutes.checked_mul(60)?)?
        .checked_add(seconds)
}

/// Parse a 12-hour check-in time such as `09:12 AM`.
///
/// `12 AM` is midnight and `12 PM` is noon.
pub fn parse_check_in(text: &str) -> Option<NaiveTime> {
    let normalized = text.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(&normalized, "%I:%M %p").ok()
}

/// Work out how many seconds a record accounts for.
///
/// The reported duration wins. Failing that, a record dated today with a
/// check-in time is treated as in progress and measured up to `now`.
/// Anything else counts as zero.
fn resolve_worked_seconds(row: &AttendanceRow, date: NaiveDate, now: NaiveDateTime) -> u64 {
    if let Some(seconds) = parse_duration(&row.worked_duration) {
        return seconds;
    }

    if date != now.date() || row.check_in.is_empty() {
        return 0;
    }

    match parse_check_in(&row.check_in) {
        Some(check_in) => {
            let started = date.and_time(check_in);
            let elapsed = (now - started).num_seconds().max(0) as u64;
            debug!(
                "Day in progress since {}: {}s so far",
                check_in.format("%H:%M"),
                elapsed
            );
            elapsed
        }
        None => {
            debug!("Unparseable check-in time: {:?}", row.check_in);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, status: &str, check_in: &str, worked: &str) -> AttendanceRow {
        AttendanceRow {
            date: date.to_string(),
            day_status: status.to_string(),
            check_in: check_in.to_string(),
            worked_duration: worked.to_string(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_record_date() {
        assert_eq!(parse_record_date("05 Jan 2025"), Some(date(2025, 1, 5)));
        assert_eq!(parse_record_date("5 jan 2025"), Some(date(2025, 1, 5)));
        assert_eq!(
            parse_record_date("28 Feb 2025 (Friday)"),
            Some(date(2025, 2, 28))
        );
        assert_eq!(parse_record_date("01 Dec 2024,"), Some(date(2024, 12, 1)));
        assert_eq!(
            parse_record_date("01 Dec 2024, Sun"),
            Some(date(2024, 12, 1))
        );
        assert_eq!(parse_record_date("05 January 2025"), Some(date(2025, 1, 5)));
        assert_eq!(parse_record_date("14 september 2024"), Some(date(2024, 9, 14)));
    }

    #[test]
    fn test_parse_record_date_rejects_garbage() {
        assert_eq!(parse_record_date(""), None);
        assert_eq!(parse_record_date("05 Jan"), None);
        assert_eq!(parse_record_date("05 Jan year"), None);
        assert_eq!(parse_record_date("31 Feb 2025"), None);
        assert_eq!(parse_record_date("Jan 05 2025"), None);
        assert_eq!(parse_record_date("05 Foo 2025"), None);
        assert_eq!(parse_record_date("05 Janu 2025"), None);
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("08:15:30"), Some(29730));
        assert_eq!(parse_duration("0:0:0"), Some(0));
        assert_eq!(parse_duration(""), None);
        assert_eq!(parse_duration("08:15"), None);
        assert_eq!(parse_duration("08:15:30:00"), None);
        assert_eq!(parse_duration("--:--:--"), None);
    }

    #[test]
    fn test_parse_duration_malformed_and_extreme() {
        assert_eq!(parse_duration(" 08 : 15 : 30 "), Some(29730));
        assert_eq!(parse_duration("-01:00:00"), None);
        assert_eq!(parse_duration("01:-5:00"), None);
        assert_eq!(parse_duration("1.5:00:00"), None);
        assert_eq!(parse_duration("9999999999999999:00:00"), None);
        assert_eq!(parse_duration("0:99999999999999999999:0"), None);
        assert_eq!(parse_duration(&format!("0:0:{}", u64::MAX)), Some(u64::MAX));
        assert_eq!(parse_duration(&format!("0:1:{}", u64::MAX)), None);
    }

    #[test]
    fn test_overflowing_duration_falls_through() {
        let rows = vec![
            row("09 Jan 2025", "Working Day", "", "9999999999999999:00:00"),
            row("10 Jan 2025", "Working Day", "09:00 AM", "9999999999999999:00:00"),
        ];
        let records = extract_records(&rows, at(2025, 1, 10, 12, 0));

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].worked_seconds, 0);
        // today's row falls back to the check-in rule
        assert_eq!(records[1].worked_seconds, 3 * 3600);
    }

    #[test]
    fn test_parse_check_in() {
        assert_eq!(parse_check_in("09:12 AM"), NaiveTime::from_hms_opt(9, 12, 0));
        assert_eq!(parse_check_in("9:05 pm"), NaiveTime::from_hms_opt(21, 5, 0));
        assert_eq!(parse_check_in("12:00 AM"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_check_in("12:30 PM"), NaiveTime::from_hms_opt(12, 30, 0));
        assert_eq!(parse_check_in(""), None);
        assert_eq!(parse_check_in("13:00 PM"), None);
    }

    #[test]
    fn test_working_day_is_case_insensitive() {
        assert!(is_working_day("Working Day"));
        assert!(is_working_day("WORKING DAY"));
        assert!(is_working_day(" working day "));
        assert!(!is_working_day("Weekend"));
        assert!(!is_working_day("Holiday"));
    }

    #[test]
    fn test_worked_duration_is_used() {
        let rows = vec![row("06 Jan 2025", "Working Day", "09:00 AM", "08:15:30")];
        let records = extract_records(&rows, at(2025, 1, 10, 12, 0));

        assert_eq!(records, vec![AttendanceRecord::new(date(2025, 1, 6), 29730)]);
    }

    #[test]
    fn test_non_working_days_are_skipped() {
        let rows = vec![
            row("04 Jan 2025", "Weekend", "", "04:00:00"),
            row("05 Jan 2025", "Holiday", "", "02:00:00"),
        ];
        assert!(extract_records(&rows, at(2025, 1, 10, 12, 0)).is_empty());
    }

    #[test]
    fn test_bad_dates_are_skipped() {
        let rows = vec![
            row("", "Working Day", "", "08:00:00"),
            row("not a date", "Working Day", "", "08:00:00"),
            row("06 Jan 2025", "Working Day", "", "08:00:00"),
        ];
        let records = extract_records(&rows, at(2025, 1, 10, 12, 0));

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].date, date(2025, 1, 6));
    }

    #[test]
    fn test_today_in_progress_uses_check_in() {
        let rows = vec![row("10 Jan 2025", "Working Day", "09:00 AM", "")];
        let records = extract_records(&rows, at(2025, 1, 10, 9, 30));

        assert_eq!(records, vec![AttendanceRecord::new(date(2025, 1, 10), 1800)]);
    }

    #[test]
    fn test_check_in_after_now_clamps_to_zero() {
        let rows = vec![row("10 Jan 2025", "Working Day", "11:00 AM", "")];
        let records = extract_records(&rows, at(2025, 1, 10, 9, 30));

        assert_eq!(records[0].worked_seconds, 0);
    }

    #[test]
    fn test_check_in_ignored_for_past_days() {
        let rows = vec![row("09 Jan 2025", "Working Day", "09:00 AM", "")];
        let records = extract_records(&rows, at(2025, 1, 10, 9, 30));

        assert_eq!(records, vec![AttendanceRecord::new(date(2025, 1, 9), 0)]);
    }

    #[test]
    fn test_bad_check_in_counts_as_zero() {
        let rows = vec![row("10 Jan 2025", "Working Day", "soon", "")];
        let records = extract_records(&rows, at(2025, 1, 10, 9, 30));

        assert_eq!(records, vec![AttendanceRecord::new(date(2025, 1, 10), 0)]);
    }

    #[test]
    fn test_records_sorted_and_stable() {
        let rows = vec![
            row("08 Jan 2025", "Working Day", "", "01:00:00"),
            row("06 Jan 2025", "Working Day", "", "02:00:00"),
            row("08 Jan 2025", "Working Day", "", "03:00:00"),
            row("07 Jan 2025", "Working Day", "", "04:00:00"),
        ];
        let records = extract_records(&rows, at(2025, 1, 10, 12, 0));

        assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(
            records.iter().map(|r| r.worked_seconds).collect::<Vec<_>>(),
            vec![7200, 14400, 3600, 10800]
        );
    }
}
