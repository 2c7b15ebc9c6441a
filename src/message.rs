//! Request/response handling.
//!
//! A caller asks for attendance data with `{"action": "getAttendanceData"}`
//! and gets an [`AggregationResult`] back. The page, table id, reference time
//! and policy a request is answered against are bundled in a
//! [`RequestContext`].

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info};

use crate::analysis::{summarize, AggregationPolicy, AttendanceSummary};
use crate::error::AttendanceError;
use crate::models::AggregationResult;
use crate::page;

/// A request from the UI side.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action")]
pub enum Request {
    #[serde(rename = "getAttendanceData")]
    GetAttendanceData,
}

/// Everything a request is answered against.
#[derive(Debug, Clone)]
pub struct RequestContext<'a> {
    /// Dashboard markup.
    pub page: &'a str,
    /// Element id of the attendance table.
    pub table_id: &'a str,
    /// Reference moment for "today" and in-progress days.
    pub now: NaiveDateTime,
    pub policy: AggregationPolicy,
}

impl RequestContext<'_> {
    /// Scrape the page and aggregate the attendance table.
    pub fn attendance_summary(&self) -> Result<AttendanceSummary, AttendanceError> {
        let rows = page::scrape_rows(self.page, self.table_id);
        summarize(rows.as_deref(), self.now, &self.policy)
    }
}

/// Parse a JSON request.
pub fn parse_request(raw: &str) -> Result<Request> {
    serde_json::from_str(raw.trim()).context("Unknown request")
}

/// Answer a parsed request.
pub fn handle_request(request: &Request, ctx: &RequestContext<'_>) -> AggregationResult {
    match request {
        Request::GetAttendanceData => {
            info!("Answering getAttendanceData");
            match ctx.attendance_summary() {
                Ok(summary) => AggregationResult::from(&summary),
                Err(err) => {
                    info!("Attendance request failed: {}", err);
                    AggregationResult::from(err)
                }
            }
        }
    }
}

/// Answer a raw JSON request. Malformed or unknown requests are answered
/// with an error result rather than failing.
pub fn respond(raw: &str, ctx: &RequestContext<'_>) -> AggregationResult {
    match parse_request(raw) {
        Ok(request) => handle_request(&request, ctx),
        Err(err) => {
            debug!("Rejecting request {:?}: {:#}", raw, err);
            AggregationResult::error(format!("{:#}", err))
        }
    }
}
