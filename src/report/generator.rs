//! Attendance report generation.
//!
//! Renders the outcome of an attendance request as Markdown for people or
//! as the JSON response shape for other programs.

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::analysis::{AttendanceSummary, ReportingPeriods};
use crate::error::AttendanceError;
use crate::models::{AggregationResult, AttendanceData};

/// Settings that shape the Markdown report.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext {
    /// Moment the totals were computed for.
    pub generated_at: NaiveDateTime,
    /// Weekly target, shown next to the hours left.
    pub weekly_target_hours: u32,
    /// Whether to include the previous pay period.
    pub show_previous_period: bool,
}

/// Generate a Markdown report for an attendance request outcome.
pub fn generate_markdown_report(
    outcome: &Result<AttendanceSummary, AttendanceError>,
    ctx: &ReportContext,
) -> String {
    let mut output = String::new();

    output.push_str("# Attendance Summary\n\n");
    output.push_str(&format!(
        "*As of {}*\n\n",
        ctx.generated_at.format("%a %d %b %Y %H:%M")
    ));

    match outcome {
        Ok(summary) => {
            output.push_str(&generate_overview_section(summary));
            output.push_str(&generate_weekly_section(
                &summary.data,
                &summary.periods,
                ctx.weekly_target_hours,
            ));
            output.push_str(&generate_pay_period_section(
                &summary.data,
                &summary.periods,
                ctx.show_previous_period,
            ));
        }
        Err(err) => {
            output.push_str(&format!("> **Error:** {}\n", err));
        }
    }

    output
}

/// Generate the JSON response for an attendance request.
pub fn generate_json_report(result: &AggregationResult) -> Result<String> {
    serde_json::to_string_pretty(result).map_err(Into::into)
}

fn generate_overview_section(summary: &AttendanceSummary) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "- **Working days found:** {}\n",
        summary.record_count
    ));
    if let Some(latest) = summary.latest_record {
        section.push_str(&format!(
            "- **Latest record:** {}\n",
            latest.format("%a %d %b %Y")
        ));
    }
    section.push('\n');

    section
}

fn generate_weekly_section(
    data: &AttendanceData,
    periods: &ReportingPeriods,
    weekly_target_hours: u32,
) -> String {
    let mut section = String::new();

    section.push_str("## Weekly\n\n");
    section.push_str("| Window | Dates | Hours |\n");
    section.push_str("|:---|:---|---:|\n");
    section.push_str(&format!(
        "| This week | {} | {} |\n",
        periods.current_week, data.weekly_hours
    ));
    section.push_str(&format!(
        "| Left to {}h target | | {} |\n",
        weekly_target_hours, data.weekly_hours_left
    ));
    section.push_str(&format!(
        "| Last week | {} | {} |\n",
        periods.previous_week, data.previous_weekly_hours
    ));
    section.push('\n');

    section
}

fn generate_pay_period_section(
    data: &AttendanceData,
    periods: &ReportingPeriods,
    show_previous: bool,
) -> String {
    let mut section = String::new();

    section.push_str("## Pay Period\n\n");
    section.push_str("| Window | Dates | Hours |\n");
    section.push_str("|:---|:---|---:|\n");
    section.push_str(&format!(
        "| This period | {} | {} |\n",
        periods.current_pay_period, data.monthly_hours
    ));
    if show_previous {
        section.push_str(&format!(
            "| Previous period | {} | {} |\n",
            periods.previous_pay_period, data.previous_monthly_hours
        ));
    }
    section.push('\n');

    section
}
