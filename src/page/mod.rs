//! Dashboard page handling.
//!
//! Loading the page markup and reading the attendance grid out of it. Nothing
//! here interprets the cell text; that is left to the analysis layer.

pub mod html;
pub mod loader;

use crate::models::AttendanceRow;
use tracing::debug;

pub use loader::{is_dashboard_url, load_page, FetchOptions, PageSource};

/// Element id of the daily attendance grid on the dashboard.
pub const DEFAULT_TABLE_ID: &str = "MainContent_GridView2";

/// Text of every cell in every row of the table with the given id.
///
/// A cell's text is the text of its first `<span>`; cells without one read
/// as empty. Returns `None` when the table is not on the page.
pub fn scrape_table(page: &str, table_id: &str) -> Option<Vec<Vec<String>>> {
    let table = html::element_by_id(page, "table", table_id)?;

    let rows = html::elements(table, "tr")
        .into_iter()
        .map(|row| {
            html::elements(row, "td")
                .into_iter()
                .map(html::first_span_text)
                .collect()
        })
        .collect();

    Some(rows)
}

/// Attendance rows from the table with the given id.
///
/// Rows too narrow to carry attendance data (headers, pager rows) are
/// dropped here. Returns `None` when the table is not on the page.
pub fn scrape_rows(page: &str, table_id: &str) -> Option<Vec<AttendanceRow>> {
    let cells = scrape_table(page, table_id)?;
    let total = cells.len();

    let rows: Vec<AttendanceRow> = cells
        .iter()
        .filter_map(|cells| AttendanceRow::from_cells(cells))
        .collect();

    debug!(
        "Table {} has {} rows, {} wide enough to use",
        table_id,
        total,
        rows.len()
    );

    Some(rows)
}
