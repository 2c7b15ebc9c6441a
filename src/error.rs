//! Error kinds surfaced to the caller of an attendance request.

use thiserror::Error;

/// Why an attendance request could not produce totals.
///
/// Both kinds are non-fatal: they are reported back as the `message` of an
/// error result. Per-row parse problems never become one of these; such rows
/// are skipped during extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttendanceError {
    /// The attendance table is not present in the page.
    #[error("Attendance table not found on the page.")]
    TableNotFound,

    /// The table was present but no row was a usable working day.
    #[error("No working day attendance data found in the table.")]
    NoQualifyingRecords,
}
