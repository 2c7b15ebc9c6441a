//! Attendance analysis.
//!
//! Extraction turns scraped rows into records; aggregation buckets those
//! records into weekly and pay-period totals.

pub mod aggregator;
pub mod extract;
pub mod periods;

pub use aggregator::*;
