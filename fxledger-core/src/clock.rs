//! Session timestamps.
//!
//! Open and close dates travel through the ledger as formatted strings —
//! the textual contract of the feed — rather than parsed datetimes.

use chrono::{DateTime, Local};

/// Month/day/year, hour:minute:second — e.g. `01/01/2000, 00:00:00`.
pub const DATE_FORMAT: &str = "%m/%d/%Y, %H:%M:%S";

/// Format a timestamp as a session date string.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(DATE_FORMAT).to_string()
}

/// The current wall-clock time as a session date string.
pub fn session_now() -> String {
    format_timestamp(Local::now())
}
