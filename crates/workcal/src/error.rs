//! Error types for calendar registration and resolution.

use chrono::NaiveDateTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// A time frame descriptor has malformed bounds.
    #[error("Invalid time frame '{name}': {reason}")]
    InvalidTimeFrame { name: String, reason: String },

    /// A date frame descriptor has a malformed selector or target list.
    #[error("Invalid date frame '{name}': {reason}")]
    InvalidDateFrame { name: String, reason: String },

    /// A lookup or a date frame target names a time frame that was never registered.
    #[error("Unknown time frame: {0}")]
    UnknownTimeFrame(String),

    /// `solve` was asked to tile an empty or inverted range.
    #[error("Invalid range: end {end} is not after start {start}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

pub type Result<T> = std::result::Result<T, CalendarError>;
