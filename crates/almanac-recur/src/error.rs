use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::validate::Violations;

/// Recurrence validation and expansion errors
#[derive(Error, Debug)]
pub enum RecurError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(Violations),

    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(String),

    #[error("Invalid window: {start} is after {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Invalid anchor: end {end} is before start {start}")]
    InvalidAnchor { start: String, end: String },

    #[error("Expansion exceeded maximum limit of {0} occurrences")]
    TooManyOccurrences(usize),

    #[error("Local time {0} cannot be represented in the anchor's timezone")]
    UnresolvableLocalTime(NaiveDateTime),
}

pub type RecurResult<T> = std::result::Result<T, RecurError>;
