//! Shared date-literal patterns.
//!
//! The boundary only treats a `$date` string as a date instance when it has
//! one of these shapes. Calendar validity (month 13, February 30) is checked
//! afterwards by chrono.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Calendar date (YYYY-MM-DD)
    pub static ref CALENDAR_DATE_PATTERN: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}$"
    ).unwrap();

    /// RFC 3339 timestamp with optional fractional seconds and a Z or numeric offset
    pub static ref TIMESTAMP_PATTERN: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}[Tt]\d{2}:\d{2}:\d{2}(\.\d+)?([Zz]|[+-]\d{2}:\d{2})$"
    ).unwrap();
}

/// Check if text is a bare calendar date.
pub fn is_calendar_date(text: &str) -> bool {
    CALENDAR_DATE_PATTERN.is_match(text)
}

/// Check if text is a full timestamp.
pub fn is_timestamp(text: &str) -> bool {
    TIMESTAMP_PATTERN.is_match(text)
}

/// Check if text has the shape of any accepted date literal.
pub fn is_date_literal(text: &str) -> bool {
    is_calendar_date(text) || is_timestamp(text)
}
