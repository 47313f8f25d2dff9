//! Date parsing and display.
//!
//! The API hands dates around as ISO 8601 strings of varying precision
//! (`2025-01-01`, `2025-01-01T08:30:00`, `2025-01-01T08:30:00.000Z`).
//! Display helpers never fail: missing or unparsable input becomes a
//! sentinel string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::types::Timestamp;

/// Shown when a date is absent.
pub const DATE_NOT_SPECIFIED: &str = "date not specified";

/// Shown when a date is present but cannot be parsed.
pub const DATE_INVALID: &str = "invalid date";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse an ISO date or date-time into its calendar date.
///
/// Offsets are respected as written: the date is taken in the offset the
/// string carries, not converted to UTC.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Some(dt) = parse_naive_datetime(raw) {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Parse an ISO date-time into a UTC timestamp. Strings without an offset
/// are taken as UTC; a bare date means midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = parse_naive_datetime(raw) {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_naive_datetime(raw: &str) -> Option<NaiveDateTime> {
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Render a date as `DD.MM.YYYY`.
///
/// `None` yields [`DATE_NOT_SPECIFIED`], an unparsable string yields
/// [`DATE_INVALID`].
pub fn format_date(raw: Option<&str>) -> String {
    match raw {
        None => DATE_NOT_SPECIFIED.to_string(),
        Some(s) if s.trim().is_empty() => DATE_NOT_SPECIFIED.to_string(),
        Some(s) => match parse_date(s) {
            Some(date) => date.format("%d.%m.%Y").to_string(),
            None => DATE_INVALID.to_string(),
        },
    }
}

/// Render a reminder time, e.g. `5 January, 14:30`.
pub fn format_schedule(at: &Timestamp) -> String {
    at.format("%-d %B, %H:%M").to_string()
}

/// Today's date as `YYYY-MM-DD` (UTC).
pub fn today_iso() -> String {
    Utc::now().date_naive().format("%Y-%m-%d").to_string()
}
