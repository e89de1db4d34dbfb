/// Calendar helpers: day ranges for the heatmap and day parsing
///
/// Everything here works at day granularity. Timestamps are truncated to
/// their calendar day in local time before they reach the rest of the crate.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime};
use crate::domain::DomainError;

/// The current calendar day in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// January 1 of the year `today` falls in
pub fn year_start(today: NaiveDate) -> NaiveDate {
    today.with_ordinal(1).unwrap_or(today)
}

/// Every calendar day from `start` to `end` inclusive, ascending
///
/// Returns an empty list when `end` is before `start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if end < start {
        return Vec::new();
    }
    start.iter_days().take_while(|d| *d <= end).collect()
}

/// Every calendar day from January 1 through `today`
pub fn dates_from_year_beginning(today: NaiveDate) -> Vec<NaiveDate> {
    date_range(year_start(today), today)
}

/// Naive timestamp layouts whose time of day is dropped
const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a date argument into a calendar day
///
/// Accepts `YYYY-MM-DD`, a naive timestamp (`2023-01-29T15:00`,
/// `2023-01-29 15:00:00`) whose time-of-day is dropped, or an RFC 3339
/// timestamp converted to local time first. Anything else that starts with
/// a valid date followed by `T` or a space (`2023-01-29T00`) keeps that date.
pub fn parse_day(input: &str) -> Result<NaiveDate, DomainError> {
    let trimmed = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date);
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Local).date_naive());
    }

    for format in TIMESTAMP_FORMATS {
        if let Ok(timestamp) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(timestamp.date());
        }
    }

    if let (Some(prefix), Some(rest)) = (trimmed.get(..10), trimmed.get(10..)) {
        if rest.starts_with('T') || rest.starts_with(' ') {
            if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
                return Ok(date);
            }
        }
    }

    Err(DomainError::InvalidDate(format!(
        "'{}' is not a date (expected YYYY-MM-DD or an ISO 8601 timestamp)",
        input
    )))
}
