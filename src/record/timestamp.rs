//! ISO-8601 timestamp parsing
//!
//! Accepted forms, tried in order:
//! - RFC 3339 with offset (`2024-03-01T09:30:00Z`, `2024-03-01T09:30:00+02:00`)
//! - Naive date-time, read as UTC (`2024-03-01T09:30:00`, `2024-03-01 09:30:00.250`)
//! - Date only, read as midnight UTC (`2024-03-01`)
//!
//! Anything else is unparsable and yields `None`, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a timestamp string into an instant
pub fn parse_instant(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    let date = NaiveDate::parse_from_str(s, DATE_FORMAT).ok()?;
    Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
}

/// Parses the lower bound of a date range.
pub fn parse_range_start(s: &str) -> Option<DateTime<Utc>> {
    parse_instant(s)
}

/// Parses the upper bound of a date range.
///
/// A date-only bound covers the whole day, so `2024-03-01` becomes the last
/// representable instant of that day.
pub fn parse_range_end(s: &str) -> Option<DateTime<Utc>> {
    let trimmed = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        let end = date.and_hms_nano_opt(23, 59, 59, 999_999_999)?;
        return Some(Utc.from_utc_datetime(&end));
    }
    parse_instant(trimmed)
}
