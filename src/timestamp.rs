//! Lenient parsing of sheet date/time strings
//!
//! Sheets store timestamps as display strings. The outreach sheet writes
//! `%m/%d/%Y %H:%M:%S`; chat exports and webhook payloads use ISO-like forms.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-time formats tried in order, the sheet's native format first
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M",
];

/// Date-only formats, interpreted as midnight
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp string
///
/// Returns `None` for empty or unrecognised input.
pub fn parse_timestamp(input: &str) -> Option<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(s, DATETIME_FORMATS[0]) {
        return Some(parsed);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(s) {
        return Some(parsed.naive_utc());
    }

    for format in &DATETIME_FORMATS[1..] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(s, format) {
            return Some(parsed);
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(s, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Parse the date part of a timestamp string
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    parse_timestamp(input).map(|ts| ts.date())
}
