//! Strict `YYYY-MM-DD` handling for path parameters and stored dates.

use chrono::{Duration, NaiveDate};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Length of the trailing window used by the precipitation and tobs endpoints.
pub const TRAILING_WINDOW_DAYS: i64 = 365;

/// Returns true iff `s` is exactly a calendar-valid `YYYY-MM-DD` date.
pub fn is_valid_date(s: &str) -> bool {
    parse_date(s).is_some()
}

/// Parses a strict `YYYY-MM-DD` date.
///
/// chrono alone accepts single-digit months/days and signed or longer years,
/// so the shape is checked byte-by-byte before the calendar check.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let bytes = s.as_bytes();
    if bytes.len() != 10 {
        return None;
    }

    let shape_ok = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shape_ok {
        return None;
    }

    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `date` minus a fixed 365 days (not a calendar year).
pub fn one_year_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(TRAILING_WINDOW_DAYS)
}
