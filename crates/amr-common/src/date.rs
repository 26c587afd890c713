//! Collection date parsing.
//!
//! Laboratory exports write collection dates as day/month/year text. Values
//! that fail the configured format are retried against ISO forms (spreadsheet
//! tools often rewrite dates on export) and otherwise coerced to `None`.

use chrono::{NaiveDate, NaiveDateTime};

/// Day/month/year, the format used by the laboratory information system.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

const FALLBACK_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

const FALLBACK_DATETIME_FORMATS: [&str; 3] =
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"];

/// Parse a collection date, returning `None` for blank or unparseable text.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use amr_common::{DEFAULT_DATE_FORMAT, parse_collection_date};
///
/// assert_eq!(
///     parse_collection_date("10/01/2024", DEFAULT_DATE_FORMAT),
///     NaiveDate::from_ymd_opt(2024, 1, 10)
/// );
/// assert_eq!(parse_collection_date("31/02/2024", DEFAULT_DATE_FORMAT), None);
/// assert_eq!(parse_collection_date("", DEFAULT_DATE_FORMAT), None);
/// ```
pub fn parse_collection_date(value: &str, format: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
        return Some(date);
    }
    for fmt in FALLBACK_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Some(date);
        }
    }
    for fmt in FALLBACK_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Absolute number of days between two dates.
pub fn day_gap(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}
