//! Event date parsing and display.
//!
//! Stored dates are ISO strings, either a bare date (`2024-05-01`) or a
//! datetime (`2024-05-01T10:00:00Z`). Display uses the calendar date only.

use crate::language::LanguageKey;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

const MONTHS_ZH: [&str; 12] = [
    "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "十一月", "十二月",
];

const MONTHS_EN: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Parse an ISO date or datetime. Offsets are normalized to UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `2024年五月1日` for Chinese, `May 1, 2024` for English.
///
/// Missing or unparseable input yields an empty string.
pub fn format_date(value: Option<&str>, key: LanguageKey) -> String {
    let Some(date) = value.and_then(parse_timestamp).map(|dt| dt.date()) else {
        return String::new();
    };
    let month = date.month0() as usize;
    if key.is_chinese() {
        format!("{}年{}{}日", date.year(), MONTHS_ZH[month], date.day())
    } else {
        format!("{} {}, {}", MONTHS_EN[month], date.day(), date.year())
    }
}

/// `start - end`, or whichever side is present.
pub fn format_date_range(start: Option<&str>, end: Option<&str>, key: LanguageKey) -> String {
    let start = format_date(start, key);
    let end = format_date(end, key);
    match (start.is_empty(), end.is_empty()) {
        (false, false) if start != end => format!("{start} - {end}"),
        (false, _) => start,
        (true, _) => end,
    }
}
