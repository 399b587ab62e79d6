//! Date strings found in record bodies
//!
//! Workouts carry ISO dates or full timestamps. Daily stats imported from
//! phone shortcuts look like `Jan 15, 2025 at 7:02 AM`.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use std::sync::OnceLock;

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

fn at_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<date>.+?)\s+at\s+(?P<time>.+)$").expect("valid regex"))
}

/// Calendar day of a record date string
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }

    let date_part = at_separator()
        .captures(raw)
        .and_then(|c| c.name("date"))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
        .or_else(|| {
            // "2025-01-15 07:00" and similar
            date_part
                .get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

/// `M/D/YYYY`, or the raw text when it is not a recognisable date
pub fn short_date(raw: &str) -> String {
    match parse_day(raw) {
        Some(day) => day.format("%-m/%-d/%Y").to_string(),
        None => raw.to_string(),
    }
}
