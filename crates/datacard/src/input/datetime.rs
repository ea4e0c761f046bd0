//! Date and timestamp parsing for loosely formatted values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

// =============================================================================
// LAZY STATIC PATTERNS
// =============================================================================
// Cheap shape check before trying every chrono format.

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        ^\s*(
            \d{4}[-/]\d{1,2}[-/]\d{1,2}           # ISO / alt ISO
          | \d{1,2}[/.\-]\d{1,2}[/.\-]\d{4}       # US / European
          | [a-z]{3,9}\.?\s+\d{1,2},?\s+\d{4}     # Jan 5, 2024
          | \d{1,2}\s+[a-z]{3,9}\.?,?\s+\d{4}     # 5 Jan 2024
        )",
    )
    .expect("date shape pattern is valid")
});

/// Date-time formats tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Offset formats RFC 3339 rejects, such as `+0000` without a colon.
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Date-only formats tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%d-%m-%Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Parse a string into a timestamp.
///
/// Offsets are normalized to UTC. Date-only values land on midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !DATE_SHAPE.is_match(trimmed) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, format) {
            return Some(dt.naive_utc());
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    None
}

/// Format a timestamp the way the report prints it.
///
/// Sub-second precision is kept as microseconds when present.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}
