// Timestamp parsing and formatting shared by charts, history queries and tables
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Format the backend writes and expects: `2024-03-01 01:05:00 PM`.
pub const BACKEND_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

const FALLBACK_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse a backend timestamp.
///
/// Accepts the backend's 12-hour format first, then RFC 3339, a few 24-hour
/// variants and a bare date (taken as midnight). Returns `None` for anything
/// else; callers decide how unparseable stamps order.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, BACKEND_FORMAT) {
        return Some(parsed);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }

    for format in FALLBACK_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(parsed);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn format_backend(value: &NaiveDateTime) -> String {
    value.format(BACKEND_FORMAT).to_string()
}
