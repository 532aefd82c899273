use super::domain::NO_DISPONIBLE;
use chrono::{NaiveDate, NaiveDateTime};

// Formats seen in historical exports, tried in order. Time-of-day, when
// present, is discarded.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

/// Best-effort coercion of a cell value to a calendar date. Returns `None`
/// for the sentinel, blanks, and anything no known format can parse; never
/// fails louder than that.
pub fn normalize(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == NO_DISPONIBLE {
        return None;
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT) {
        return Some(dt.date());
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    None
}

/// Re-render a date cell as `dd/mm/YYYY` for display. Values the normalizer
/// cannot parse (the sentinel included) pass through unchanged.
pub fn format_display(value: &str) -> String {
    match normalize(value) {
        Some(date) => date.format("%d/%m/%Y").to_string(),
        None => value.to_string(),
    }
}
