//! Date helper functions

use chrono::format::{Item, StrftimeItems};
use std::fmt::Write;

use crate::content::parse_date_string;

/// Format a front-matter date string with a chrono format.
///
/// Dates that do not parse, or a format chrono rejects, return the date
/// unchanged.
///
/// # Examples
/// ```ignore
/// format_date("2024-01-15", "%B %d, %Y") // -> "January 15, 2024"
/// ```
pub fn format_date(date: &str, format: &str) -> String {
    let Some(parsed) = parse_date_string(date) else {
        return date.to_string();
    };

    let mut formatted = String::new();
    match write!(formatted, "{}", parsed.format(format)) {
        Ok(()) => formatted,
        Err(_) => date.to_string(),
    }
}

/// Whether chrono accepts every specifier in `format`
pub fn is_valid_date_format(format: &str) -> bool {
    StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}

/// Machine-readable form for `<time datetime>`, empty when unparseable
pub fn date_iso(date: &str) -> String {
    parse_date_string(date)
        .map(|parsed| parsed.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
