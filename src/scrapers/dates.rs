//! Date string normalization.
//!
//! Each site prints dates its own way and the output keeps each source's
//! established rendering, so these helpers only reshape what the page says.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static ISO_DAY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("static regex"));

static CLOCK_TIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+\d{1,2}:\d{2}").expect("static regex"));

/// `2025-05-02T22:47:00Z` → `02-05-2025`. `None` unless the value starts with a day.
pub fn iso_to_display(raw: &str) -> Option<String> {
    let caps = ISO_DAY.captures(raw.trim())?;
    Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]))
}

/// `12. 5. 2024 14:30` → `12-5-2024`. `None` when nothing is left.
pub fn dotted_to_display(raw: &str) -> Option<String> {
    let without_time = CLOCK_TIME.replace_all(raw.trim(), "");
    let formatted: String = without_time
        .replace('.', "-")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let formatted = formatted.trim_end_matches('-').to_string();
    (!formatted.is_empty()).then_some(formatted)
}

/// Listing date such as `9.4.2024 12:00` → `9-4-2024`.
///
/// The first word must be a real `D.M.YYYY` day; its digits are kept as
/// printed, without zero padding.
pub fn listing_date_label(raw: &str) -> Option<String> {
    let first = raw.split_whitespace().next()?.trim_end_matches('.');
    NaiveDate::parse_from_str(first, "%d.%m.%Y").ok()?;
    Some(first.replace('.', "-"))
}
