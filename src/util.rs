// Parsing and normalization helpers.
//
// This module centralizes all the "dirty" CSV text handling so the loader
// and reports can work with typed values.
use crate::types::FieldOutcome;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

// Day-first formats come first: the extracts are Brazilian.
const DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Trim and upper-case free text so categories compare reliably.
pub fn normalize_label(s: &str) -> String {
    s.trim().to_uppercase()
}

/// Blank cells and pandas-style `NaN` both mean "no value".
pub fn is_blank(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case("nan")
}

/// Best-effort date parser for the fact date column.
///
/// Accepts plain dates and date-times in the formats the extracts have used.
/// Years outside 1900..=2100 are treated as garbage rather than trusted.
pub fn parse_date_safe(s: Option<&str>) -> FieldOutcome<NaiveDate> {
    let raw = match s {
        Some(raw) if !is_blank(raw) => raw.trim(),
        _ => return FieldOutcome::Missing,
    };
    let parsed = DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        });
    match parsed {
        Some(d) if (1900..=2100).contains(&d.year()) => FieldOutcome::Present(d),
        _ => FieldOutcome::Invalid(raw.to_string()),
    }
}

/// Extract the hour of day from the fact time column.
///
/// Times are stored as bare digits with the leading zero often dropped
/// (`"815"` is 08:15), so the value is left-padded to four characters and
/// the first two are read as the hour.
pub fn parse_hour_safe(s: Option<&str>) -> FieldOutcome<u8> {
    let raw = match s {
        Some(raw) if !is_blank(raw) => raw.trim(),
        _ => return FieldOutcome::Missing,
    };
    let width = raw.chars().count();
    let padded = if width < 4 {
        format!("{}{}", "0".repeat(4 - width), raw)
    } else {
        raw.to_string()
    };
    let head: String = padded.chars().take(2).collect();
    match head.parse::<u8>() {
        Ok(h) if h <= 23 => FieldOutcome::Present(h),
        _ => FieldOutcome::Invalid(raw.to_string()),
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Used for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
