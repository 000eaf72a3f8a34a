//! Effective date range parsing
//!
//! The search pages print the validity window of a cycle as
//! `<MON DD> - <MON DD>, <YYYY>[<cycle>]`, for example `JAN 18 - FEB 14, 2018[1801]`.
//! Both ends share the single trailing year.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

/// Matches a date range embedded in longer text such as a cycle label or a results summary
static DATE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z]{3}\s+\d{1,2}\s*-\s*[a-z]{3}\s+\d{1,2}\s*,\s*\d{4}(?:\s*\[\s*\d*\s*\]?)?")
        .expect("date range pattern is valid")
});

/// Validity window of a cycle, both ends at UTC midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EffectiveDateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Parses an effective date range
///
/// The text is split on the first `-` (start month/day), the remainder on the
/// first `,` (end month/day), and the tail on `[` to isolate the year. A range
/// that wraps into a new year (`DEC 07 - JAN 04, 2019`) puts the start in the
/// previous year so that `start <= end` always holds.
///
/// # Returns
///
/// * `Some(EffectiveDateRange)` - Both ends parsed
/// * `None` - Empty or absent input, or either end failed to parse
///
/// # Example
///
/// ```
/// use terminal_procedures::parse_effective_dates;
///
/// let range = parse_effective_dates("JAN 18 - FEB 14, 2018[1801]").unwrap();
/// assert_eq!(range.start.to_string(), "2018-01-18 00:00:00 UTC");
/// assert_eq!(range.end.to_string(), "2018-02-14 00:00:00 UTC");
/// assert!(parse_effective_dates(None).is_none());
/// ```
pub fn parse_effective_dates<'a>(text: impl Into<Option<&'a str>>) -> Option<EffectiveDateRange> {
    let text = text.into()?.trim();
    if text.is_empty() {
        return None;
    }

    let (start_month_day, remainder) = text.split_once('-')?;
    let (end_month_day, tail) = remainder.split_once(',')?;
    let year = tail.split('[').next()?.trim();

    let end = month_day_in_year(end_month_day, year)?;
    let mut start = month_day_in_year(start_month_day, year)?;
    if start > end {
        start = start.with_year(start.year() - 1)?;
    }

    Some(EffectiveDateRange {
        start: utc_midnight(start)?,
        end: utc_midnight(end)?,
    })
}

/// Finds the date range portion of a longer text
pub fn locate_date_range(text: &str) -> Option<&str> {
    DATE_RANGE.find(text).map(|m| m.as_str())
}

/// Drops control characters and collapses runs of whitespace into single spaces
pub fn normalize_label(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn month_day_in_year(month_day: &str, year: &str) -> Option<NaiveDate> {
    let month_day = month_day.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDate::parse_from_str(&format!("{} {}", month_day, year), "%b %d %Y").ok()
}

fn utc_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc())
}
