//! Time-range resolution.
//!
//! A time phrase is tried against an ordered list of independent parsers; the
//! first one that yields a range wins. Earlier parsers shadow later ones (a
//! "between" phrase that also contains a year is a "between" range), so the
//! order of [`RANGE_PARSERS`] is part of the contract.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::dates::{format_display_date, format_year, month_bounds, month_from_name, month_name, parse_date_literal};
use super::types::TimeRange;
use chrono::NaiveDate;

// End of a "between" phrase: trailing punctuation up to end of text, '?' or '!',
// or a '.' followed by whitespace. A '.' inside a date literal never terminates.
static BETWEEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)between\s+(.+?)\s+and\s+(.+?)(?:[.?!]*\s*$|[?!]|\.\s)").expect("valid regex")
});

static QUARTER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)in\s+q([1-4])(?:\s+of)?\s+(\d{4})(?:$|[?.!])").expect("valid regex")
});

static MONTH_YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)in\s+([a-zA-Z]+)\s+(\d{4})(?:$|[?.!])").expect("valid regex")
});

static YEAR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)in\s+(\d{4})(?:$|[?.!])").expect("valid regex")
});

/// Which parser produced a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind { Between, Quarter, MonthYear, Year }

pub type RangeParser = fn(&str) -> Option<TimeRange>;

/// Parsers in priority order.
pub const RANGE_PARSERS: [(RangeKind, RangeParser); 4] = [
    (RangeKind::Between, parse_between_range),
    (RangeKind::Quarter, parse_quarter_range),
    (RangeKind::MonthYear, parse_month_year_range),
    (RangeKind::Year, parse_year_range),
];

/// Resolve a free-text time phrase into a concrete range.
pub fn resolve(segment: &str) -> Option<TimeRange> {
    resolve_tagged(segment).map(|(_, range)| range)
}

/// Like [`resolve`] but also reports which parser matched.
pub fn resolve_tagged(segment: &str) -> Option<(RangeKind, TimeRange)> {
    let text = segment.trim();
    if text.is_empty() { return None; }
    for (kind, parser) in RANGE_PARSERS.iter() {
        if let Some(range) = parser(text) {
            debug!(target: "hierchat::interpreter", ?kind, start = %range.start, end = %range.end, "time range resolved");
            return Some((*kind, range));
        }
    }
    None
}

/// Canonical "between" phrase; both ends always render as DD-MM-YYYY.
pub fn between_phrase(start: NaiveDate, end: NaiveDate) -> String {
    format!("between {} and {}", format_display_date(start), format_display_date(end))
}

/// "between X and Y" with X, Y date literals. Reversed ranges are swapped.
pub fn parse_between_range(text: &str) -> Option<TimeRange> {
    let caps = BETWEEN_PATTERN.captures(text)?;
    let mut start = parse_date_literal(&caps[1])?;
    let mut end = parse_date_literal(&caps[2])?;
    if start > end { std::mem::swap(&mut start, &mut end); }
    Some(TimeRange { start, end, phrase: between_phrase(start, end) })
}

/// "in Q{1-4} [of] YYYY".
pub fn parse_quarter_range(text: &str) -> Option<TimeRange> {
    let caps = QUARTER_PATTERN.captures(text)?;
    let quarter: u32 = caps[1].parse().ok()?;
    let year: i32 = caps[2].parse().ok()?;
    let start_month = 3 * (quarter - 1) + 1;
    let (start, _) = month_bounds(year, start_month)?;
    let (_, end) = month_bounds(year, start_month + 2)?;
    Some(TimeRange { start, end, phrase: format!("in Q{} {}", quarter, format_year(start)) })
}

/// "in {month name} YYYY"; unknown month names are simply not a match.
pub fn parse_month_year_range(text: &str) -> Option<TimeRange> {
    let caps = MONTH_YEAR_PATTERN.captures(text)?;
    let month = month_from_name(&caps[1])?;
    let year: i32 = caps[2].parse().ok()?;
    let (start, end) = month_bounds(year, month)?;
    let phrase = format!("in {} {}", month_name(month)?, format_year(start));
    Some(TimeRange { start, end, phrase })
}

/// "in YYYY".
pub fn parse_year_range(text: &str) -> Option<TimeRange> {
    let caps = YEAR_PATTERN.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let (start, _) = month_bounds(year, 1)?;
    let (_, end) = month_bounds(year, 12)?;
    Some(TimeRange { start, end, phrase: format!("in {}", format_year(start)) })
}
