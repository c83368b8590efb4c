//! Calendar helpers shared by the time-range parsers: month-name aliases,
//! date-literal parsing and the canonical DD-MM-YYYY rendering.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

/// Lowercase month name / three-letter abbreviation / "sept" -> month number.
static MONTH_ALIASES: Lazy<HashMap<String, u32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        let full = name.to_ascii_lowercase();
        let n = idx as u32 + 1;
        m.insert(full[..3].to_string(), n);
        m.insert(full, n);
    }
    m.insert("sept".to_string(), 9);
    m
});

/// Where the four-digit year sits in a literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum YearPos { First, Last }

/// Accepted literal layouts, tried in order.
const DATE_INPUT_FORMATS: [(&str, char, YearPos); 4] = [
    ("%d-%m-%Y", '-', YearPos::Last),
    ("%d/%m/%Y", '/', YearPos::Last),
    ("%Y-%m-%d", '-', YearPos::First),
    ("%Y/%m/%d", '/', YearPos::First),
];

pub const DISPLAY_FORMAT: &str = "%d-%m-%Y";

/// Resolve a month name or abbreviation, case-insensitively.
pub fn month_from_name(name: &str) -> Option<u32> {
    MONTH_ALIASES.get(name.trim().to_ascii_lowercase().as_str()).copied()
}

/// Full English month name for 1..=12.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// Canonical DD-MM-YYYY rendering used in every user-visible phrase.
pub fn format_display_date(d: NaiveDate) -> String {
    d.format(DISPLAY_FORMAT).to_string()
}

/// Parse a user-supplied date literal. Trailing `.`/`,` are dropped and `.` is
/// accepted as a separator. Returns `None` unless some format yields a valid date.
pub fn parse_date_literal(value: &str) -> Option<NaiveDate> {
    let cleaned = value.trim().trim_end_matches(&['.', ','][..]);
    let normalized = cleaned.replace('.', "-");
    DATE_INPUT_FORMATS.iter().find_map(|(fmt, sep, year_pos)| {
        if !has_four_digit_year(&normalized, *sep, *year_pos) { return None; }
        NaiveDate::parse_from_str(&normalized, fmt).ok()
    })
    .filter(|d| (1..=9999).contains(&d.year()))
}

// chrono's %Y accepts any digit count; literals must spell the year with four.
fn has_four_digit_year(s: &str, sep: char, year_pos: YearPos) -> bool {
    let year = match year_pos {
        YearPos::First => s.split(sep).next(),
        YearPos::Last => s.rsplit(sep).next(),
    };
    year.map(|y| y.len() == 4 && y.bytes().all(|b| b.is_ascii_digit())).unwrap_or(false)
}

/// Number of days in the given month, leap-year aware.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some(next.signed_duration_since(first).num_days() as u32)
}

/// First and last calendar day of a month.
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    if !(1..=9999).contains(&year) { return None; }
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = NaiveDate::from_ymd_opt(year, month, days_in_month(year, month)?)?;
    Some((start, end))
}

/// Years render zero-padded to four digits so a rendered phrase always re-parses.
pub fn format_year(d: NaiveDate) -> String { format!("{:04}", d.year()) }
