//! Collection-date parsing.
//!
//! Header dates come in many shapes. Patterns are tried in a fixed order and
//! the first match wins; year-only and year-month literals are canonicalised
//! to the first day of the year/month so dates stay totally ordered.

use chrono::NaiveDate;

/// One accepted date shape.
#[derive(Debug, Clone, Copy)]
enum DatePattern {
    /// A full date in a chrono format string.
    Full(&'static str),
    /// `YYYY<sep>MM`
    YearMonth(char),
    /// `YYYY`
    Year,
    /// `YYYYMMDD`
    Compact,
}

const PATTERNS: &[DatePattern] = &[
    DatePattern::Full("%Y-%m-%d"),
    DatePattern::Full("%d.%m.%Y"),
    DatePattern::Full("%Y/%m/%d"),
    DatePattern::YearMonth('-'),
    DatePattern::YearMonth('/'),
    DatePattern::Year,
    DatePattern::Full("%d-%b-%Y"),
    DatePattern::Full("%b-%d-%Y"),
    DatePattern::Compact,
];

/// Parse a header date literal.
///
/// Empty input, or input containing "unknown" in any case, yields `None`
/// without trying any pattern. Unparseable input also yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() || s.to_ascii_lowercase().contains("unknown") {
        return None;
    }
    PATTERNS.iter().find_map(|p| try_pattern(*p, s))
}

fn try_pattern(pattern: DatePattern, s: &str) -> Option<NaiveDate> {
    match pattern {
        DatePattern::Full(fmt) => NaiveDate::parse_from_str(s, fmt).ok(),
        DatePattern::YearMonth(sep) => {
            let (year, month) = s.split_once(sep)?;
            if year.len() != 4 || month.is_empty() || month.len() > 2 {
                return None;
            }
            NaiveDate::from_ymd_opt(digits(year)? as i32, digits(month)?, 1)
        }
        DatePattern::Year => {
            if s.len() != 4 {
                return None;
            }
            NaiveDate::from_ymd_opt(digits(s)? as i32, 1, 1)
        }
        DatePattern::Compact => {
            if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            NaiveDate::from_ymd_opt(
                digits(s.get(..4)?)? as i32,
                digits(s.get(4..6)?)?,
                digits(s.get(6..)?)?,
            )
        }
    }
}

/// Parse an all-ASCII-digit string.
fn digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
