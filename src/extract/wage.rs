//! Wage amount and pay cadence from free text.
//!
//! This is a heuristic reader, not a parser: the rules below are checked in a
//! fixed order and the first one that produces an amount wins. Amounts without
//! a cadence keyword are classified by magnitude alone, which is only a guess.

use regex::Regex;

use crate::patterns::PatternLibrary;
use crate::records::{WageEstimate, WageUnit};

pub fn extract(text: &str, lib: &PatternLibrary) -> WageEstimate {
    if text.is_empty() {
        return WageEstimate::absent();
    }

    if let Some(estimate) = from_range(text, lib) {
        return estimate;
    }

    // Order matters: day, then month, then hour.
    let cadences = [
        (&lib.day, WageUnit::Day),
        (&lib.month, WageUnit::Month),
        (&lib.hour, WageUnit::Hour),
    ];
    for (re, unit) in cadences {
        if let Some(amount) = first_amount(re, text) {
            return WageEstimate::single(amount, unit);
        }
    }

    if let Some(amount) = first_amount(&lib.bare_amount, text) {
        let t = &lib.thresholds;
        let unit = if amount <= t.bare_day_max {
            WageUnit::Day
        } else if amount <= t.bare_month_max {
            WageUnit::Month
        } else {
            WageUnit::Unknown
        };
        return WageEstimate::single(amount, unit);
    }

    WageEstimate::absent()
}

fn from_range(text: &str, lib: &PatternLibrary) -> Option<WageEstimate> {
    let caps = lib.range.captures(text)?;
    let lo = parse_amount(&caps[1])?;
    let hi = parse_amount(&caps[2])?;
    let upper = lo.max(hi);

    let unit = if lib.month.is_match(text) {
        WageUnit::Month
    } else if lib.day.is_match(text) {
        WageUnit::Day
    } else if lib.hour.is_match(text) {
        WageUnit::Hour
    } else if upper <= lib.thresholds.range_day_max {
        WageUnit::Day
    } else if upper <= lib.thresholds.range_month_max {
        WageUnit::Month
    } else {
        WageUnit::Unknown
    };

    Some(WageEstimate::range(lo, hi, unit))
}

/// Amount from the first match of `re`. A match whose number cannot be read
/// counts as no match.
fn first_amount(re: &Regex, text: &str) -> Option<u32> {
    let caps = re.captures(text)?;
    parse_amount(&caps[1])
}

/// Integer part of an amount like `15,000` or `450.50`. Thai digits are
/// accepted; any other non-ASCII digit makes the token unreadable.
pub fn parse_amount(token: &str) -> Option<u32> {
    let integer = token.split('.').next()?;
    let digits: String = integer
        .chars()
        .filter(|&c| c != ',')
        .map(fold_thai_digit)
        .collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn fold_thai_digit(c: char) -> char {
    match c {
        '๐'..='๙' => char::from_u32('0' as u32 + (c as u32 - '๐' as u32)).unwrap_or(c),
        _ => c,
    }
}
