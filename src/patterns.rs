//! Expiry layouts and the matchers that recognize them.
//!
//! Each matcher is a total function from trimmed input to an optional
//! [`ParsedExpiry`]. They are tried in [`PatternFamily`] order and the first hit
//! wins. The families are disjoint by construction: a month name needs letters,
//! month-first needs a 1-2 digit head, year-first needs a 4 digit head, and the
//! compact layout has no separator at all.

use crate::ParsedExpiry;
use crate::prelude::*;
use crate::types::{FieldOrder, LetterCase, Month, MonthToken, Separator, YearWidth};

/// The lexical shapes an expiry value can take, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum PatternFamily {
    /// `Aug-29`, `AUGUST/2029`, `sept-30`
    #[display(fmt = "month name")]
    MonthName,
    /// `8/29`, `08-29`, `8/2029`, `08-2029`
    #[display(fmt = "numeric month-first")]
    NumericMonthFirst,
    /// `2029/8`, `2029-08`
    #[display(fmt = "numeric year-first")]
    NumericYearFirst,
    /// `0829`, `082029`
    #[display(fmt = "compact")]
    Compact,
}

type Matcher = fn(&str) -> Option<ParsedExpiry>;

const MATCHERS: [(PatternFamily, Matcher); 4] = [
    (PatternFamily::MonthName, month_name),
    (PatternFamily::NumericMonthFirst, numeric_month_first),
    (PatternFamily::NumericYearFirst, numeric_year_first),
    (PatternFamily::Compact, compact),
];

/// Runs the matchers in priority order over already-trimmed input.
pub(crate) fn match_first(input: &str) -> Option<ParsedExpiry> {
    MATCHERS.iter().find_map(|(_, matcher)| matcher(input))
}

/// Runs a single family's matcher.
pub fn match_family(family: PatternFamily, input: &str) -> Option<ParsedExpiry> {
    MATCHERS
        .iter()
        .find(|(f, _)| *f == family)
        .and_then(|(_, matcher)| matcher(input))
}

/// Splits `head<sep>tail` where `sep` occurs exactly once.
fn split_fields(input: &str) -> Option<(&str, Separator, &str)> {
    let (at, c) = input
        .char_indices()
        .find(|&(_, c)| Separator::from_char(c).is_some())?;
    let separator = Separator::from_char(c)?;
    let head = &input[..at];
    let tail = &input[at + c.len_utf8()..];
    if tail.chars().any(|c| Separator::from_char(c).is_some()) {
        return None;
    }
    Some((head, separator, tail))
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Year field of 2 or 4 ASCII digits, expanded to a full year.
fn year_field(digits: &str) -> Option<(i32, YearWidth)> {
    if !is_digits(digits) {
        return None;
    }
    let width = YearWidth::from_digits(digits.len())?;
    let written: i32 = digits.parse().ok()?;
    Some((width.expand(written), width))
}

/// Month field of 1 or 2 ASCII digits with a value in 1..=12.
fn numeric_month_field(digits: &str) -> Option<(Month, MonthToken)> {
    if !is_digits(digits) || digits.len() > 2 {
        return None;
    }
    let month = Month::new(digits.parse().ok()?).ok()?;
    let width = u8::try_from(digits.len()).ok()?;
    Some((month, MonthToken::Numeric { width }))
}

fn month_name(input: &str) -> Option<ParsedExpiry> {
    let (head, separator, tail) = split_fields(input)?;
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    let month = Month::from_name(head)?;
    let (year, year_width) = year_field(tail)?;
    let token = MonthToken::Name {
        len: u8::try_from(head.len()).ok()?,
        case: LetterCase::detect(head),
    };
    Some(ParsedExpiry::new(
        month,
        year,
        year_width,
        separator,
        FieldOrder::MonthFirst,
        token,
    ))
}

fn numeric_month_first(input: &str) -> Option<ParsedExpiry> {
    let (head, separator, tail) = split_fields(input)?;
    let (month, token) = numeric_month_field(head)?;
    let (year, year_width) = year_field(tail)?;
    Some(ParsedExpiry::new(
        month,
        year,
        year_width,
        separator,
        FieldOrder::MonthFirst,
        token,
    ))
}

/// Only four-digit years lead; `29/08` would collide with month-first `MM/YY`.
fn numeric_year_first(input: &str) -> Option<ParsedExpiry> {
    let (head, separator, tail) = split_fields(input)?;
    let (year, year_width) = year_field(head)?;
    if year_width != YearWidth::Four {
        return None;
    }
    let (month, token) = numeric_month_field(tail)?;
    Some(ParsedExpiry::new(
        month,
        year,
        year_width,
        separator,
        FieldOrder::YearFirst,
        token,
    ))
}

/// `MMYY` or `MMYYYY`: always a two-digit month followed by the year.
fn compact(input: &str) -> Option<ParsedExpiry> {
    if !is_digits(input) || !matches!(input.len(), 4 | 6) {
        return None;
    }
    let (head, tail) = input.split_at(2);
    let (month, token) = numeric_month_field(head)?;
    let (year, year_width) = year_field(tail)?;
    Some(ParsedExpiry::new(
        month,
        year,
        year_width,
        Separator::None,
        FieldOrder::MonthFirst,
        token,
    ))
}
