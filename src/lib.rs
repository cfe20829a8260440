mod consts;
pub mod job;
mod patterns;
mod prelude;
mod types;

pub use consts::*;
pub use job::{ExpiryChange, ExpiryJob, ExpiryStore, JobError, JobOptions, JobReport, Outcome, Probe};
pub use patterns::{PatternFamily, match_family};
pub use types::{FieldOrder, LetterCase, Month, MonthToken, MonthTokenKind, Separator, YearWidth};

use crate::prelude::*;
use std::fmt;
use std::str::FromStr;

/// An expiry value broken into its month and year, together with everything
/// needed to write it back in exactly the shape it was read.
///
/// Only the year changes when shifting; width, separator, field order and the
/// month token travel along untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParsedExpiry {
    month: Month,
    /// Full year; two-digit input is already expanded (`29` -> 2029)
    year: i32,
    year_width: YearWidth,
    separator: Separator,
    field_order: FieldOrder,
    month_token: MonthToken,
}

/// Result of looking at one raw expiry value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recognition {
    /// Value matched one of the supported layouts
    Parsed(ParsedExpiry),
    /// Value is present but matches no layout
    Unparsable,
    /// Empty or whitespace-only; there is no expiry to update
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Unrecognized expiry format: {_0}")]
    Unparsable(String),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Empty expiry string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Recognizes a raw expiry value.
///
/// Surrounding whitespace is ignored. Malformed input is an ordinary outcome
/// ([`Recognition::Unparsable`]), never an error.
pub fn recognize(raw: &str) -> Recognition {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Recognition::Absent;
    }
    patterns::match_first(trimmed).map_or(Recognition::Unparsable, Recognition::Parsed)
}

/// Adds `years_delta` to the year and renders the result in the original layout.
///
/// A zero delta reproduces the (trimmed) source string exactly. Negative years
/// are allowed and rendered, not rejected.
pub fn shift_and_encode(parsed: ParsedExpiry, years_delta: i32) -> String {
    parsed.with_years_added(years_delta).to_string()
}

impl ParsedExpiry {
    pub(crate) const fn new(
        month: Month,
        year: i32,
        year_width: YearWidth,
        separator: Separator,
        field_order: FieldOrder,
        month_token: MonthToken,
    ) -> Self {
        Self {
            month,
            year,
            year_width,
            separator,
            field_order,
            month_token,
        }
    }

    pub const fn month(&self) -> Month {
        self.month
    }

    /// Full year, e.g. 2029 for both `Aug-29` and `Aug-2029`
    pub const fn year(&self) -> i32 {
        self.year
    }

    pub const fn year_width(&self) -> YearWidth {
        self.year_width
    }

    pub const fn separator(&self) -> Separator {
        self.separator
    }

    pub const fn field_order(&self) -> FieldOrder {
        self.field_order
    }

    pub const fn month_token(&self) -> MonthToken {
        self.month_token
    }

    pub fn month_token_kind(&self) -> MonthTokenKind {
        self.month_token.kind(self.month)
    }

    /// Which layout this value was recognized as.
    pub const fn family(&self) -> PatternFamily {
        match (self.month_token, self.field_order, self.separator) {
            (MonthToken::Name { .. }, _, _) => PatternFamily::MonthName,
            (_, FieldOrder::YearFirst, _) => PatternFamily::NumericYearFirst,
            (_, _, Separator::None) => PatternFamily::Compact,
            _ => PatternFamily::NumericMonthFirst,
        }
    }

    /// Same value, `delta` years later (or earlier). Saturates at the `i32` bounds.
    #[must_use]
    pub const fn with_years_added(self, delta: i32) -> Self {
        Self {
            year: self.year.saturating_add(delta),
            ..self
        }
    }
}

impl fmt::Display for ParsedExpiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let month = self.month_token.render(self.month);
        let year = self.year_width.render(self.year);
        match self.field_order {
            FieldOrder::MonthFirst => write!(f, "{month}{}{year}", self.separator),
            FieldOrder::YearFirst => write!(f, "{year}{}{month}", self.separator),
        }
    }
}

impl FromStr for ParsedExpiry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match recognize(s) {
            Recognition::Parsed(parsed) => Ok(parsed),
            Recognition::Unparsable => Err(ParseError::Unparsable(s.trim().to_owned())),
            Recognition::Absent => Err(ParseError::EmptyInput),
        }
    }
}

impl serde::Serialize for ParsedExpiry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ParsedExpiry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
