use crate::ParseError;
use crate::consts::{
    ABBREVIATION_LEN, CENTURY, DASH_SEPARATOR, MAX_MONTH, MONTH_NAMES, SEPTEMBER,
    SEPTEMBER_ALT_ABBREVIATION_LEN, SLASH_SEPARATOR, TWO_DIGIT_YEAR_BASE,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// A month value guaranteed to be in the range `1..=MAX_MONTH` (1..=12)
/// Uses `NonZeroU8` internally, so 0 is not a valid month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Creates a new Month, validating that it's non-zero and <= `MAX_MONTH`
    ///
    /// # Errors
    /// Returns `ParseError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, ParseError> {
        let non_zero = NonZeroU8::new(value).ok_or(ParseError::InvalidMonth(value))?;
        if value > MAX_MONTH {
            return Err(ParseError::InvalidMonth(value));
        }
        Ok(Self(non_zero))
    }

    /// Looks up an English month name or abbreviation, ignoring case.
    ///
    /// Accepts the full name, the three-letter abbreviation, and `Sept`.
    pub fn from_name(token: &str) -> Option<Self> {
        let len = token.len();
        MONTH_NAMES.iter().zip(1..=MAX_MONTH).find_map(|(name, number)| {
            let accepted_len = len == name.len()
                || len == ABBREVIATION_LEN
                || (number == SEPTEMBER && len == SEPTEMBER_ALT_ABBREVIATION_LEN);
            let matches = accepted_len
                && name
                    .get(..len)
                    .is_some_and(|prefix| prefix.eq_ignore_ascii_case(token));
            if matches { Self::new(number).ok() } else { None }
        })
    }

    /// Returns the month value as u8
    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }

    /// Full English name in title case
    pub const fn name(self) -> &'static str {
        MONTH_NAMES[(self.0.get() - 1) as usize]
    }
}

impl TryFrom<u8> for Month {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Character between the month and year fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Separator {
    #[display(fmt = "-")]
    Dash,
    #[display(fmt = "/")]
    Slash,
    /// Fields are concatenated (`0829`, `082029`)
    #[display(fmt = "")]
    None,
}

impl Separator {
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            DASH_SEPARATOR => Some(Self::Dash),
            SLASH_SEPARATOR => Some(Self::Slash),
            _ => None,
        }
    }
}

/// Number of digits the year was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearWidth {
    Two,
    Four,
}

impl YearWidth {
    /// Width for a run of year digits; only 2 and 4 are supported.
    pub const fn from_digits(digits: usize) -> Option<Self> {
        match digits {
            2 => Some(Self::Two),
            4 => Some(Self::Four),
            _ => None,
        }
    }

    pub const fn digits(self) -> usize {
        match self {
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    /// Expands a year as written into a full year. Two-digit years are `2000 + yy`.
    pub const fn expand(self, written: i32) -> i32 {
        match self {
            Self::Two => TWO_DIGIT_YEAR_BASE + written,
            Self::Four => written,
        }
    }

    /// Renders a full year at this width.
    ///
    /// Two-digit output keeps only the year within its century. Four-digit output is
    /// zero-padded; a negative year gets a leading `-` ahead of its four digits.
    pub fn render(self, year: i32) -> String {
        match self {
            Self::Two => format!("{:02}", year.rem_euclid(CENTURY)),
            Self::Four if year < 0 => format!("-{:04}", year.unsigned_abs()),
            Self::Four => format!("{year:04}"),
        }
    }
}

/// Which field comes first in the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOrder {
    MonthFirst,
    YearFirst,
}

/// Capitalization of a month-name token, captured so the name can be written back as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterCase {
    /// `aug`
    Lower,
    /// `AUG`
    Upper,
    /// `Aug`
    Title,
    /// Anything else (`aUg`). Bit `i` set means letter `i` is uppercase.
    Mixed(u16),
}

impl LetterCase {
    /// Classifies an ASCII token. Tokens longer than 16 letters are never month names.
    pub fn detect(token: &str) -> Self {
        let mut mask: u16 = 0;
        for (i, b) in token.bytes().take(16).enumerate() {
            if b.is_ascii_uppercase() {
                mask |= 1u16 << i;
            }
        }
        let len = token.len().min(16);
        let all = if len == 16 { u16::MAX } else { (1u16 << len) - 1 };

        match mask {
            0 => Self::Lower,
            m if m == all => Self::Upper,
            1 => Self::Title,
            m => Self::Mixed(m),
        }
    }

    /// Writes `word` with this capitalization.
    pub fn apply(self, word: &str) -> String {
        word.chars()
            .enumerate()
            .map(|(i, c)| {
                let upper = match self {
                    Self::Lower => false,
                    Self::Upper => true,
                    Self::Title => i == 0,
                    Self::Mixed(mask) => i < 16 && mask & (1u16 << i) != 0,
                };
                if upper {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    }
}

/// How the month field was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthToken {
    /// Digits; `width` is 1 (`8`) or 2 (`08`, `12`)
    Numeric { width: u8 },
    /// An English name, `len` letters long (a prefix of the full name)
    Name { len: u8, case: LetterCase },
}

/// Coarse classification of a [`MonthToken`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MonthTokenKind {
    #[display(fmt = "numeric")]
    Numeric,
    #[display(fmt = "abbreviated")]
    Abbreviated,
    #[display(fmt = "full name")]
    FullName,
}

impl MonthToken {
    pub fn kind(self, month: Month) -> MonthTokenKind {
        match self {
            Self::Numeric { .. } => MonthTokenKind::Numeric,
            Self::Name { len, .. } if usize::from(len) == month.name().len() => {
                MonthTokenKind::FullName
            }
            Self::Name { .. } => MonthTokenKind::Abbreviated,
        }
    }

    /// Writes `month` the way this token was originally written.
    pub fn render(self, month: Month) -> String {
        match self {
            Self::Numeric { width } => format!("{:0width$}", month.get(), width = usize::from(width)),
            Self::Name { len, case } => {
                let name = month.name();
                let spelling = name.get(..usize::from(len)).unwrap_or(name);
                case.apply(spelling)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yare::parameterized;

    #[test]
    fn test_month_new_valid() {
        for m in 1..=12 {
            assert!(Month::new(m).is_ok(), "Month {m} should be valid");
        }
    }

    #[test]
    fn test_month_new_invalid() {
        assert!(matches!(Month::new(0), Err(ParseError::InvalidMonth(0))));
        assert!(matches!(Month::new(13), Err(ParseError::InvalidMonth(13))));
    }

    #[test]
    fn test_month_try_from_and_into() {
        let month: Month = 8.try_into().unwrap();
        let value: u8 = month.into();
        assert_eq!(value, 8);
        assert_eq!(month.to_string(), "8");

        let result: Result<Month, _> = 13.try_into();
        assert!(result.is_err());
    }

    #[test]
    fn test_month_serde() {
        let month = Month::new(8).unwrap();
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "8");
        let parsed: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(month, parsed);

        let result: Result<Month, _> = serde_json::from_str("13");
        assert!(result.is_err());
    }

    #[parameterized(
        abbreviation = { "Aug", 8 },
        full = { "August", 8 },
        upper = { "DEC", 12 },
        lower_full = { "february", 2 },
        may = { "May", 5 },
        sept = { "Sept", 9 },
        sep = { "sep", 9 },
        september = { "SEPTEMBER", 9 },
    )]
    fn test_month_from_name(token: &str, expected: u8) {
        assert_eq!(Month::from_name(token).map(Month::get), Some(expected));
    }

    #[parameterized(
        empty = { "" },
        too_short = { "Au" },
        partial = { "Augu" },
        four_letter_non_september = { "Octo" },
        too_long = { "Augusts" },
        not_a_month = { "Foo" },
    )]
    fn test_month_from_name_rejects(token: &str) {
        assert_eq!(Month::from_name(token), None);
    }

    #[test]
    fn test_month_name() {
        assert_eq!(Month::new(1).unwrap().name(), "January");
        assert_eq!(Month::new(12).unwrap().name(), "December");
    }

    #[test]
    fn test_separator() {
        assert_eq!(Separator::from_char('-'), Some(Separator::Dash));
        assert_eq!(Separator::from_char('/'), Some(Separator::Slash));
        assert_eq!(Separator::from_char('.'), None);
        assert_eq!(Separator::Slash.to_string(), "/");
        assert_eq!(Separator::None.to_string(), "");
    }

    #[test]
    fn test_year_width_expand() {
        assert_eq!(YearWidth::Two.expand(29), 2029);
        assert_eq!(YearWidth::Two.expand(0), 2000);
        assert_eq!(YearWidth::Four.expand(1999), 1999);
        assert_eq!(YearWidth::from_digits(3), None);
    }

    #[test]
    fn test_year_width_render() {
        assert_eq!(YearWidth::Two.render(2032), "32");
        assert_eq!(YearWidth::Two.render(2105), "05");
        assert_eq!(YearWidth::Two.render(1995), "95");
        assert_eq!(YearWidth::Two.render(-5), "95");
        assert_eq!(YearWidth::Four.render(2032), "2032");
        assert_eq!(YearWidth::Four.render(7), "0007");
        assert_eq!(YearWidth::Four.render(-3), "-0003");
    }

    #[parameterized(
        lower = { "aug", LetterCase::Lower },
        upper = { "AUG", LetterCase::Upper },
        title = { "Aug", LetterCase::Title },
        mixed = { "aUg", LetterCase::Mixed(0b010) },
        camel = { "SePt", LetterCase::Mixed(0b0101) },
    )]
    fn test_letter_case_detect(token: &str, expected: LetterCase) {
        let case = LetterCase::detect(token);
        assert_eq!(case, expected);
        assert_eq!(case.apply(&token.to_ascii_lowercase()), token);
    }

    #[test]
    fn test_month_token_render() {
        let aug = Month::new(8).unwrap();
        assert_eq!(MonthToken::Numeric { width: 1 }.render(aug), "8");
        assert_eq!(MonthToken::Numeric { width: 2 }.render(aug), "08");
        let name = MonthToken::Name {
            len: 3,
            case: LetterCase::Upper,
        };
        assert_eq!(name.render(aug), "AUG");
        assert_eq!(name.kind(aug), MonthTokenKind::Abbreviated);

        let full = MonthToken::Name {
            len: 6,
            case: LetterCase::Title,
        };
        assert_eq!(full.render(aug), "August");
        assert_eq!(full.kind(aug), MonthTokenKind::FullName);
    }

    #[test]
    fn test_month_token_kind_may() {
        let may = Month::new(5).unwrap();
        let token = MonthToken::Name {
            len: 3,
            case: LetterCase::Title,
        };
        assert_eq!(token.kind(may), MonthTokenKind::FullName);
        assert_eq!(MonthToken::Numeric { width: 2 }.kind(may), MonthTokenKind::Numeric);
    }
}
