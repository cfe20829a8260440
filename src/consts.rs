/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// Month number for September (the only month with a four-letter abbreviation)
pub const SEPTEMBER: u8 = 9;

/// Two-digit years always land in this century (29 -> 2029). No sliding pivot.
pub const TWO_DIGIT_YEAR_BASE: i32 = 2000;

/// Modulus used when rendering a two-digit year
pub(crate) const CENTURY: i32 = 100;

/// English month names, January first (index = month - 1)
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Length of the standard month abbreviation (Jan, Feb, ...)
pub const ABBREVIATION_LEN: usize = 3;
/// Length of the alternate September abbreviation (Sept)
pub(crate) const SEPTEMBER_ALT_ABBREVIATION_LEN: usize = 4;

/// Separator between month and year in dashed layouts
pub const DASH_SEPARATOR: char = '-';
/// Separator between month and year in slashed layouts
pub const SLASH_SEPARATOR: char = '/';

/// Default number of years added by the update job
pub const DEFAULT_YEARS: i32 = 3;
/// Default number of changes handed to the store per write
pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// Default number of dry-run changes kept for display
pub const DEFAULT_SHOW_SAMPLES: usize = 5;
