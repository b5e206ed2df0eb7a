/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Number of distinct weekdays; a span this long contains all of them
pub const DAYS_PER_WEEK: i64 = 7;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Span separator (ISO 8601 interval format)
pub const SPAN_SEPARATOR: char = '/';

/// Reported when `update_selection` runs without a prior `start_selection`
pub const MSG_NO_SELECTION: &str = "No selection in progress";
/// Reported when a range endpoint is not a calendar date
pub const MSG_INVALID_RANGE: &str = "Invalid date range";
/// Default for a weekday rule covering exactly Saturday and Sunday
pub const MSG_WEEKENDS: &str = "Weekends not allowed";
/// Default for any other weekday rule
pub const MSG_WEEKDAY: &str = "This day of the week is not available";
/// Default for a blocked date range
pub const MSG_BLOCKED_RANGE: &str = "Selected dates are not available";
/// Default for an allowed-ranges rule the span falls outside of
pub const MSG_OUTSIDE_ALLOWED: &str = "Selection must be within an allowed date range";
