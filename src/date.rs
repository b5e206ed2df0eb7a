use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    DATE_SEPARATOR, DAYS_IN_MONTH, DECEMBER, FEBRUARY, FEBRUARY_DAYS_LEAP, JANUARY, MAX_MONTH, MAX_YEAR, MIN_DAY,
    consts::{CENTURY_CYCLE, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE},
    prelude::*,
};

/// A calendar day with no time-of-day or timezone attached.
///
/// Two values are the same day exactly when they are equal, and the derived
/// ordering is chronological, so this type is the day-identity and ordering
/// primitive the rest of the crate builds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", year, month, day)]
pub struct CalendarDate {
    year:  u16,
    month: u8,
    day:   u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ParseError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
    #[display(fmt = "Invalid weekday: {_0} (must be 0-6)")]
    InvalidWeekday(u8),
    #[display(fmt = "Empty date string")]
    EmptyInput,
}

impl std::error::Error for ParseError {}

/// Day of the week, numbered from Sunday = 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub const ALL: [Self; 7] = [
        Self::Sunday,
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
    ];

    /// Returns the weekday for `0..=6`, Sunday first.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidWeekday` for values above 6.
    pub fn from_index(index: u8) -> Result<Self, ParseError> {
        Self::ALL
            .get(usize::from(index))
            .copied()
            .ok_or(ParseError::InvalidWeekday(index))
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn is_weekend(self) -> bool {
        matches!(self, Self::Saturday | Self::Sunday)
    }
}

impl TryFrom<u8> for Weekday {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value)
    }
}

impl From<Weekday> for u8 {
    fn from(weekday: Weekday) -> Self {
        weekday.index()
    }
}

impl CalendarDate {
    /// Creates a date from its components, validating each one.
    ///
    /// # Errors
    /// Returns the `ParseError` variant naming the first invalid component.
    pub fn from_ymd(year: u16, month: u8, day: u8) -> Result<Self, ParseError> {
        if year == 0 || year > MAX_YEAR {
            return Err(ParseError::InvalidYear(year));
        }
        if month == 0 || month > MAX_MONTH {
            return Err(ParseError::InvalidMonth(month));
        }
        if day < MIN_DAY || day > days_in_month(year, month) {
            return Err(ParseError::InvalidDay { month, day, year });
        }
        Ok(Self { year, month, day })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    pub const fn month(&self) -> u8 {
        self.month
    }

    pub const fn day(&self) -> u8 {
        self.day
    }

    /// True when both values name the same calendar day.
    #[inline]
    pub fn is_same_day(&self, other: &Self) -> bool {
        self == other
    }

    /// The following day, or `None` past 9999-12-31.
    pub fn succ(&self) -> Option<Self> {
        if self.day < days_in_month(self.year, self.month) {
            return Some(Self {
                day: self.day + 1,
                ..*self
            });
        }
        if self.month == DECEMBER {
            if self.year >= MAX_YEAR {
                return None;
            }
            return Some(Self {
                year:  self.year + 1,
                month: JANUARY,
                day:   MIN_DAY,
            });
        }
        Some(Self {
            year:  self.year,
            month: self.month + 1,
            day:   MIN_DAY,
        })
    }

    /// The preceding day, or `None` before 0001-01-01.
    pub fn pred(&self) -> Option<Self> {
        if self.day > MIN_DAY {
            return Some(Self {
                day: self.day - 1,
                ..*self
            });
        }
        let (year, month) = if self.month == JANUARY {
            if self.year <= 1 {
                return None;
            }
            (self.year - 1, DECEMBER)
        } else {
            (self.year, self.month - 1)
        };
        Some(Self {
            year,
            month,
            day: days_in_month(year, month),
        })
    }

    /// Days since 1970-01-01 (negative before it).
    pub fn to_epoch_days(&self) -> i64 {
        // Shift the year to start in March so the leap day is last.
        let month = i64::from(self.month);
        let year = i64::from(self.year) - i64::from(month <= 2);
        let era = year.div_euclid(400);
        let year_of_era = year - era * 400;
        let shifted_month = if month > 2 { month - 3 } else { month + 9 };
        let day_of_year = (153 * shifted_month + 2) / 5 + i64::from(self.day) - 1;
        let day_of_era = year_of_era * 365 + year_of_era / 4 - year_of_era / 100 + day_of_year;
        era * 146_097 + day_of_era - 719_468
    }

    /// Signed number of days from `self` to `other`.
    pub fn days_until(&self, other: &Self) -> i64 {
        other.to_epoch_days() - self.to_epoch_days()
    }

    pub fn weekday(&self) -> Weekday {
        // 1970-01-01 was a Thursday.
        let index = (self.to_epoch_days() + 4).rem_euclid(7);
        Weekday::ALL[usize::try_from(index).unwrap_or_default()]
    }

    fn parse_component<T: FromStr>(s: &str, width: usize) -> Result<T, ParseError> {
        if s.len() != width || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseError::InvalidFormat(s.to_owned()));
        }
        s.parse::<T>()
            .map_err(|_| ParseError::InvalidFormat(s.to_owned()))
    }
}

impl FromStr for CalendarDate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseError::EmptyInput);
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).collect();
        let [year, month, day] = parts.as_slice() else {
            return Err(ParseError::InvalidFormat(format!(
                "Expected yyyy{DATE_SEPARATOR}MM{DATE_SEPARATOR}dd, got {trimmed}"
            )));
        };

        let year = Self::parse_component::<u16>(year, 4)?;
        let month = Self::parse_component::<u8>(month, 2)?;
        let day = Self::parse_component::<u8>(day, 2)?;
        Self::from_ymd(year, month, day)
    }
}

impl TryFrom<&str> for CalendarDate {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
