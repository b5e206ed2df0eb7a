use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, DAYS_PER_WEEK, ParseError, SPAN_SEPARATOR, Weekday, prelude::*};

/// An inclusive span of calendar days.
/// The start date is always less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateSpan {
    start: CalendarDate,
    end:   CalendarDate,
}

/// Error type for span construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpanError {
    /// Start date is after end date.
    #[error("Invalid date span: start ({start}) is after end ({end})")]
    Inverted { start: CalendarDate, end: CalendarDate },

    /// Error parsing one of the endpoints.
    #[error(transparent)]
    ParseError(#[from] ParseError),

    /// Invalid span format.
    #[error("Invalid span format: {0}")]
    InvalidFormat(String),
}

impl DateSpan {
    /// Creates a new span with validation.
    ///
    /// # Errors
    /// Returns `SpanError::Inverted` if start > end.
    pub fn new(start: CalendarDate, end: CalendarDate) -> Result<Self, SpanError> {
        if start > end {
            return Err(SpanError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates the span covering both dates, whichever order they come in.
    pub fn between(a: CalendarDate, b: CalendarDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A one-day span.
    pub const fn single(date: CalendarDate) -> Self {
        Self {
            start: date,
            end:   date,
        }
    }

    pub const fn start(&self) -> CalendarDate {
        self.start
    }

    pub const fn end(&self) -> CalendarDate {
        self.end
    }

    /// Number of days covered, counting both endpoints.
    pub fn day_count(&self) -> i64 {
        self.start.days_until(&self.end) + 1
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// True when the two spans share at least one day.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True when every day of `self` is also in `other`.
    pub fn is_within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// True when any day of the span falls on `weekday`.
    pub fn includes_weekday(&self, weekday: Weekday) -> bool {
        if self.day_count() >= DAYS_PER_WEEK {
            return true;
        }
        let first = i64::from(self.start.weekday().index());
        let offset = (i64::from(weekday.index()) - first).rem_euclid(DAYS_PER_WEEK);
        offset < self.day_count()
    }

    /// Narrows the span to the part inside `bounds`, or `None` if they are disjoint.
    pub fn clamp_to(&self, bounds: &Self) -> Option<Self> {
        if !self.overlaps(bounds) {
            return None;
        }
        Some(Self {
            start: self.start.max(bounds.start),
            end:   self.end.min(bounds.end),
        })
    }
}

impl From<CalendarDate> for DateSpan {
    fn from(date: CalendarDate) -> Self {
        Self::single(date)
    }
}

impl FromStr for DateSpan {
    type Err = SpanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let Some((start, end)) = trimmed.split_once(SPAN_SEPARATOR) else {
            return Err(SpanError::InvalidFormat(format!(
                "No span separator found (expected '{SPAN_SEPARATOR}'): {s}"
            )));
        };
        if end.contains(SPAN_SEPARATOR) {
            return Err(SpanError::InvalidFormat(format!(
                "Too many '{SPAN_SEPARATOR}' separators: {s}"
            )));
        }

        let start = start.trim().parse::<CalendarDate>()?;
        let end = end.trim().parse::<CalendarDate>()?;
        Self::new(start, end)
    }
}

impl Serialize for DateSpan {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateSpan {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
