//! Restriction rules and their evaluators.
//!
//! Each rule kind checks an inclusive [`DateSpan`] and either lets it through
//! or returns the message to show the user. A single date is checked as a
//! one-day span.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{
    CalendarDate, DateSpan, MSG_BLOCKED_RANGE, MSG_OUTSIDE_ALLOWED, MSG_WEEKDAY, MSG_WEEKENDS, Weekday,
};

const fn default_true() -> bool {
    true
}

/// Outcome of a single rule: `Err` carries the message explaining the block.
pub type RuleOutcome = Result<(), String>;

/// One configured restriction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Restriction {
    #[serde(rename = "weekday")]
    Weekday(WeekdayRule),
    #[serde(rename = "daterange")]
    DateRange(DateRangeRule),
    #[serde(rename = "boundary")]
    Boundary(BoundaryRule),
    #[serde(rename = "allowedranges")]
    AllowedRanges(AllowedRangesRule),
    #[serde(rename = "restricted_boundary")]
    RestrictedBoundary(RestrictedBoundaryRule),
}

/// Blocks spans touching any of the listed weekdays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub days:    BTreeSet<Weekday>,
}

/// Blocks spans overlapping any of the listed ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ranges:  Vec<RangeEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryDirection {
    /// Dates earlier than the boundary are blocked.
    Before,
    /// Dates later than the boundary are blocked.
    After,
}

/// A minimum or maximum selectable date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundaryRule {
    #[serde(default = "default_true")]
    pub enabled:   bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message:   Option<String>,
    pub date:      CalendarDate,
    pub direction: BoundaryDirection,
    /// When set, the boundary date itself is blocked too.
    #[serde(default)]
    pub inclusive: bool,
}

/// Only spans lying entirely inside one of the listed ranges are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedRangesRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ranges:  Vec<RangeEntry>,
}

/// Ranges that confine a selection anchored inside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestrictedBoundaryRule {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ranges:  Vec<BoundaryEntry>,
}

/// A configured `start..=end` range with an optional message of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEntry {
    pub start:   CalendarDate,
    pub end:     CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryEntry {
    pub start:      CalendarDate,
    pub end:        CalendarDate,
    #[serde(default = "default_true")]
    pub restricted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message:    Option<String>,
    /// Sub-ranges where an anchor does not get confined, and which a
    /// confined selection cannot cross.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exceptions: Vec<RangeEntry>,
}

/// The region a restricted boundary confines an anchored selection to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryRegion<'a> {
    pub span:    DateSpan,
    pub message: Option<&'a str>,
}

impl RangeEntry {
    pub const fn new(start: CalendarDate, end: CalendarDate) -> Self {
        Self {
            start,
            end,
            message: None,
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// The entry as a span; `None` when it is inverted.
    pub fn span(&self) -> Option<DateSpan> {
        let span = DateSpan::new(self.start, self.end).ok();
        if span.is_none() {
            trace!(start = %self.start, end = %self.end, "skipping inverted range entry");
        }
        span
    }
}

impl BoundaryEntry {
    pub const fn new(start: CalendarDate, end: CalendarDate) -> Self {
        Self {
            start,
            end,
            restricted: true,
            message: None,
            exceptions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_exception(mut self, exception: RangeEntry) -> Self {
        self.exceptions.push(exception);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Confinement region for `anchor`, or `None` when this entry does not
    /// capture it.
    ///
    /// The region is the entry's span, cut short before the nearest exception
    /// on either side of the anchor.
    fn region_for(&self, anchor: CalendarDate) -> Option<DateSpan> {
        if !self.restricted {
            return None;
        }
        let span = RangeEntry::new(self.start, self.end).span()?;
        if !span.contains(&anchor) {
            return None;
        }

        let mut lo = span.start();
        let mut hi = span.end();
        for exception in self.exceptions.iter().filter_map(RangeEntry::span) {
            if exception.contains(&anchor) {
                return None;
            }
            if exception.end() < anchor {
                if let Some(next) = exception.end().succ() {
                    lo = lo.max(next);
                }
            } else if let Some(prev) = exception.start().pred() {
                hi = hi.min(prev);
            }
        }
        Some(DateSpan::between(lo, hi))
    }
}

impl WeekdayRule {
    pub fn check(&self, span: &DateSpan) -> RuleOutcome {
        if self.days.iter().any(|day| span.includes_weekday(*day)) {
            return Err(self.message.clone().unwrap_or_else(|| self.default_message().to_owned()));
        }
        Ok(())
    }

    fn default_message(&self) -> &'static str {
        let weekends = self.days.len() == 2 && self.days.iter().all(|day| day.is_weekend());
        if weekends { MSG_WEEKENDS } else { MSG_WEEKDAY }
    }
}

impl DateRangeRule {
    pub fn check(&self, span: &DateSpan) -> RuleOutcome {
        let hit = self
            .ranges
            .iter()
            .find(|entry| entry.span().is_some_and(|blocked| blocked.overlaps(span)));
        match hit {
            Some(entry) => Err(entry
                .message
                .as_ref()
                .or(self.message.as_ref())
                .map_or_else(|| MSG_BLOCKED_RANGE.to_owned(), Clone::clone)),
            None => Ok(()),
        }
    }
}

impl BoundaryRule {
    pub fn check(&self, span: &DateSpan) -> RuleOutcome {
        let blocked = match self.direction {
            BoundaryDirection::Before => {
                span.start() < self.date || (self.inclusive && span.start() == self.date)
            },
            BoundaryDirection::After => span.end() > self.date || (self.inclusive && span.end() == self.date),
        };
        if blocked {
            return Err(self.message.clone().unwrap_or_else(|| self.default_message()));
        }
        Ok(())
    }

    fn default_message(&self) -> String {
        let relation = match (self.direction, self.inclusive) {
            (BoundaryDirection::Before, false) => "before",
            (BoundaryDirection::Before, true) => "on or before",
            (BoundaryDirection::After, false) => "after",
            (BoundaryDirection::After, true) => "on or after",
        };
        format!("Dates {relation} {} are not available", self.date)
    }
}

impl AllowedRangesRule {
    pub fn check(&self, span: &DateSpan) -> RuleOutcome {
        let allowed: Vec<(&RangeEntry, DateSpan)> = self
            .ranges
            .iter()
            .filter_map(|entry| entry.span().map(|s| (entry, s)))
            .collect();
        // A rule without any usable range has nothing to allow against.
        if allowed.is_empty() || allowed.iter().any(|(_, s)| span.is_within(s)) {
            return Ok(());
        }

        // Prefer the message of a range the span partially covers.
        let partial = allowed
            .iter()
            .find(|(entry, s)| entry.message.is_some() && s.overlaps(span))
            .and_then(|(entry, _)| entry.message.clone());
        Err(partial
            .or_else(|| self.message.clone())
            .unwrap_or_else(|| MSG_OUTSIDE_ALLOWED.to_owned()))
    }
}

impl RestrictedBoundaryRule {
    /// Never blocks: restricted boundaries clamp selections instead.
    pub const fn check(&self, _span: &DateSpan) -> RuleOutcome {
        Ok(())
    }

    /// The first range that captures `anchor`, with the message to report
    /// when it clamps a selection.
    pub fn region_for(&self, anchor: CalendarDate) -> Option<BoundaryRegion<'_>> {
        self.ranges.iter().find_map(|entry| {
            entry.region_for(anchor).map(|span| BoundaryRegion {
                span,
                message: entry.message.as_deref().or(self.message.as_deref()),
            })
        })
    }
}

impl Restriction {
    pub const fn is_enabled(&self) -> bool {
        match self {
            Self::Weekday(rule) => rule.enabled,
            Self::DateRange(rule) => rule.enabled,
            Self::Boundary(rule) => rule.enabled,
            Self::AllowedRanges(rule) => rule.enabled,
            Self::RestrictedBoundary(rule) => rule.enabled,
        }
    }

    /// Evaluates this rule against `span`, ignoring whether it is enabled.
    pub fn check(&self, span: &DateSpan) -> RuleOutcome {
        match self {
            Self::Weekday(rule) => rule.check(span),
            Self::DateRange(rule) => rule.check(span),
            Self::Boundary(rule) => rule.check(span),
            Self::AllowedRanges(rule) => rule.check(span),
            Self::RestrictedBoundary(rule) => rule.check(span),
        }
    }

    pub fn weekdays(days: impl IntoIterator<Item = Weekday>) -> Self {
        Self::Weekday(WeekdayRule {
            enabled: true,
            message: None,
            days:    days.into_iter().collect(),
        })
    }

    pub fn blocked_ranges(ranges: impl IntoIterator<Item = RangeEntry>) -> Self {
        Self::DateRange(DateRangeRule {
            enabled: true,
            message: None,
            ranges:  ranges.into_iter().collect(),
        })
    }

    pub const fn boundary(date: CalendarDate, direction: BoundaryDirection, inclusive: bool) -> Self {
        Self::Boundary(BoundaryRule {
            enabled: true,
            message: None,
            date,
            direction,
            inclusive,
        })
    }

    pub fn allowed_ranges(ranges: impl IntoIterator<Item = RangeEntry>) -> Self {
        Self::AllowedRanges(AllowedRangesRule {
            enabled: true,
            message: None,
            ranges:  ranges.into_iter().collect(),
        })
    }

    pub fn restricted_boundaries(ranges: impl IntoIterator<Item = BoundaryEntry>) -> Self {
        Self::RestrictedBoundary(RestrictedBoundaryRule {
            enabled: true,
            message: None,
            ranges:  ranges.into_iter().collect(),
        })
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        *self.message_mut() = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        match &mut self {
            Self::Weekday(rule) => rule.enabled = enabled,
            Self::DateRange(rule) => rule.enabled = enabled,
            Self::Boundary(rule) => rule.enabled = enabled,
            Self::AllowedRanges(rule) => rule.enabled = enabled,
            Self::RestrictedBoundary(rule) => rule.enabled = enabled,
        }
        self
    }

    fn message_mut(&mut self) -> &mut Option<String> {
        match self {
            Self::Weekday(rule) => &mut rule.message,
            Self::DateRange(rule) => &mut rule.message,
            Self::Boundary(rule) => &mut rule.message,
            Self::AllowedRanges(rule) => &mut rule.message,
            Self::RestrictedBoundary(rule) => &mut rule.message,
        }
    }
}

/// The ordered rule list a picker evaluates.
///
/// Deserialization skips entries that do not form a valid [`Restriction`]
/// (unknown `type`, missing or ill-typed fields) instead of failing, so one
/// bad rule never disables the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestrictionConfig {
    #[serde(default, deserialize_with = "deserialize_lenient")]
    restrictions: Vec<Restriction>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeRestriction {
    Valid(Restriction),
    Malformed(serde::de::IgnoredAny),
}

fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Vec<Restriction>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entries = Vec::<MaybeRestriction>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            MaybeRestriction::Valid(restriction) => Some(restriction),
            MaybeRestriction::Malformed(_) => None,
        })
        .collect())
}

impl RestrictionConfig {
    pub const fn new(restrictions: Vec<Restriction>) -> Self {
        Self { restrictions }
    }

    /// Parses a JSON config document of the form `{"restrictions": [...]}`.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the document itself is not valid
    /// JSON or `restrictions` is not an array. Malformed entries are skipped.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Appends a rule, keeping config order.
    #[must_use]
    pub fn with(mut self, restriction: Restriction) -> Self {
        self.restrictions.push(restriction);
        self
    }

    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    pub fn len(&self) -> usize {
        self.restrictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restrictions.is_empty()
    }

    /// Enabled rules in config order.
    pub fn enabled(&self) -> impl Iterator<Item = &Restriction> {
        self.restrictions.iter().filter(|r| r.is_enabled())
    }
}

impl FromIterator<Restriction> for RestrictionConfig {
    fn from_iter<I: IntoIterator<Item = Restriction>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
