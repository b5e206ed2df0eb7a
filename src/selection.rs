//! Range-selection state machine.
//!
//! A selection is idle until [`SelectionManager::start_selection`] anchors it
//! on a date. Each [`SelectionManager::update_selection`] then recomputes the
//! range between the anchor and the date under the pointer, ordered
//! chronologically and confined by any restricted boundary the anchor sits
//! in. Completing a selection (pointer-up and the like) is left to the UI.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    CalendarDate, DateSpan, RestrictionConfig, RestrictionManager, SelectionError, SelectionResult, UpdateResult,
};

/// The current selection value. Every manager operation returns a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start:                 Option<CalendarDate>,
    end:                   Option<CalendarDate>,
    anchor_date:           Option<CalendarDate>,
    is_backward_selection: bool,
}

impl DateRange {
    /// A range with nothing selected.
    pub const fn empty() -> Self {
        Self {
            start:                 None,
            end:                   None,
            anchor_date:           None,
            is_backward_selection: false,
        }
    }

    /// A one-day range anchored on `date`.
    pub const fn anchored(date: CalendarDate) -> Self {
        Self {
            start:                 Some(date),
            end:                   Some(date),
            anchor_date:           Some(date),
            is_backward_selection: false,
        }
    }

    pub const fn start(&self) -> Option<CalendarDate> {
        self.start
    }

    pub const fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    pub const fn anchor_date(&self) -> Option<CalendarDate> {
        self.anchor_date
    }

    pub const fn is_backward_selection(&self) -> bool {
        self.is_backward_selection
    }

    pub const fn is_empty(&self) -> bool {
        self.start.is_none()
    }

    /// Both ends are set.
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// The selected days as a span, once both ends are set.
    pub fn span(&self) -> Option<DateSpan> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(DateSpan::between(start, end)),
            _ => None,
        }
    }

    pub fn contains(&self, date: &CalendarDate) -> bool {
        self.span().is_some_and(|span| span.contains(date))
    }

    /// Number of selected days, zero when incomplete.
    pub fn day_count(&self) -> i64 {
        self.span().map_or(0, |span| span.day_count())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Every interaction selects exactly one day.
    Single,
    /// Dragging from an anchor selects a span.
    #[default]
    Range,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    restrictions: RestrictionManager,
    mode:         SelectionMode,
}

impl SelectionManager {
    pub fn new(config: Option<RestrictionConfig>, mode: SelectionMode) -> Self {
        Self {
            restrictions: RestrictionManager::new(config.unwrap_or_default()),
            mode,
        }
    }

    pub const fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub const fn restrictions(&self) -> &RestrictionManager {
        &self.restrictions
    }

    pub fn update_restrictions(&mut self, config: impl Into<Arc<RestrictionConfig>>) {
        self.restrictions.update_restrictions(config);
    }

    pub fn can_select_date(&self, date: CalendarDate) -> SelectionResult {
        self.restrictions.check_selection(date, None)
    }

    /// Checks the span between two ISO `yyyy-MM-dd` dates.
    ///
    /// Any string that is not a calendar date, including `anchor`, makes the
    /// whole range invalid. The anchor is otherwise not consulted.
    pub fn can_select_range(&self, start: &str, end: &str, anchor: Option<&str>) -> SelectionResult {
        let parsed = (
            start.parse::<CalendarDate>(),
            end.parse::<CalendarDate>(),
            anchor.map(str::parse::<CalendarDate>).transpose(),
        );
        match parsed {
            (Ok(start), Ok(end), Ok(_)) => self.can_select_span(start, end),
            _ => SelectionError::InvalidDateRange.into(),
        }
    }

    pub fn can_select_span(&self, start: CalendarDate, end: CalendarDate) -> SelectionResult {
        self.restrictions.check_selection(start, Some(end))
    }

    /// Anchors a new selection on `date`. Always succeeds.
    pub const fn start_selection(&self, date: CalendarDate) -> UpdateResult {
        UpdateResult::success(DateRange::anchored(date), None)
    }

    /// Moves the free end of `current` to `new_date`.
    ///
    /// The result is not checked against blocking restrictions; only a
    /// restricted boundary around the anchor narrows it.
    pub fn update_selection(&self, current: &DateRange, new_date: CalendarDate) -> UpdateResult {
        let Some(start) = current.start else {
            return UpdateResult::failure(*current, SelectionError::NoSelectionInProgress);
        };

        if self.mode == SelectionMode::Single {
            return UpdateResult::success(DateRange::anchored(new_date), None);
        }

        let anchor = current.anchor_date.unwrap_or(start);
        let dragged = DateSpan::between(anchor, new_date);
        let mut span = dragged;
        let mut message = None;

        if let Some(region) = self.restrictions.restricted_boundary_for(anchor) {
            if let Some(clamped) = dragged.clamp_to(&region.span) {
                if clamped != dragged {
                    debug!(%anchor, %new_date, region = %region.span, "selection clamped to restricted boundary");
                    message = region.message.map(str::to_owned);
                }
                span = clamped;
            }
        }

        let range = DateRange {
            start:                 Some(span.start()),
            end:                   Some(span.end()),
            anchor_date:           Some(anchor),
            is_backward_selection: new_date < anchor,
        };
        UpdateResult::success(range, message)
    }

    pub const fn clear(&self) -> DateRange {
        DateRange::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        BoundaryDirection, BoundaryEntry, MSG_INVALID_RANGE, MSG_NO_SELECTION, RangeEntry, Restriction, Weekday,
        test_utils::date,
    };

    fn range_manager(config: RestrictionConfig) -> SelectionManager {
        SelectionManager::new(Some(config), SelectionMode::Range)
    }

    fn boundary_config() -> RestrictionConfig {
        RestrictionConfig::default().with(Restriction::restricted_boundaries([BoundaryEntry::new(
            date("2025-06-10"),
            date("2025-06-20"),
        )
        .with_message("Stay within the booking window")]))
    }

    #[test]
    fn test_start_selection_anchors() {
        let manager = SelectionManager::new(None, SelectionMode::Single);
        let result = manager.start_selection(date("2025-06-15"));
        assert!(result.success);
        assert_eq!(result.message, None);
        assert_eq!(result.range.start(), Some(date("2025-06-15")));
        assert_eq!(result.range.end(), Some(date("2025-06-15")));
        assert_eq!(result.range.anchor_date(), Some(date("2025-06-15")));
        assert!(!result.range.is_backward_selection());
    }

    #[test]
    fn test_update_without_selection_fails() {
        for mode in [SelectionMode::Single, SelectionMode::Range] {
            let manager = SelectionManager::new(None, mode);
            let result = manager.update_selection(&DateRange::empty(), date("2025-06-15"));
            assert!(!result.success);
            assert_eq!(result.message.as_deref(), Some(MSG_NO_SELECTION));
            assert_eq!(result.range, DateRange::empty());
        }
    }

    #[test]
    fn test_single_mode_collapses() {
        let manager = SelectionManager::new(None, SelectionMode::Single);
        let started = manager.start_selection(date("2025-06-15")).range;
        let result = manager.update_selection(&started, date("2025-06-10"));
        assert!(result.success);
        assert_eq!(result.range.start(), Some(date("2025-06-10")));
        assert_eq!(result.range.end(), Some(date("2025-06-10")));
        assert!(!result.range.is_backward_selection());
    }

    #[test]
    fn test_forward_and_backward_drag() {
        let manager = SelectionManager::default();
        let started = manager.start_selection(date("2025-06-15")).range;

        let forward = manager.update_selection(&started, date("2025-06-20")).range;
        assert_eq!(forward.start(), Some(date("2025-06-15")));
        assert_eq!(forward.end(), Some(date("2025-06-20")));
        assert!(!forward.is_backward_selection());

        // The anchor survives successive updates.
        let backward = manager.update_selection(&forward, date("2025-06-10")).range;
        assert_eq!(backward.start(), Some(date("2025-06-10")));
        assert_eq!(backward.end(), Some(date("2025-06-15")));
        assert_eq!(backward.anchor_date(), Some(date("2025-06-15")));
        assert!(backward.is_backward_selection());
    }

    #[test]
    fn test_zero_length_update_is_idempotent() {
        let manager = SelectionManager::default();
        let started = manager.start_selection(date("2025-06-15")).range;
        let result = manager.update_selection(&started, date("2025-06-15"));
        assert!(result.success);
        assert_eq!(result.range, started);
    }

    #[test]
    fn test_restricted_boundary_clamps_both_directions() {
        let manager = range_manager(boundary_config());
        let started = manager.start_selection(date("2025-06-15")).range;

        let forward = manager.update_selection(&started, date("2025-06-25"));
        assert!(forward.success);
        assert_eq!(forward.range.end(), Some(date("2025-06-20")));
        assert_eq!(forward.message.as_deref(), Some("Stay within the booking window"));

        let backward = manager.update_selection(&started, date("2025-06-01"));
        assert!(backward.success);
        assert_eq!(backward.range.start(), Some(date("2025-06-10")));
        assert_eq!(backward.range.end(), Some(date("2025-06-15")));
        assert!(backward.range.is_backward_selection());

        let inside = manager.update_selection(&started, date("2025-06-18"));
        assert_eq!(inside.range.end(), Some(date("2025-06-18")));
        assert_eq!(inside.message, None);
    }

    #[test]
    fn test_restricted_boundary_ignores_outside_anchor() {
        let manager = range_manager(boundary_config());
        let started = manager.start_selection(date("2025-06-01")).range;
        let result = manager.update_selection(&started, date("2025-06-30"));
        assert_eq!(result.range.start(), Some(date("2025-06-01")));
        assert_eq!(result.range.end(), Some(date("2025-06-30")));
    }

    #[test]
    fn test_restricted_boundary_stops_before_exception() {
        let config = RestrictionConfig::default().with(Restriction::restricted_boundaries([BoundaryEntry::new(
            date("2025-06-01"),
            date("2025-06-30"),
        )
        .with_exception(RangeEntry::new(date("2025-06-20"), date("2025-06-22")))]));
        let manager = range_manager(config);
        let started = manager.start_selection(date("2025-06-15")).range;
        let result = manager.update_selection(&started, date("2025-06-28"));
        assert_eq!(result.range.end(), Some(date("2025-06-19")));
    }

    #[test]
    fn test_drag_is_not_revalidated_against_blocking_rules() {
        let config = RestrictionConfig::default()
            .with(Restriction::boundary(date("2025-06-30"), BoundaryDirection::After, false))
            .with(Restriction::blocked_ranges([RangeEntry::new(
                date("2025-06-20"),
                date("2025-06-22"),
            )]));
        let manager = range_manager(config);
        let started = manager.start_selection(date("2025-06-15")).range;
        let result = manager.update_selection(&started, date("2025-07-05"));
        assert!(result.success);
        assert_eq!(result.range.end(), Some(date("2025-07-05")));
        assert!(!manager.can_select_span(date("2025-06-15"), date("2025-07-05")).is_allowed());
    }

    #[test]
    fn test_missing_anchor_falls_back_to_start() {
        let manager = SelectionManager::default();
        let started = manager.start_selection(date("2025-06-15")).range;
        let without_anchor = DateRange {
            anchor_date: None,
            ..started
        };
        let result = manager.update_selection(&without_anchor, date("2025-06-12"));
        assert_eq!(result.range.start(), Some(date("2025-06-12")));
        assert_eq!(result.range.end(), Some(date("2025-06-15")));
        assert_eq!(result.range.anchor_date(), Some(date("2025-06-15")));
    }

    #[test]
    fn test_can_select_range_invalid_input() {
        let manager = SelectionManager::default();
        let cases = [
            ("2025-06-10", "garbage", None),
            ("", "2025-06-10", None),
            ("2025-06-10", "2025-06-12", Some("2025-02-30")),
        ];
        for (start, end, anchor) in cases {
            let result = manager.can_select_range(start, end, anchor);
            assert!(!result.allowed, "expected invalid range for {start}/{end}");
            assert_eq!(result.message.as_deref(), Some(MSG_INVALID_RANGE));
        }
    }

    #[test]
    fn test_can_select_range_is_order_independent() {
        let manager = range_manager(
            RestrictionConfig::default().with(Restriction::weekdays([Weekday::Saturday, Weekday::Sunday])),
        );
        let forward = manager.can_select_range("2025-06-16", "2025-06-23", None);
        let backward = manager.can_select_range("2025-06-23", "2025-06-16", Some("2025-06-23"));
        assert_eq!(forward, backward);
        assert!(!forward.allowed);
        assert!(manager.can_select_range("2025-06-16", "2025-06-20", None).allowed);
    }

    #[test]
    fn test_clear_and_update_restrictions() {
        let mut manager = SelectionManager::default();
        assert!(manager.can_select_date(date("2025-06-15")).allowed);
        manager.update_restrictions(RestrictionConfig::default().with(Restriction::weekdays([Weekday::Sunday])));
        assert!(!manager.can_select_date(date("2025-06-15")).allowed);
        assert_eq!(manager.restrictions().config().len(), 1);
        assert!(manager.clear().is_empty());
    }

    #[test]
    fn test_date_range_helpers() {
        let manager = SelectionManager::default();
        let started = manager.start_selection(date("2025-06-10")).range;
        let range = manager.update_selection(&started, date("2025-06-14")).range;
        assert!(range.is_complete());
        assert_eq!(range.day_count(), 5);
        assert!(range.contains(&date("2025-06-12")));
        assert!(!range.contains(&date("2025-06-15")));
        assert_eq!(DateRange::empty().day_count(), 0);
        assert!(!DateRange::empty().is_complete());
    }

    #[test]
    fn test_date_range_from_ui_json_resumes_drag() {
        let json = r#"{"start":"2025-06-15","end":"2025-06-15","anchorDate":"2025-06-15","isBackwardSelection":false}"#;
        let current: DateRange = serde_json::from_str(json).unwrap();
        assert_eq!(current, DateRange::anchored(date("2025-06-15")));

        let manager = range_manager(RestrictionConfig::default());
        let result = manager.update_selection(&current, date("2025-06-10"));
        assert!(result.success);
        assert_eq!(result.range.start(), Some(date("2025-06-10")));
        assert_eq!(result.range.end(), Some(date("2025-06-15")));
        assert!(result.range.is_backward_selection());

        let empty: DateRange =
            serde_json::from_str(r#"{"start":null,"end":null,"anchorDate":null,"isBackwardSelection":false}"#).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_date_range_serializes_camel_case() {
        let json = serde_json::to_string(&DateRange::anchored(date("2025-06-15"))).unwrap();
        assert_eq!(
            json,
            r#"{"start":"2025-06-15","end":"2025-06-15","anchorDate":"2025-06-15","isBackwardSelection":false}"#
        );
    }
}
