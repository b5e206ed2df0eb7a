use std::sync::Arc;

use tracing::trace;

use crate::{
    CalendarDate, DateSpan, Restriction, RestrictionConfig, SelectionResult, restriction::BoundaryRegion,
};

/// Evaluates a [`RestrictionConfig`] for single dates and spans.
///
/// The config is held as a shared snapshot. [`update_restrictions`] swaps
/// the whole snapshot; it is never edited in place.
///
/// [`update_restrictions`]: Self::update_restrictions
#[derive(Debug, Clone, Default)]
pub struct RestrictionManager {
    config: Arc<RestrictionConfig>,
}

impl RestrictionManager {
    pub fn new(config: impl Into<Arc<RestrictionConfig>>) -> Self {
        Self { config: config.into() }
    }

    pub const fn config(&self) -> &Arc<RestrictionConfig> {
        &self.config
    }

    /// Replaces the held config wholesale.
    pub fn update_restrictions(&mut self, config: impl Into<Arc<RestrictionConfig>>) {
        self.config = config.into();
    }

    /// Checks `date_a` alone, or the inclusive span between `date_a` and
    /// `date_b` in whichever order they are given.
    pub fn check_selection(&self, date_a: CalendarDate, date_b: Option<CalendarDate>) -> SelectionResult {
        let span = date_b.map_or_else(|| DateSpan::single(date_a), |b| DateSpan::between(date_a, b));
        self.check_span(&span)
    }

    /// Runs the enabled rules in config order; the first one that blocks
    /// decides the message.
    pub fn check_span(&self, span: &DateSpan) -> SelectionResult {
        for restriction in self.config.enabled() {
            if let Err(message) = restriction.check(span) {
                trace!(%span, %message, "selection blocked");
                return SelectionResult::blocked(message);
            }
        }
        SelectionResult::allowed()
    }

    /// The region an anchored selection is confined to, from the first
    /// enabled restricted boundary that captures `anchor`.
    pub fn restricted_boundary_for(&self, anchor: CalendarDate) -> Option<BoundaryRegion<'_>> {
        self.config.enabled().find_map(|restriction| match restriction {
            Restriction::RestrictedBoundary(rule) => rule.region_for(anchor),
            Restriction::Weekday(_)
            | Restriction::DateRange(_)
            | Restriction::Boundary(_)
            | Restriction::AllowedRanges(_) => None,
        })
    }
}
