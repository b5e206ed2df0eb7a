//! Selection and restriction engine for calendar date-range pickers.
//!
//! [`RestrictionManager`] decides whether a date or span of dates may be
//! selected under a [`RestrictionConfig`]. [`SelectionManager`] turns
//! pointer and keyboard interactions into [`DateRange`] values, consulting
//! the restrictions to confine drags that start inside a restricted boundary.
//!
//! ```
//! use range_select::{CalendarDate, Restriction, RestrictionConfig, SelectionManager, SelectionMode, Weekday};
//!
//! let config = RestrictionConfig::default()
//!     .with(Restriction::weekdays([Weekday::Saturday, Weekday::Sunday]));
//! let manager = SelectionManager::new(Some(config), SelectionMode::Range);
//!
//! let sunday: CalendarDate = "2025-06-15".parse()?;
//! let result = manager.can_select_date(sunday);
//! assert!(!result.allowed);
//! assert_eq!(result.message.as_deref(), Some("Weekends not allowed"));
//!
//! let started = manager.start_selection("2025-06-18".parse()?);
//! let dragged = manager.update_selection(&started.range, "2025-06-16".parse()?);
//! assert_eq!(dragged.range.start(), Some("2025-06-16".parse()?));
//! assert!(dragged.range.is_backward_selection());
//! # Ok::<(), range_select::ParseError>(())
//! ```

mod consts;
mod date;
mod manager;
mod prelude;
mod restriction;
mod result;
mod selection;
mod span;

#[cfg(test)]
mod test_utils;

pub use consts::*;
pub use date::{CalendarDate, ParseError, Weekday, days_in_month, is_leap_year};
pub use manager::RestrictionManager;
pub use restriction::{
    AllowedRangesRule, BoundaryDirection, BoundaryEntry, BoundaryRegion, BoundaryRule, DateRangeRule, RangeEntry,
    Restriction, RestrictionConfig, RestrictedBoundaryRule, RuleOutcome, WeekdayRule,
};
pub use result::{SelectionError, SelectionResult, UpdateResult};
pub use selection::{DateRange, SelectionManager, SelectionMode};
pub use span::{DateSpan, SpanError};
