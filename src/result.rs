use serde::{Deserialize, Serialize};

use crate::{DateRange, restriction::RuleOutcome};

/// Why a date, span or selection update was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// `update_selection` was called before `start_selection`.
    #[error("No selection in progress")]
    NoSelectionInProgress,

    /// A range endpoint is not a calendar date.
    #[error("Invalid date range")]
    InvalidDateRange,

    /// An enabled restriction blocked the date or span.
    #[error("{0}")]
    RestrictionViolation(String),
}

/// Whether a date or span may be selected, and why not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionResult {
    pub allowed: bool,
    pub message: Option<String>,
    #[serde(skip)]
    error:       Option<SelectionError>,
}

impl SelectionResult {
    pub const fn allowed() -> Self {
        Self {
            allowed: true,
            message: None,
            error:   None,
        }
    }

    /// A result blocked by a restriction with the given message.
    pub fn blocked(message: impl Into<String>) -> Self {
        SelectionError::RestrictionViolation(message.into()).into()
    }

    pub const fn is_allowed(&self) -> bool {
        self.allowed
    }

    pub const fn error(&self) -> Option<&SelectionError> {
        self.error.as_ref()
    }

    /// # Errors
    /// Returns the `SelectionError` that blocked the selection. A blocked
    /// result read back from serde counts as a `RestrictionViolation`.
    pub fn into_result(self) -> Result<(), SelectionError> {
        if self.allowed {
            return Ok(());
        }
        Err(self
            .error
            .unwrap_or_else(|| SelectionError::RestrictionViolation(self.message.unwrap_or_default())))
    }
}

impl Default for SelectionResult {
    fn default() -> Self {
        Self::allowed()
    }
}

impl From<SelectionError> for SelectionResult {
    fn from(error: SelectionError) -> Self {
        Self {
            allowed: false,
            message: Some(error.to_string()),
            error:   Some(error),
        }
    }
}

impl From<RuleOutcome> for SelectionResult {
    fn from(outcome: RuleOutcome) -> Self {
        match outcome {
            Ok(()) => Self::allowed(),
            Err(message) => Self::blocked(message),
        }
    }
}

/// The selection after an interaction, plus whether the interaction took effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateResult {
    pub success: bool,
    pub range:   DateRange,
    pub message: Option<String>,
    #[serde(skip)]
    error:       Option<SelectionError>,
}

impl UpdateResult {
    pub const fn success(range: DateRange, message: Option<String>) -> Self {
        Self {
            success: true,
            range,
            message,
            error: None,
        }
    }

    pub fn failure(range: DateRange, error: SelectionError) -> Self {
        Self {
            success: false,
            range,
            message: Some(error.to_string()),
            error: Some(error),
        }
    }

    pub const fn error(&self) -> Option<&SelectionError> {
        self.error.as_ref()
    }

    /// # Errors
    /// Returns the `SelectionError` that made the update fail.
    pub fn into_result(self) -> Result<DateRange, SelectionError> {
        match self.error {
            None if self.success => Ok(self.range),
            Some(error) => Err(error),
            None => Err(SelectionError::RestrictionViolation(self.message.unwrap_or_default())),
        }
    }
}
