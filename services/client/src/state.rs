//! Form state machine
//!
//! A form is in exactly one of these states; which button it offers follows
//! from the state alone.

use serde::Serialize;
use std::fmt;

/// What the primary button of a form does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormAction {
    /// Submit an allowance approval first
    Approve,
    /// Submit the form's own transaction
    Act,
}

/// Lifecycle of a form's derived data
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FormState<T> {
    /// Inputs incomplete, nothing fetched
    Idle,
    /// Refresh in flight
    Loading,
    /// Allowance covers the request
    Ready(T),
    /// Allowance below the requested amount
    NeedsApproval(T),
    /// No pool exists for the token pair
    PairMissing,
    /// Fetch or computation failed
    Error(String),
}

impl<T> Default for FormState<T> {
    fn default() -> Self {
        FormState::Idle
    }
}

impl<T> FormState<T> {
    /// The single action available, if any
    pub fn action(&self) -> Option<FormAction> {
        match self {
            FormState::Ready(_) => Some(FormAction::Act),
            FormState::NeedsApproval(_) => Some(FormAction::Approve),
            _ => None,
        }
    }

    /// Derived data of the `Ready` and `NeedsApproval` states
    pub fn data(&self) -> Option<&T> {
        match self {
            FormState::Ready(data) | FormState::NeedsApproval(data) => Some(data),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FormState::Loading)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormState::Idle => "idle",
            FormState::Loading => "loading",
            FormState::Ready(_) => "ready",
            FormState::NeedsApproval(_) => "needs_approval",
            FormState::PairMissing => "pair_missing",
            FormState::Error(_) => "error",
        }
    }
}

impl<T> fmt::Display for FormState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormState::Error(message) => write!(f, "error ({})", message),
            other => f.write_str(other.name()),
        }
    }
}
