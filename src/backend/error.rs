//! # Transport Errors
//!
//! Failures of the channel between a client and its store actor. They play the part an
//! unreachable server plays for the real console, so they surface as
//! [`WorkflowError::Network`].
//!
//! Input a store refuses has already crossed the service boundary, so it comes back as
//! [`WorkflowError::ConflictOrConstraint`] rather than a local validation error.

use crate::framework::WorkflowError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store actor closed")]
    Closed,
    #[error("store actor dropped the response channel")]
    Dropped,
}

impl From<StoreError> for WorkflowError {
    fn from(e: StoreError) -> Self {
        WorkflowError::Network(e.to_string())
    }
}

/// Reports a field check failed inside a store as a server-side rejection.
pub fn rejected(e: WorkflowError) -> WorkflowError {
    match e {
        WorkflowError::Validation(msg) => WorkflowError::ConflictOrConstraint(msg),
        other => other,
    }
}
