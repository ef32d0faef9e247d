//! # Workflow Errors
//!
//! Every operation of the engine and the sequence editor reports failures through
//! [`WorkflowError`]. None of them are fatal: the screen keeps its mode and its form,
//! and the operator may edit and resubmit.

use thiserror::Error;

/// Errors surfaced to the operator by a screen.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Required local input is missing or malformed. Never reaches the network.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server reports that no such resource exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend failed while handling the request.
    #[error("Server error: {0}")]
    Server(String),

    /// Schema-level rejection, e.g. a duplicate, an invalid foreign key or a stale version.
    #[error("Conflict or constraint violation: {0}")]
    ConflictOrConstraint(String),
}

impl WorkflowError {
    pub fn validation(msg: impl Into<String>) -> Self {
        WorkflowError::Validation(msg.into())
    }

    pub fn not_found(what: impl std::fmt::Display) -> Self {
        WorkflowError::NotFound(what.to_string())
    }

    /// True for errors raised before any request was issued.
    pub fn is_local(&self) -> bool {
        matches!(self, WorkflowError::Validation(_))
    }
}
