//! # Session Events
//!
//! Operator input sent from a [`SessionClient`](super::SessionClient) to its
//! [`SessionActor`](super::SessionActor). Events are handled strictly one at a time, like
//! UI callbacks that run to completion.

use crate::framework::{ModeKind, Resource, ScreenSnapshot, SearchMode, Ticket, WorkflowError};
use tokio::sync::oneshot;

pub type Reply<V> = oneshot::Sender<V>;

/// What happened to a submit event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitReceipt {
    /// A request was issued in the background.
    Accepted(Ticket),
    /// A request was already in flight.
    Ignored,
    /// Local validation failed; nothing was sent.
    Rejected(WorkflowError),
}

#[derive(Debug)]
pub enum SessionEvent<T: Resource> {
    SelectMode {
        kind: ModeKind,
        respond_to: Reply<()>,
    },
    SetField {
        name: String,
        value: String,
        respond_to: Reply<Result<(), WorkflowError>>,
    },
    SetSearchMode {
        search_mode: SearchMode,
        respond_to: Reply<Result<(), WorkflowError>>,
    },
    SetQuery {
        query: String,
        respond_to: Reply<Result<(), WorkflowError>>,
    },
    Submit {
        respond_to: Reply<SubmitReceipt>,
    },
    Cancel {
        respond_to: Reply<()>,
    },
    Snapshot {
        respond_to: Reply<ScreenSnapshot<T>>,
    },
    /// Answered once no background request is outstanding, stale ones included.
    Settle {
        respond_to: Reply<ScreenSnapshot<T>>,
    },
}
