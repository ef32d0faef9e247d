//! # Workflow Framework
//!
//! The generic half of the console. Every admin screen is a [`WorkflowEngine`] over some
//! [`Resource`], talking to a [`ResourceService`]:
//!
//! 1. **Schema Layer** ([`Resource`], [`FieldSpec`]) - what the entity looks like
//! 2. **State Layer** ([`WorkflowEngine`], [`Mode`]) - which operation is active and what the form holds
//! 3. **Service Layer** ([`ResourceService`]) - how records reach the backend
//!
//! Screens differ only in layer 1.

pub mod engine;
pub mod entity;
pub mod error;
pub mod form;
pub mod mock;
pub mod mode;
pub mod service;

pub use engine::{
    Completion, Operation, Outcome, PendingRequest, ScreenSnapshot, SubmitOutcome, Ticket,
    WorkflowEngine,
};
pub use entity::Resource;
pub(crate) use entity::resource_id;
pub use error::WorkflowError;
pub use form::{FieldKind, FieldSpec, FormFields};
pub use mode::{Mode, ModeKind, SearchMode};
pub use service::ResourceService;
