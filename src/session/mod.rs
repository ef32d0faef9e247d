//! # Screen Sessions
//!
//! A session is one open admin screen: a [`WorkflowEngine`](crate::framework::WorkflowEngine)
//! living in its own task, driven by [`SessionEvent`]s. The session never blocks on the
//! network; service calls run beside it and report back as completions.

pub mod actor;
pub mod client;
pub mod message;

pub use actor::SessionActor;
pub use client::SessionClient;
pub use message::{Reply, SessionEvent, SubmitReceipt};
