//! # Route-Stop Sequences
//!
//! Route stops are not edited one record at a time. The [`SequenceEditor`] keeps a local
//! ordered working copy of a route's stops and writes the whole list back through
//! [`RouteStopService`] in one bulk call, renumbered `1..=N` in on-screen order.
//! [`RouteStopScreen`] wraps the editor in the usual create/find/update/delete menu.

pub mod editor;
pub mod mock;
pub mod screen;
pub mod service;

pub use editor::{
    Flow, SaveCompletion, SaveOperation, SaveOutcome, SaveRequest, SaveTicket, SequenceEditor,
    StopKey, WorkingStop,
};
pub use screen::{group_by_route, RouteStopGroup, RouteStopScreen, StopSearch};
pub use service::RouteStopService;
