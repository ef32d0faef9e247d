//! # In-Memory Backend
//!
//! Actor-based stand-ins for the console's REST backend. Each store runs in its own Tokio
//! task and owns its data; clients talk to it over an mpsc channel and get replies on a
//! oneshot channel.
//!
//! - [`StoreActor`] / [`StoreClient`] serve any [`Resource`](crate::framework::Resource)
//!   through [`ResourceService`](crate::framework::ResourceService).
//! - [`RouteStopActor`] / [`RouteStopClient`] serve
//!   [`RouteStopService`](crate::sequence::RouteStopService).
//!
//! A dropped channel surfaces as [`WorkflowError::Network`](crate::framework::WorkflowError).

pub mod client;
pub mod error;
pub mod message;
pub mod route_stops;
pub mod store;

pub use client::StoreClient;
pub use error::StoreError;
pub use message::{Response, StoreRequest};
pub use route_stops::{RouteStopActor, RouteStopClient, RouteStopRequest};
pub use store::StoreActor;
