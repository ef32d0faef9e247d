//! # Transit Console
//!
//! > **The state logic behind a transit operator's admin console.**
//!
//! Every admin screen (users, buses, bus types, alerts, bus assignments, crowd reports,
//! feedback, favourite routes) follows the same Create / Find / Update / Delete pattern.
//! This crate writes that pattern once, as a generic [`WorkflowEngine`](framework::WorkflowEngine),
//! and adds the one screen that does not fit it: the ordered route-stop editor.
//!
//! ## 🏗️ Design
//!
//! ### One engine, many schemas
//! `WorkflowEngine<T: Resource>` knows nothing about buses or alerts. A screen is a
//! [`Resource`](framework::Resource) implementation: an id type, a field schema and the
//! conversion to and from form values. See [`model`] for the eight schemas.
//!
//! ### Modes as a tagged state
//! The screen's mode is a single [`Mode`](framework::Mode) enum. `UpdateEditing` carries the
//! id being edited and `Find` carries its search strategy, so states such as "Delete with an
//! edit loaded" cannot be built.
//!
//! ### One request at a time
//! A submit reserves the screen with a ticket. Further submits are ignored until the
//! ticket completes, and a response whose ticket was superseded by a mode change or cancel
//! is discarded. The [`session`] module runs engines as actors so this holds under real
//! asynchrony.
//!
//! ### Whole-route saves
//! The [`sequence`] editor edits a local copy of a route's stops and saves the full list
//! in one bulk call, renumbered `1..=N` in on-screen order. An optional version token
//! turns concurrent edits into a `ConflictOrConstraint` error instead of a silent overwrite.
//!
//! ## 🗺️ Module Tour
//!
//! - [`framework`] - the engine, the `Resource` and `ResourceService` traits, errors, mocks
//! - [`model`] - resource schemas and route-stop data types
//! - [`sequence`] - the route-stop editor, its screen and service trait
//! - [`backend`] - in-memory actor stores implementing both service traits
//! - [`session`] - screens hosted as actors
//! - [`runtime`] - [`ConsoleSystem`](runtime::ConsoleSystem), configuration and logging
//!
//! ### Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod backend;
pub mod framework;
pub mod model;
pub mod runtime;
pub mod sequence;
pub mod session;
