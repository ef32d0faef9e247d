//! Runtime orchestration: starting the backend stores, opening screen sessions, settings
//! and log setup.
//!
//! - [`ConsoleSystem`] - starts every store and hands out clients and screens
//! - [`ConsoleConfig`] - buffer sizes and the route directory
//! - [`setup_tracing`] - installs the log subscriber

pub mod config;
pub mod console_system;
pub mod tracing;

pub use config::*;
pub use console_system::*;
pub use self::tracing::*;
