//! # Logging
//!
//! Every layer logs through `tracing`:
//!
//! - `debug!` with the full payload once when an operation starts, and for ignored
//!   submits and discarded stale responses
//! - `info!` when a transition commits (mode selected, record created, stops saved)
//! - `warn!` when an operation fails; the error is always recorded on the screen too
//!
//! Fields carry the entity kind (`kind = "bus"`) and ids, so one screen's activity can
//! be filtered out of a busy log.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! RUST_LOG=transit_console::sequence=debug cargo run
//! ```

/// Installs a compact fmt subscriber filtered by `RUST_LOG`. Call once, from the binary.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // kind and ids identify the screen
        .compact()
        .init();
}
