//! Runtime settings for [`ConsoleSystem`](super::ConsoleSystem).

use crate::model::RouteInfo;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const STORE_BUFFER_VAR: &str = "TRANSIT_CONSOLE_STORE_BUFFER";
pub const SESSION_BUFFER_VAR: &str = "TRANSIT_CONSOLE_SESSION_BUFFER";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Queue capacity of each backend store actor.
    pub store_buffer: usize,
    /// Queue capacity of each screen session.
    pub session_buffer: usize,
    /// Routes the route-stop backend accepts.
    pub routes: Vec<RouteInfo>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            store_buffer: 32,
            session_buffer: 32,
            routes: Vec::new(),
        }
    }
}

impl ConsoleConfig {
    pub fn with_routes(mut self, routes: Vec<RouteInfo>) -> Self {
        self.routes = routes;
        self
    }

    /// Defaults, with buffer sizes taken from the environment when set.
    pub fn from_env() -> Self {
        Self::default().with_overrides(|name| std::env::var(name).ok())
    }

    /// Applies buffer overrides from `lookup`. Values that are not positive integers are
    /// logged and ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        for (name, slot) in [
            (STORE_BUFFER_VAR, &mut self.store_buffer),
            (SESSION_BUFFER_VAR, &mut self.session_buffer),
        ] {
            let Some(raw) = lookup(name) else { continue };
            match raw.trim().parse::<usize>() {
                Ok(size) if size > 0 => *slot = size,
                _ => warn!(name, %raw, "Ignoring invalid buffer size"),
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.store_buffer, 32);
        assert_eq!(config.session_buffer, 32);
        assert!(config.routes.is_empty());
    }

    #[test]
    fn overrides_apply_only_valid_sizes() {
        let config = ConsoleConfig::default().with_overrides(|name| match name {
            STORE_BUFFER_VAR => Some("64".into()),
            SESSION_BUFFER_VAR => Some("0".into()),
            _ => None,
        });
        assert_eq!(config.store_buffer, 64);
        assert_eq!(config.session_buffer, 32);
    }
}
