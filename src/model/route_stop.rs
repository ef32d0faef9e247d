//! Route-stop records and the ordered sequence the editor persists.

use crate::framework::resource_id;
use serde::{Deserialize, Serialize};

resource_id!(Route);
resource_id!(Stop);

/// A route known to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteInfo {
    pub route_id: RouteId,
    pub route_name: String,
}

impl RouteInfo {
    pub fn new(route_id: u32, route_name: impl Into<String>) -> Self {
        Self {
            route_id: RouteId(route_id),
            route_name: route_name.into(),
        }
    }
}

/// One stored stop, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub stop_id: StopId,
    pub route_id: RouteId,
    pub route_name: String,
    pub stop_order: u32,
    pub stop_name: String,
}

/// A stop's position and name within its route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopEntry {
    pub stop_order: u32,
    pub stop_name: String,
}

impl StopEntry {
    pub fn new(stop_order: u32, stop_name: impl Into<String>) -> Self {
        Self {
            stop_order,
            stop_name: stop_name.into(),
        }
    }
}

/// The ordered stops of one route.
///
/// `version` is the backend's revision of the route's stop list at load time. Services
/// that do not track revisions report `None`, and saves are then last-writer-wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStopSequence {
    pub route_id: RouteId,
    pub route_name: String,
    pub stops: Vec<StopEntry>,
    pub version: Option<u64>,
}

impl RouteStopSequence {
    /// Builds a sequence from unordered entries, sorted by stop order ascending.
    pub fn sorted(
        route_id: RouteId,
        route_name: impl Into<String>,
        mut stops: Vec<StopEntry>,
        version: Option<u64>,
    ) -> Self {
        stops.sort_by_key(|stop| stop.stop_order);
        Self {
            route_id,
            route_name: route_name.into(),
            stops,
            version,
        }
    }

    /// True when stop orders are exactly `1..=N` in list order.
    pub fn is_contiguous(&self) -> bool {
        self.stops
            .iter()
            .zip(1u32..)
            .all(|(stop, expected)| stop.stop_order == expected)
    }

    pub fn names(&self) -> Vec<&str> {
        self.stops.iter().map(|stop| stop.stop_name.as_str()).collect()
    }
}
