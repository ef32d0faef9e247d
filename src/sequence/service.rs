//! # RouteStopService Trait
//!
//! Backend contract for route stops. Stop order only has meaning for a whole route, so
//! writes always carry a route's full list; the backend replaces its stored order for that
//! route atomically.

use crate::framework::WorkflowError;
use crate::model::{RouteId, RouteStop, RouteStopSequence, StopEntry, StopId};
use async_trait::async_trait;

#[async_trait]
pub trait RouteStopService: Send + Sync {
    /// Current stops of a route. `NotFound` when the route has no stops yet.
    async fn get_stops_by_route(&self, route_id: RouteId)
        -> Result<RouteStopSequence, WorkflowError>;

    /// Every stored stop of every route.
    async fn find_all(&self) -> Result<Vec<RouteStop>, WorkflowError>;

    /// Stores `names` as the stops of a route that has none, ordered as given.
    async fn bulk_create(&self, route_id: RouteId, names: Vec<String>)
        -> Result<(), WorkflowError>;

    /// Replaces the route's stop list with `stops`.
    ///
    /// When `expected_version` is set and the stored list has moved on since it was
    /// loaded, the write is rejected with `ConflictOrConstraint`.
    async fn bulk_update(
        &self,
        route_id: RouteId,
        stops: Vec<StopEntry>,
        expected_version: Option<u64>,
    ) -> Result<(), WorkflowError>;

    async fn delete(&self, stop_id: StopId) -> Result<(), WorkflowError>;
}
