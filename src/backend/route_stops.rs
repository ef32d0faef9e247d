//! # Route-Stop Store
//!
//! In-memory backend for [`RouteStopService`]. Besides the stops it holds the route
//! directory, used to reject writes for unknown routes, and a revision counter per
//! route that is bumped on every write and checked by `bulk_update`. A `bulk_update` with
//! no stops clears the route.

use crate::backend::{Response, StoreError};
use crate::framework::WorkflowError;
use crate::model::{RouteId, RouteInfo, RouteStop, RouteStopSequence, StopEntry, StopId};
use crate::sequence::RouteStopService;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

#[derive(Debug)]
pub enum RouteStopRequest {
    GetByRoute {
        route_id: RouteId,
        respond_to: Response<RouteStopSequence>,
    },
    List {
        respond_to: Response<Vec<RouteStop>>,
    },
    BulkCreate {
        route_id: RouteId,
        names: Vec<String>,
        respond_to: Response<()>,
    },
    BulkUpdate {
        route_id: RouteId,
        stops: Vec<StopEntry>,
        expected_version: Option<u64>,
        respond_to: Response<()>,
    },
    Delete {
        stop_id: StopId,
        respond_to: Response<()>,
    },
}

pub struct RouteStopActor {
    receiver: mpsc::Receiver<RouteStopRequest>,
    routes: BTreeMap<RouteId, String>,
    stops: Vec<RouteStop>,
    versions: HashMap<RouteId, u64>,
    next_stop_id: u32,
}

impl RouteStopActor {
    pub fn new(buffer_size: usize, routes: Vec<RouteInfo>) -> (Self, RouteStopClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            routes: routes
                .into_iter()
                .map(|route| (route.route_id, route.route_name))
                .collect(),
            stops: Vec::new(),
            versions: HashMap::new(),
            next_stop_id: 1,
        };
        (actor, RouteStopClient { sender })
    }

    pub async fn run(mut self) {
        info!(routes = self.routes.len(), "Route-stop store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RouteStopRequest::GetByRoute {
                    route_id,
                    respond_to,
                } => {
                    let result = self.sequence(route_id);
                    debug!(%route_id, found = result.is_ok(), "Get stops");
                    let _ = respond_to.send(result);
                }
                RouteStopRequest::List { respond_to } => {
                    let mut all = self.stops.clone();
                    all.sort_by_key(|stop| (stop.route_id, stop.stop_order));
                    debug!(size = all.len(), "List stops");
                    let _ = respond_to.send(Ok(all));
                }
                RouteStopRequest::BulkCreate {
                    route_id,
                    names,
                    respond_to,
                } => {
                    debug!(%route_id, ?names, "Bulk create");
                    let result = self.bulk_create(route_id, names);
                    self.report(route_id, "Bulk create", &result);
                    let _ = respond_to.send(result);
                }
                RouteStopRequest::BulkUpdate {
                    route_id,
                    stops,
                    expected_version,
                    respond_to,
                } => {
                    debug!(%route_id, ?stops, ?expected_version, "Bulk update");
                    let result = self.bulk_update(route_id, stops, expected_version);
                    self.report(route_id, "Bulk update", &result);
                    let _ = respond_to.send(result);
                }
                RouteStopRequest::Delete {
                    stop_id,
                    respond_to,
                } => {
                    debug!(%stop_id, "Delete stop");
                    let result = self.delete(stop_id);
                    match &result {
                        Ok(()) => info!(%stop_id, size = self.stops.len(), "Stop deleted"),
                        Err(e) => warn!(%stop_id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(size = self.stops.len(), "Route-stop store shutdown");
    }

    fn report(&self, route_id: RouteId, op: &str, result: &Result<(), WorkflowError>) {
        match result {
            Ok(()) => info!(
                %route_id,
                op,
                version = self.version(route_id),
                size = self.stops.len(),
                "Route stops replaced"
            ),
            Err(e) => warn!(%route_id, op, error = %e, "Route-stop write rejected"),
        }
    }

    fn version(&self, route_id: RouteId) -> u64 {
        self.versions.get(&route_id).copied().unwrap_or(0)
    }

    fn route_name(&self, route_id: RouteId) -> Result<String, WorkflowError> {
        self.routes.get(&route_id).cloned().ok_or_else(|| {
            WorkflowError::ConflictOrConstraint(format!("route {route_id} does not exist"))
        })
    }

    fn sequence(&self, route_id: RouteId) -> Result<RouteStopSequence, WorkflowError> {
        let entries: Vec<StopEntry> = self
            .stops
            .iter()
            .filter(|stop| stop.route_id == route_id)
            .map(|stop| StopEntry::new(stop.stop_order, stop.stop_name.clone()))
            .collect();
        let route_name = self.routes.get(&route_id).cloned().unwrap_or_default();
        if entries.is_empty() {
            return Err(WorkflowError::not_found(format!("stops for route {route_id}")));
        }
        Ok(RouteStopSequence::sorted(
            route_id,
            route_name,
            entries,
            Some(self.version(route_id)),
        ))
    }

    fn bulk_create(&mut self, route_id: RouteId, names: Vec<String>) -> Result<(), WorkflowError> {
        let route_name = self.route_name(route_id)?;
        if names.is_empty() {
            return Err(WorkflowError::ConflictOrConstraint(
                "a new route needs at least one stop".into(),
            ));
        }
        if self.stops.iter().any(|stop| stop.route_id == route_id) {
            return Err(WorkflowError::ConflictOrConstraint(format!(
                "route {route_id} already has stops"
            )));
        }
        let entries = names
            .into_iter()
            .zip(1u32..)
            .map(|(name, order)| StopEntry::new(order, name))
            .collect();
        self.replace(route_id, route_name, entries)
    }

    fn bulk_update(
        &mut self,
        route_id: RouteId,
        entries: Vec<StopEntry>,
        expected_version: Option<u64>,
    ) -> Result<(), WorkflowError> {
        let route_name = self.route_name(route_id)?;
        let current = self.version(route_id);
        if let Some(expected) = expected_version {
            if expected != current {
                return Err(WorkflowError::ConflictOrConstraint(format!(
                    "route {route_id} changed since it was loaded (version {expected}, now {current})"
                )));
            }
        }
        self.replace(route_id, route_name, entries)
    }

    fn replace(
        &mut self,
        route_id: RouteId,
        route_name: String,
        entries: Vec<StopEntry>,
    ) -> Result<(), WorkflowError> {
        if entries.iter().any(|entry| entry.stop_name.trim().is_empty()) {
            return Err(WorkflowError::ConflictOrConstraint(
                "stop names must not be blank".into(),
            ));
        }
        let sequence = RouteStopSequence::sorted(route_id, route_name, entries, None);
        if !sequence.is_contiguous() {
            return Err(WorkflowError::ConflictOrConstraint(
                "stop orders must run 1..N without gaps or repeats".into(),
            ));
        }

        self.stops.retain(|stop| stop.route_id != route_id);
        for entry in sequence.stops {
            let stop_id = StopId(self.next_stop_id);
            self.next_stop_id += 1;
            self.stops.push(RouteStop {
                stop_id,
                route_id,
                route_name: sequence.route_name.clone(),
                stop_order: entry.stop_order,
                stop_name: entry.stop_name,
            });
        }
        *self.versions.entry(route_id).or_insert(0) += 1;
        Ok(())
    }

    /// Removes one stop and closes the gap it leaves in its route.
    fn delete(&mut self, stop_id: StopId) -> Result<(), WorkflowError> {
        let position = self
            .stops
            .iter()
            .position(|stop| stop.stop_id == stop_id)
            .ok_or_else(|| WorkflowError::not_found(format!("stop {stop_id}")))?;
        let removed = self.stops.remove(position);
        for stop in self
            .stops
            .iter_mut()
            .filter(|stop| stop.route_id == removed.route_id && stop.stop_order > removed.stop_order)
        {
            stop.stop_order -= 1;
        }
        *self.versions.entry(removed.route_id).or_insert(0) += 1;
        Ok(())
    }
}

#[derive(Clone)]
pub struct RouteStopClient {
    sender: mpsc::Sender<RouteStopRequest>,
}

impl RouteStopClient {
    async fn call<V>(
        &self,
        build: impl FnOnce(Response<V>) -> RouteStopRequest + Send,
    ) -> Result<V, WorkflowError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| StoreError::Closed)?;
        response.await.map_err(|_| StoreError::Dropped)?
    }
}

#[async_trait]
impl RouteStopService for RouteStopClient {
    #[instrument(skip(self))]
    async fn get_stops_by_route(
        &self,
        route_id: RouteId,
    ) -> Result<RouteStopSequence, WorkflowError> {
        self.call(|respond_to| RouteStopRequest::GetByRoute {
            route_id,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<RouteStop>, WorkflowError> {
        self.call(|respond_to| RouteStopRequest::List { respond_to })
            .await
    }

    #[instrument(skip(self, names), fields(count = names.len()))]
    async fn bulk_create(&self, route_id: RouteId, names: Vec<String>) -> Result<(), WorkflowError> {
        self.call(|respond_to| RouteStopRequest::BulkCreate {
            route_id,
            names,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self, stops), fields(count = stops.len()))]
    async fn bulk_update(
        &self,
        route_id: RouteId,
        stops: Vec<StopEntry>,
        expected_version: Option<u64>,
    ) -> Result<(), WorkflowError> {
        self.call(|respond_to| RouteStopRequest::BulkUpdate {
            route_id,
            stops,
            expected_version,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, stop_id: StopId) -> Result<(), WorkflowError> {
        self.call(|respond_to| RouteStopRequest::Delete {
            stop_id,
            respond_to,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> RouteStopClient {
        let (actor, client) = RouteStopActor::new(
            8,
            vec![RouteInfo::new(1, "Harbour Line"), RouteInfo::new(2, "Airport Express")],
        );
        tokio::spawn(actor.run());
        client
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn route_without_stops_is_not_found() {
        let client = spawn();
        let err = client.get_stops_by_route(RouteId(1)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }

    #[tokio::test]
    async fn bulk_create_numbers_in_given_order() {
        let client = spawn();
        client
            .bulk_create(RouteId(1), names(&["Depot", "Market", "Pier"]))
            .await
            .unwrap();

        let seq = client.get_stops_by_route(RouteId(1)).await.unwrap();
        assert_eq!(seq.route_name, "Harbour Line");
        assert_eq!(seq.names(), vec!["Depot", "Market", "Pier"]);
        assert!(seq.is_contiguous());
        assert_eq!(seq.version, Some(1));
    }

    #[tokio::test]
    async fn unknown_route_is_a_constraint_violation() {
        let client = spawn();
        let err = client
            .bulk_create(RouteId(7), names(&["Nowhere"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ConflictOrConstraint(_)));
    }

    #[tokio::test]
    async fn second_bulk_create_is_rejected() {
        let client = spawn();
        client.bulk_create(RouteId(2), names(&["Central"])).await.unwrap();
        let err = client
            .bulk_create(RouteId(2), names(&["Terminal"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ConflictOrConstraint(_)));
    }

    #[tokio::test]
    async fn stale_version_is_rejected() {
        let client = spawn();
        client
            .bulk_create(RouteId(1), names(&["Depot", "Pier"]))
            .await
            .unwrap();
        let loaded = client.get_stops_by_route(RouteId(1)).await.unwrap();

        let reordered = vec![StopEntry::new(1, "Pier"), StopEntry::new(2, "Depot")];
        client
            .bulk_update(RouteId(1), reordered.clone(), loaded.version)
            .await
            .unwrap();

        let err = client
            .bulk_update(RouteId(1), reordered, loaded.version)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ConflictOrConstraint(_)));

        let unversioned = vec![StopEntry::new(1, "Depot")];
        client.bulk_update(RouteId(1), unversioned, None).await.unwrap();
        let seq = client.get_stops_by_route(RouteId(1)).await.unwrap();
        assert_eq!(seq.names(), vec!["Depot"]);
    }

    #[tokio::test]
    async fn gapped_orders_are_rejected() {
        let client = spawn();
        let err = client
            .bulk_update(
                RouteId(1),
                vec![StopEntry::new(1, "Depot"), StopEntry::new(3, "Pier")],
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ConflictOrConstraint(_)));
        assert!(!err.is_local());
    }

    #[tokio::test]
    async fn empty_bulk_update_clears_the_route() {
        let client = spawn();
        client
            .bulk_create(RouteId(1), names(&["Depot", "Market"]))
            .await
            .unwrap();
        let loaded = client.get_stops_by_route(RouteId(1)).await.unwrap();

        client
            .bulk_update(RouteId(1), Vec::new(), loaded.version)
            .await
            .unwrap();

        let err = client.get_stops_by_route(RouteId(1)).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
        assert!(client.find_all().await.unwrap().is_empty());

        // The old version no longer matches.
        let err = client
            .bulk_update(RouteId(1), Vec::new(), loaded.version)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ConflictOrConstraint(_)));

        // Cleared routes can be built again from scratch.
        client.bulk_create(RouteId(1), names(&["Pier"])).await.unwrap();
    }

    #[tokio::test]
    async fn empty_bulk_create_is_rejected() {
        let client = spawn();
        let err = client.bulk_create(RouteId(2), Vec::new()).await.unwrap_err();
        assert!(matches!(err, WorkflowError::ConflictOrConstraint(_)));
        assert!(client.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_closes_the_gap() {
        let client = spawn();
        client
            .bulk_create(RouteId(1), names(&["Depot", "Market", "Pier"]))
            .await
            .unwrap();
        let market = client
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .find(|stop| stop.stop_name == "Market")
            .unwrap();

        client.delete(market.stop_id).await.unwrap();
        let seq = client.get_stops_by_route(RouteId(1)).await.unwrap();
        assert_eq!(seq.names(), vec!["Depot", "Pier"]);
        assert!(seq.is_contiguous());

        let err = client.delete(market.stop_id).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
    }
}
