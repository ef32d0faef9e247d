//! # Route-Stop Screen
//!
//! The four-mode screen that hosts the [`SequenceEditor`]. `Create` builds the stop list of
//! a route that has none, `Update` rewrites an existing one, `Find` lists stored stops
//! grouped by route, and `Delete` removes a single stop by id.

use crate::framework::{ModeKind, WorkflowError};
use crate::model::{RouteId, RouteInfo, RouteStop, StopId};
use crate::sequence::{Flow, RouteStopService, SaveOutcome, SequenceEditor};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// How `Find` filters stored stops.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StopSearch {
    #[default]
    All,
    ByRouteId(RouteId),
    /// Case-insensitive substring match on the route name.
    ByRouteName(String),
}

/// Stops of one route, ordered by stop order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteStopGroup {
    pub route_id: RouteId,
    pub route_name: String,
    pub stops: Vec<RouteStop>,
}

impl RouteStopGroup {
    pub fn names(&self) -> Vec<&str> {
        self.stops.iter().map(|stop| stop.stop_name.as_str()).collect()
    }
}

/// Groups stops by route id, each group sorted by stop order.
pub fn group_by_route(stops: Vec<RouteStop>) -> Vec<RouteStopGroup> {
    let mut groups: BTreeMap<RouteId, RouteStopGroup> = BTreeMap::new();
    for stop in stops {
        groups
            .entry(stop.route_id)
            .or_insert_with(|| RouteStopGroup {
                route_id: stop.route_id,
                route_name: stop.route_name.clone(),
                stops: Vec::new(),
            })
            .stops
            .push(stop);
    }
    groups
        .into_values()
        .map(|mut group| {
            group.stops.sort_by_key(|stop| stop.stop_order);
            group
        })
        .collect()
}

#[derive(Debug)]
pub struct RouteStopScreen {
    mode: ModeKind,
    routes: Vec<RouteInfo>,
    editor: SequenceEditor,
    stop_id: String,
    results: Vec<RouteStopGroup>,
    last_error: Option<WorkflowError>,
}

impl RouteStopScreen {
    /// Creates an idle screen that offers `routes` for selection.
    pub fn new(routes: Vec<RouteInfo>) -> Self {
        Self {
            mode: ModeKind::Idle,
            routes,
            editor: SequenceEditor::new(),
            stop_id: String::new(),
            results: Vec::new(),
            last_error: None,
        }
    }

    pub fn mode(&self) -> ModeKind {
        self.mode
    }

    pub fn routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    pub fn editor(&self) -> &SequenceEditor {
        &self.editor
    }

    /// Working-list edits (append, move, rename, remove) go straight to the editor.
    pub fn editor_mut(&mut self) -> &mut SequenceEditor {
        &mut self.editor
    }

    pub fn results(&self) -> &[RouteStopGroup] {
        &self.results
    }

    pub fn stop_id(&self) -> &str {
        &self.stop_id
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error
            .as_ref()
            .or_else(|| self.editor.last_error())
    }

    /// Enters a mode, dropping any unsaved working list. Results stay visible.
    pub fn select_mode(&mut self, kind: ModeKind) {
        debug!(from = %self.mode, to = %kind, "Route-stop mode selected");
        self.mode = kind;
        self.editor.cancel();
        self.stop_id.clear();
        self.last_error = None;
    }

    pub fn cancel(&mut self) {
        self.select_mode(ModeKind::Idle);
        self.results.clear();
    }

    /// Binds the editor to a route from the directory.
    ///
    /// In `Create` the list starts empty; in `Update` the route's stored stops are loaded.
    pub async fn choose_route<S>(&mut self, service: &S, route_id: RouteId) -> Result<(), WorkflowError>
    where
        S: RouteStopService + ?Sized,
    {
        let flow = match self.mode {
            ModeKind::Create => Flow::Add,
            ModeKind::Update => Flow::Update,
            other => {
                return self.fail(WorkflowError::validation(format!(
                    "routes are chosen in create or update mode, not {other}"
                )))
            }
        };
        if !self.routes.iter().any(|route| route.route_id == route_id) {
            return self.fail(WorkflowError::validation(format!("unknown route {route_id}")));
        }
        self.last_error = None;
        self.editor.select_route(service, route_id, flow).await
    }

    /// Saves the working list. A successful save returns the screen to idle.
    pub async fn save<S>(&mut self, service: &S) -> Result<SaveOutcome, WorkflowError>
    where
        S: RouteStopService + ?Sized,
    {
        if !matches!(self.mode, ModeKind::Create | ModeKind::Update) {
            return self.fail(WorkflowError::validation("nothing to save"));
        }
        self.last_error = None;
        let outcome = self.editor.save(service).await?;
        if let SaveOutcome::Saved(_) = outcome {
            self.mode = ModeKind::Idle;
        }
        Ok(outcome)
    }

    /// Lists stored stops matching `search`, replacing previous results.
    pub async fn find<S>(&mut self, service: &S, search: StopSearch) -> Result<usize, WorkflowError>
    where
        S: RouteStopService + ?Sized,
    {
        if self.mode != ModeKind::Find {
            return self.fail(WorkflowError::validation("select find mode first"));
        }
        let needle = match &search {
            StopSearch::ByRouteName(name) if name.trim().is_empty() => {
                return self.fail(WorkflowError::validation("route name is required"));
            }
            StopSearch::ByRouteName(name) => Some(name.trim().to_lowercase()),
            _ => None,
        };
        debug!(?search, "Finding route stops");
        let stops = match service.find_all().await {
            Ok(stops) => stops,
            Err(e) => return self.fail(e),
        };
        let matching: Vec<RouteStop> = stops
            .into_iter()
            .filter(|stop| match &search {
                StopSearch::All => true,
                StopSearch::ByRouteId(route_id) => stop.route_id == *route_id,
                StopSearch::ByRouteName(_) => needle
                    .as_deref()
                    .is_some_and(|n| stop.route_name.to_lowercase().contains(n)),
            })
            .collect();
        let count = matching.len();
        self.results = group_by_route(matching);
        self.last_error = None;
        info!(count, routes = self.results.len(), "Route stops found");
        Ok(count)
    }

    pub fn set_stop_id(&mut self, raw: impl Into<String>) -> Result<(), WorkflowError> {
        if self.mode != ModeKind::Delete {
            return Err(WorkflowError::validation("stop id is only editable in delete mode"));
        }
        self.stop_id = raw.into();
        Ok(())
    }

    /// Deletes the stop named by the id field, then refreshes results with every stop.
    ///
    /// Stays in `Delete` mode and clears the id field on success.
    pub async fn delete_stop<S>(&mut self, service: &S) -> Result<(), WorkflowError>
    where
        S: RouteStopService + ?Sized,
    {
        if self.mode != ModeKind::Delete {
            return self.fail(WorkflowError::validation("select delete mode first"));
        }
        let raw = self.stop_id.trim();
        if raw.is_empty() {
            return self.fail(WorkflowError::validation("stop_id is required"));
        }
        let stop_id: StopId = match raw.parse() {
            Ok(id) => id,
            Err(_) => {
                let e = WorkflowError::validation(format!("stop_id: invalid id '{raw}'"));
                return self.fail(e);
            }
        };
        if let Err(e) = service.delete(stop_id).await {
            return self.fail(e);
        }
        info!(%stop_id, "Route stop deleted");
        self.stop_id.clear();
        self.last_error = None;
        match service.find_all().await {
            Ok(stops) => self.results = group_by_route(stops),
            Err(e) => {
                warn!(error = %e, "Refresh after delete failed");
                self.last_error = Some(e);
            }
        }
        Ok(())
    }

    fn fail<V>(&mut self, error: WorkflowError) -> Result<V, WorkflowError> {
        warn!(mode = %self.mode, error = %error, "Route-stop operation failed");
        self.last_error = Some(error.clone());
        Err(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RouteStopSequence, StopEntry};
    use crate::sequence::mock::{MockRouteStopService, RouteStopCall};

    fn stop(id: u32, route: u32, name: &str, order: u32, stop_name: &str) -> RouteStop {
        RouteStop {
            stop_id: StopId(id),
            route_id: RouteId(route),
            route_name: name.into(),
            stop_order: order,
            stop_name: stop_name.into(),
        }
    }

    fn stored() -> Vec<RouteStop> {
        vec![
            stop(10, 2, "Airport Express", 2, "Terminal"),
            stop(11, 1, "Harbour Line", 1, "Depot"),
            stop(12, 2, "Airport Express", 1, "Central"),
            stop(13, 1, "Harbour Line", 2, "Pier"),
        ]
    }

    fn screen() -> RouteStopScreen {
        RouteStopScreen::new(vec![
            RouteInfo::new(1, "Harbour Line"),
            RouteInfo::new(2, "Airport Express"),
        ])
    }

    #[test]
    fn grouping_sorts_routes_and_stops() {
        let groups = group_by_route(stored());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].route_id, RouteId(1));
        assert_eq!(groups[0].names(), vec!["Depot", "Pier"]);
        assert_eq!(groups[1].names(), vec!["Central", "Terminal"]);
    }

    #[tokio::test]
    async fn find_by_route_name_is_case_insensitive_substring() {
        let mock = MockRouteStopService::new();
        mock.expect_find_all().return_ok(stored());

        let mut screen = screen();
        screen.select_mode(ModeKind::Find);
        let count = screen
            .find(&mock, StopSearch::ByRouteName("airport".into()))
            .await
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(screen.results().len(), 1);
        assert_eq!(screen.results()[0].route_name, "Airport Express");
        mock.verify();
    }

    #[tokio::test]
    async fn blank_route_name_search_never_reaches_service() {
        let mock = MockRouteStopService::new();
        let mut screen = screen();
        screen.select_mode(ModeKind::Find);

        let err = screen
            .find(&mock, StopSearch::ByRouteName("  ".into()))
            .await
            .unwrap_err();
        assert!(err.is_local());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn find_replaces_previous_results() {
        let mock = MockRouteStopService::new();
        mock.expect_find_all().return_ok(stored());
        mock.expect_find_all().return_ok(stored());

        let mut screen = screen();
        screen.select_mode(ModeKind::Find);
        screen.find(&mock, StopSearch::All).await.unwrap();
        assert_eq!(screen.results().len(), 2);

        screen
            .find(&mock, StopSearch::ByRouteId(RouteId(1)))
            .await
            .unwrap();
        assert_eq!(screen.results().len(), 1);
        assert_eq!(screen.results()[0].names(), vec!["Depot", "Pier"]);
    }

    #[tokio::test]
    async fn unknown_route_is_rejected_before_loading() {
        let mock = MockRouteStopService::new();
        let mut screen = screen();
        screen.select_mode(ModeKind::Update);

        let err = screen.choose_route(&mock, RouteId(9)).await.unwrap_err();
        assert!(err.is_local());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn update_save_returns_to_idle() {
        let mock = MockRouteStopService::new();
        mock.expect_get_stops_by_route().return_ok(RouteStopSequence::sorted(
            RouteId(1),
            "Harbour Line",
            vec![StopEntry::new(1, "Depot"), StopEntry::new(2, "Pier")],
            None,
        ));
        mock.expect_bulk_update().return_ok(());

        let mut screen = screen();
        screen.select_mode(ModeKind::Update);
        screen.choose_route(&mock, RouteId(1)).await.unwrap();
        screen.editor_mut().move_down(0).unwrap();

        assert_eq!(screen.save(&mock).await.unwrap(), SaveOutcome::Saved(2));
        assert_eq!(screen.mode(), ModeKind::Idle);
        assert!(!screen.editor().is_bound());
        mock.verify();
    }

    #[tokio::test]
    async fn mode_switch_drops_working_list() {
        let mock = MockRouteStopService::new();
        let mut screen = screen();
        screen.select_mode(ModeKind::Create);
        screen.choose_route(&mock, RouteId(2)).await.unwrap();
        screen.editor_mut().append_stop("Central").unwrap();

        screen.select_mode(ModeKind::Find);
        assert!(!screen.editor().is_bound());
        assert!(screen.editor().stops().is_empty());
    }

    #[tokio::test]
    async fn delete_not_found_keeps_mode_and_results() {
        let mock = MockRouteStopService::new();
        mock.expect_find_all().return_ok(stored());
        mock.expect_delete()
            .return_err(WorkflowError::not_found("stop 99"));

        let mut screen = screen();
        screen.select_mode(ModeKind::Find);
        screen.find(&mock, StopSearch::All).await.unwrap();
        screen.select_mode(ModeKind::Delete);
        screen.set_stop_id("99").unwrap();

        let err = screen.delete_stop(&mock).await.unwrap_err();
        assert!(matches!(err, WorkflowError::NotFound(_)));
        assert_eq!(screen.mode(), ModeKind::Delete);
        assert_eq!(screen.results().len(), 2);
        assert_eq!(screen.stop_id(), "99");
    }

    #[tokio::test]
    async fn delete_refreshes_and_clears_id() {
        let mock = MockRouteStopService::new();
        mock.expect_delete().return_ok(());
        mock.expect_find_all().return_ok(stored()[1..].to_vec());

        let mut screen = screen();
        screen.select_mode(ModeKind::Delete);
        screen.set_stop_id("10").unwrap();
        screen.delete_stop(&mock).await.unwrap();

        assert_eq!(screen.stop_id(), "");
        assert_eq!(screen.results()[1].names(), vec!["Central"]);
        assert_eq!(
            mock.calls(),
            vec![RouteStopCall::Delete(StopId(10)), RouteStopCall::FindAll]
        );
    }
}
