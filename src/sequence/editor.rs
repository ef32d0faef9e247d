//! # Sequence Editor
//!
//! Builds or rewrites the ordered stop list of one route. All edits happen on a local
//! working copy; nothing reaches the backend until [`save`](SequenceEditor::save), which
//! renumbers the whole list `1..=N` and writes it in one bulk call.
//!
//! Positions, not stored order numbers, drive every edit. A stop loaded from the backend
//! keeps its old order number only as a [`StopKey`] until it is saved.
//!
//! While a save is in flight the working list is frozen and no other request can start.
//! Cancelling only marks the save as superseded; the editor stays busy until its
//! completion arrives and is then discarded.

use crate::framework::WorkflowError;
use crate::model::{RouteId, StopEntry};
use crate::sequence::RouteStopService;
use tracing::{debug, info, warn};

/// Whether the session builds a new stop list or rewrites an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Add,
    Update,
}

/// Stable identity of a working stop while the list is being edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKey {
    /// Loaded from the backend with this order number.
    Stored(u32),
    /// Appended during this session.
    Provisional(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingStop {
    pub key: StopKey,
    pub name: String,
}

#[derive(Debug, Clone)]
struct Bound {
    flow: Flow,
    route_id: RouteId,
    route_name: Option<String>,
    stops: Vec<WorkingStop>,
    version: Option<u64>,
}

/// Identifies one save. At most one is outstanding per editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SaveTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOperation {
    BulkCreate {
        names: Vec<String>,
    },
    BulkUpdate {
        stops: Vec<StopEntry>,
        expected_version: Option<u64>,
    },
}

/// A validated, renumbered save waiting to be sent.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub ticket: SaveTicket,
    pub route_id: RouteId,
    pub operation: SaveOperation,
}

#[derive(Debug)]
pub struct SaveCompletion {
    pub ticket: SaveTicket,
    pub result: Result<(), WorkflowError>,
}

/// What a save did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Ignored,
    Discarded,
    /// The route now holds this many stops.
    Saved(usize),
}

impl SaveRequest {
    pub async fn execute<S>(self, service: &S) -> SaveCompletion
    where
        S: RouteStopService + ?Sized,
    {
        let result = match self.operation {
            SaveOperation::BulkCreate { names } => service.bulk_create(self.route_id, names).await,
            SaveOperation::BulkUpdate {
                stops,
                expected_version,
            } => {
                service
                    .bulk_update(self.route_id, stops, expected_version)
                    .await
            }
        };
        SaveCompletion {
            ticket: self.ticket,
            result,
        }
    }
}

/// Editing session for one route's ordered stops.
#[derive(Debug, Default)]
pub struct SequenceEditor {
    bound: Option<Bound>,
    next_provisional: u64,
    in_flight: Option<(SaveTicket, usize)>,
    /// The in-flight save belongs to a session that was cancelled.
    superseded: bool,
    next_ticket: u64,
    last_error: Option<WorkflowError>,
}

impl SequenceEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn flow(&self) -> Option<Flow> {
        self.bound.as_ref().map(|b| b.flow)
    }

    pub fn route_id(&self) -> Option<RouteId> {
        self.bound.as_ref().map(|b| b.route_id)
    }

    /// Name reported by the backend; only known in the update flow.
    pub fn route_name(&self) -> Option<&str> {
        self.bound.as_ref().and_then(|b| b.route_name.as_deref())
    }

    pub fn version(&self) -> Option<u64> {
        self.bound.as_ref().and_then(|b| b.version)
    }

    pub fn stops(&self) -> &[WorkingStop] {
        self.bound.as_ref().map(|b| b.stops.as_slice()).unwrap_or(&[])
    }

    pub fn names(&self) -> Vec<&str> {
        self.stops().iter().map(|stop| stop.name.as_str()).collect()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    /// The entries a save would persist right now.
    pub fn renumbered(&self) -> Vec<StopEntry> {
        self.stops()
            .iter()
            .zip(1u32..)
            .map(|(stop, order)| StopEntry::new(order, stop.name.trim()))
            .collect()
    }

    /// Binds the session to a route.
    ///
    /// `Flow::Add` starts from an empty list without touching the backend. `Flow::Update`
    /// loads the route's current stops sorted by their stored order; a route without stops
    /// is `NotFound`. On failure the previous session is left as it was. Refused while a
    /// save is in flight.
    pub async fn select_route<S>(
        &mut self,
        service: &S,
        route_id: RouteId,
        flow: Flow,
    ) -> Result<(), WorkflowError>
    where
        S: RouteStopService + ?Sized,
    {
        self.ensure_idle()?;
        let bound = match flow {
            Flow::Add => Bound {
                flow,
                route_id,
                route_name: None,
                stops: Vec::new(),
                version: None,
            },
            Flow::Update => {
                debug!(%route_id, "Loading stops");
                let sequence = match service.get_stops_by_route(route_id).await {
                    Ok(sequence) if sequence.stops.is_empty() => {
                        Err(WorkflowError::NotFound(format!("route {route_id} has no stops")))
                    }
                    other => other,
                };
                let mut sequence = self.record(sequence)?;
                sequence.stops.sort_by_key(|stop| stop.stop_order);
                Bound {
                    flow,
                    route_id,
                    route_name: Some(sequence.route_name),
                    stops: sequence
                        .stops
                        .into_iter()
                        .map(|stop| WorkingStop {
                            key: StopKey::Stored(stop.stop_order),
                            name: stop.stop_name,
                        })
                        .collect(),
                    version: sequence.version,
                }
            }
        };
        info!(%route_id, ?flow, stops = bound.stops.len(), "Route selected");
        self.bound = Some(bound);
        self.last_error = None;
        Ok(())
    }

    /// Appends a stop at the end of the list.
    pub fn append_stop(&mut self, name: &str) -> Result<(), WorkflowError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkflowError::validation("stop name is required"));
        }
        let key = StopKey::Provisional(self.next_provisional);
        self.editable()?.stops.push(WorkingStop {
            key,
            name: name.to_string(),
        });
        self.next_provisional += 1;
        Ok(())
    }

    pub fn remove_stop(&mut self, index: usize) -> Result<WorkingStop, WorkflowError> {
        let stops = &mut self.editable()?.stops;
        check_index(stops, index)?;
        Ok(stops.remove(index))
    }

    /// Swaps the stop with its predecessor. No-op on the first stop.
    pub fn move_up(&mut self, index: usize) -> Result<(), WorkflowError> {
        let stops = &mut self.editable()?.stops;
        check_index(stops, index)?;
        if index > 0 {
            stops.swap(index - 1, index);
        }
        Ok(())
    }

    /// Swaps the stop with its successor. No-op on the last stop.
    pub fn move_down(&mut self, index: usize) -> Result<(), WorkflowError> {
        let stops = &mut self.editable()?.stops;
        check_index(stops, index)?;
        if index + 1 < stops.len() {
            stops.swap(index, index + 1);
        }
        Ok(())
    }

    /// Replaces a stop's name in place. Blank names are caught at save time.
    pub fn rename_stop(&mut self, index: usize, new_name: &str) -> Result<(), WorkflowError> {
        let stops = &mut self.editable()?.stops;
        check_index(stops, index)?;
        stops[index].name = new_name.to_string();
        Ok(())
    }

    /// Validates and renumbers the working list, reserving the editor for one save.
    ///
    /// Returns `Ok(None)` while a save is already in flight.
    pub fn begin_save(&mut self) -> Result<Option<SaveRequest>, WorkflowError> {
        if let Some((ticket, _)) = self.in_flight {
            debug!(?ticket, "Save ignored, request in flight");
            return Ok(None);
        }
        let request = self.prepare_save();
        let request = self.record(request)?;
        self.in_flight = Some((request.ticket, self.stops().len()));
        debug!(route_id = %request.route_id, operation = ?request.operation, "Saving");
        Ok(Some(request))
    }

    /// Applies a save result. On success the session ends; on failure the working list is
    /// kept unchanged for a retry. A save superseded by [`cancel`](Self::cancel) only
    /// releases the editor.
    pub fn complete_save(&mut self, completion: SaveCompletion) -> Result<SaveOutcome, WorkflowError> {
        let count = match self.in_flight {
            Some((ticket, count)) if ticket == completion.ticket => count,
            _ => {
                debug!(ticket = ?completion.ticket, "Ignoring unknown save ticket");
                return Ok(SaveOutcome::Discarded);
            }
        };
        self.in_flight = None;
        if std::mem::take(&mut self.superseded) {
            debug!(ticket = ?completion.ticket, "Discarding stale save response");
            return Ok(SaveOutcome::Discarded);
        }
        self.record(completion.result)?;
        if let Some(bound) = self.bound.take() {
            info!(route_id = %bound.route_id, stops = count, "Route stops saved");
        }
        Ok(SaveOutcome::Saved(count))
    }

    pub async fn save<S>(&mut self, service: &S) -> Result<SaveOutcome, WorkflowError>
    where
        S: RouteStopService + ?Sized,
    {
        let Some(request) = self.begin_save()? else {
            return Ok(SaveOutcome::Ignored);
        };
        let completion = request.execute(service).await;
        self.complete_save(completion)
    }

    /// Ends the session without saving. A save already sent still runs to completion.
    pub fn cancel(&mut self) {
        self.bound = None;
        self.last_error = None;
        if let Some((ticket, _)) = self.in_flight {
            self.superseded = true;
            debug!(?ticket, "In-flight save superseded");
        }
    }

    fn prepare_save(&mut self) -> Result<SaveRequest, WorkflowError> {
        let bound = self
            .bound
            .as_ref()
            .ok_or_else(|| WorkflowError::validation("select a route first"))?;
        if let Some(position) = bound.stops.iter().position(|s| s.name.trim().is_empty()) {
            return Err(WorkflowError::validation(format!(
                "stop {} has no name",
                position + 1
            )));
        }
        let operation = match bound.flow {
            Flow::Add if bound.stops.is_empty() => {
                return Err(WorkflowError::validation("add at least one stop"));
            }
            Flow::Add => SaveOperation::BulkCreate {
                names: self.renumbered().into_iter().map(|e| e.stop_name).collect(),
            },
            Flow::Update => SaveOperation::BulkUpdate {
                stops: self.renumbered(),
                expected_version: bound.version,
            },
        };
        let ticket = SaveTicket(self.next_ticket);
        self.next_ticket += 1;
        Ok(SaveRequest {
            ticket,
            route_id: bound.route_id,
            operation,
        })
    }

    fn ensure_idle(&self) -> Result<(), WorkflowError> {
        match self.in_flight {
            Some(_) => Err(WorkflowError::validation("a save is in progress")),
            None => Ok(()),
        }
    }

    /// The bound session, if its working list may be changed right now.
    fn editable(&mut self) -> Result<&mut Bound, WorkflowError> {
        self.ensure_idle()?;
        self.bound
            .as_mut()
            .ok_or_else(|| WorkflowError::validation("select a route first"))
    }

    fn record<V>(&mut self, result: Result<V, WorkflowError>) -> Result<V, WorkflowError> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Ok(value)
            }
            Err(e) => {
                warn!(error = %e, "Sequence editor operation failed");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }
}

fn check_index(stops: &[WorkingStop], index: usize) -> Result<(), WorkflowError> {
    if index < stops.len() {
        Ok(())
    } else {
        Err(WorkflowError::validation(format!(
            "no stop at position {index} (list has {})",
            stops.len()
        )))
    }
}
