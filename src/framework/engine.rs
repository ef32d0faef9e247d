//! # Workflow Engine
//!
//! [`WorkflowEngine<T>`] drives the Create / Find / Update / Delete lifecycle of one admin
//! screen. It owns the mode, the form, and the result list; the view only reads them and
//! forwards operator input.
//!
//! ## Submitting
//!
//! A submission is split in two so that the network round trip can happen outside the
//! engine (see [`SessionActor`](crate::session::SessionActor)):
//!
//! 1. [`begin_submit`](WorkflowEngine::begin_submit) validates local input and returns a
//!    [`PendingRequest`] carrying a [`Ticket`]. Until that ticket's completion comes back
//!    the engine is busy and further submits are ignored, even after a mode change or
//!    cancel.
//! 2. [`PendingRequest::execute`] performs the service calls.
//! 3. [`complete`](WorkflowEngine::complete) releases the engine and applies the result,
//!    unless a mode change or cancel superseded the request, in which case it is
//!    discarded.
//!
//! [`submit`](WorkflowEngine::submit) chains the three for callers that simply await.

use crate::framework::{
    FormFields, Mode, ModeKind, Resource, ResourceService, SearchMode, WorkflowError,
};
use tracing::{debug, info, warn};

/// Identifies one submission. At most one ticket is outstanding per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// The service work a submission needs.
#[derive(Debug, Clone)]
pub enum Operation<T: Resource> {
    Create { fields: FormFields },
    FindById { id: T::Id },
    FindAll,
    FindByText { query: String },
    /// First phase of an update.
    LoadForEdit { id: T::Id },
    /// Second phase of an update; followed by a refresh `find_by_id`.
    Update { id: T::Id, fields: FormFields },
    /// Followed by a refresh `find_all`.
    Delete { id: T::Id },
}

/// A validated submission waiting to be executed.
#[derive(Debug)]
pub struct PendingRequest<T: Resource> {
    pub ticket: Ticket,
    pub operation: Operation<T>,
}

/// Successful service results, one variant per operation family.
#[derive(Debug)]
pub enum Outcome<T: Resource> {
    Created(T),
    Found(Vec<T>),
    Loaded(T),
    Updated(T),
    /// The delete committed; the listing refresh may still have failed.
    Deleted(Result<Vec<T>, WorkflowError>),
}

/// Result of executing a [`PendingRequest`].
#[derive(Debug)]
pub struct Completion<T: Resource> {
    pub ticket: Ticket,
    pub result: Result<Outcome<T>, WorkflowError>,
}

/// What a submit did to the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A request was already in flight.
    Ignored,
    /// The response arrived after the screen had moved on.
    Discarded,
    Created,
    /// Results were replaced with this many records.
    Found(usize),
    Loaded,
    Updated,
    Deleted,
}

impl<T: Resource> PendingRequest<T> {
    pub async fn execute<S>(self, service: &S) -> Completion<T>
    where
        S: ResourceService<T> + ?Sized,
    {
        let result = match self.operation {
            Operation::Create { fields } => service.create(fields).await.map(Outcome::Created),
            Operation::FindById { id } => service
                .find_by_id(id)
                .await
                .map(|record| Outcome::Found(vec![record])),
            Operation::FindAll => service.find_all().await.map(Outcome::Found),
            Operation::FindByText { query } => {
                service.find_by_text(query).await.map(Outcome::Found)
            }
            Operation::LoadForEdit { id } => service.find_by_id(id).await.map(Outcome::Loaded),
            Operation::Update { id, fields } => match service.update(id.clone(), fields).await {
                Ok(returned) => match service.find_by_id(id).await {
                    Ok(refreshed) => Ok(Outcome::Updated(refreshed)),
                    Err(e) => {
                        warn!(kind = T::KIND, error = %e, "Refresh after update failed");
                        Ok(Outcome::Updated(returned))
                    }
                },
                Err(e) => Err(e),
            },
            Operation::Delete { id } => match service.delete(id).await {
                Ok(()) => Ok(Outcome::Deleted(service.find_all().await)),
                Err(e) => Err(e),
            },
        };
        Completion {
            ticket: self.ticket,
            result,
        }
    }
}

/// Read-only view of a screen, as handed to the view layer.
#[derive(Debug, Clone)]
pub struct ScreenSnapshot<T: Resource> {
    pub mode: ModeKind,
    pub search_mode: Option<SearchMode>,
    pub edit_loaded: bool,
    pub form: FormFields,
    pub query: String,
    pub results: Vec<T>,
    pub busy: bool,
    pub last_error: Option<WorkflowError>,
}

/// Per-screen workflow state machine.
#[derive(Debug)]
pub struct WorkflowEngine<T: Resource> {
    mode: Mode<T::Id>,
    form: FormFields,
    query: String,
    results: Vec<T>,
    in_flight: Option<Ticket>,
    /// The in-flight request was issued for a mode the screen has since left.
    superseded: bool,
    next_ticket: u64,
    last_error: Option<WorkflowError>,
}

impl<T: Resource> Default for WorkflowEngine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> WorkflowEngine<T> {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            form: FormFields::new(),
            query: String::new(),
            results: Vec::new(),
            in_flight: None,
            superseded: false,
            next_ticket: 1,
            last_error: None,
        }
    }

    pub fn mode(&self) -> &Mode<T::Id> {
        &self.mode
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn search_mode(&self) -> Option<SearchMode> {
        self.mode.search_mode()
    }

    pub fn edit_loaded(&self) -> bool {
        self.mode.edit_loaded()
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[T] {
        &self.results
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn last_error(&self) -> Option<&WorkflowError> {
        self.last_error.as_ref()
    }

    pub fn snapshot(&self) -> ScreenSnapshot<T> {
        ScreenSnapshot {
            mode: self.mode.kind(),
            search_mode: self.mode.search_mode(),
            edit_loaded: self.mode.edit_loaded(),
            form: self.form.clone(),
            query: self.query.clone(),
            results: self.results.clone(),
            busy: self.is_busy(),
            last_error: self.last_error.clone(),
        }
    }

    /// Enters `kind`, discarding all uncommitted form state. Results are kept.
    ///
    /// Selecting [`ModeKind::Idle`] is the same as [`cancel`](Self::cancel).
    pub fn select_mode(&mut self, kind: ModeKind) {
        if kind == ModeKind::Idle {
            self.cancel();
            return;
        }
        let previous = self.mode.kind();
        self.mode = Mode::enter(kind);
        self.form = match kind {
            ModeKind::Create => T::blank_form(),
            _ => FormFields::new(),
        };
        self.query.clear();
        self.last_error = None;
        self.supersede();
        info!(kind = T::KIND, from = %previous, to = %kind, "Mode selected");
    }

    /// Returns to `Idle`, dropping the form, the results and any loaded edit.
    pub fn cancel(&mut self) {
        self.mode = Mode::Idle;
        self.form = FormFields::new();
        self.query.clear();
        self.results.clear();
        self.last_error = None;
        self.supersede();
        info!(kind = T::KIND, "Cancelled");
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<(), WorkflowError> {
        if !self.is_editable(name) {
            return Err(WorkflowError::validation(format!(
                "{name} is not editable in {} mode",
                self.mode.kind()
            )));
        }
        self.form.set(name, value);
        Ok(())
    }

    pub fn set_search_mode(&mut self, search_mode: SearchMode) -> Result<(), WorkflowError> {
        match &mut self.mode {
            Mode::Find { search } => {
                *search = search_mode;
                Ok(())
            }
            other => Err(WorkflowError::validation(format!(
                "search strategy only applies to find, not {}",
                other.kind()
            ))),
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> Result<(), WorkflowError> {
        match self.mode {
            Mode::Find { .. } => {
                self.query = query.into();
                Ok(())
            }
            ref other => Err(WorkflowError::validation(format!(
                "search text only applies to find, not {}",
                other.kind()
            ))),
        }
    }

    /// Validates local input and reserves the screen for one request.
    ///
    /// Returns `Ok(None)` when a request is already in flight: the submit is ignored.
    /// Validation failures are recorded as the last error and issue no request.
    pub fn begin_submit(&mut self) -> Result<Option<PendingRequest<T>>, WorkflowError> {
        if let Some(ticket) = self.in_flight {
            debug!(kind = T::KIND, ?ticket, "Submit ignored, request in flight");
            return Ok(None);
        }
        let operation = match self.prepare() {
            Ok(operation) => operation,
            Err(e) => {
                warn!(kind = T::KIND, mode = %self.mode.kind(), error = %e, "Submit rejected");
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        debug!(kind = T::KIND, ?ticket, ?operation, "Submitting");
        Ok(Some(PendingRequest { ticket, operation }))
    }

    /// Applies the result of a request started by [`begin_submit`](Self::begin_submit).
    ///
    /// The engine is released either way; a superseded result is dropped without touching
    /// the form, the results or the last error.
    pub fn complete(&mut self, completion: Completion<T>) -> Result<SubmitOutcome, WorkflowError> {
        if self.in_flight != Some(completion.ticket) {
            debug!(kind = T::KIND, ticket = ?completion.ticket, "Ignoring unknown ticket");
            return Ok(SubmitOutcome::Discarded);
        }
        self.in_flight = None;
        if std::mem::take(&mut self.superseded) {
            debug!(kind = T::KIND, ticket = ?completion.ticket, "Discarding stale response");
            return Ok(SubmitOutcome::Discarded);
        }
        match completion.result {
            Ok(outcome) => {
                self.last_error = None;
                Ok(self.apply(outcome))
            }
            Err(e) => {
                warn!(kind = T::KIND, mode = %self.mode.kind(), error = %e, "Operation failed");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Validates, calls the service, and applies the result.
    pub async fn submit<S>(&mut self, service: &S) -> Result<SubmitOutcome, WorkflowError>
    where
        S: ResourceService<T> + ?Sized,
    {
        let Some(request) = self.begin_submit()? else {
            return Ok(SubmitOutcome::Ignored);
        };
        let completion = request.execute(service).await;
        self.complete(completion)
    }

    fn supersede(&mut self) {
        if let Some(ticket) = self.in_flight {
            self.superseded = true;
            debug!(kind = T::KIND, ?ticket, "In-flight request superseded");
        }
    }

    fn is_editable(&self, name: &str) -> bool {
        match &self.mode {
            Mode::Create | Mode::UpdateEditing { .. } => {
                T::schema().iter().any(|spec| spec.name == name)
            }
            Mode::Find {
                search: SearchMode::ById,
            }
            | Mode::UpdateAwaitingId
            | Mode::Delete => name == T::ID_FIELD,
            Mode::Find { .. } | Mode::Idle => false,
        }
    }

    fn prepare(&self) -> Result<Operation<T>, WorkflowError> {
        match &self.mode {
            Mode::Idle => Err(WorkflowError::validation("select an operation first")),
            Mode::Create => {
                self.check_required()?;
                Ok(Operation::Create {
                    fields: self.form.clone(),
                })
            }
            Mode::Find { search } => match search {
                SearchMode::ById => Ok(Operation::FindById {
                    id: self.typed_id()?,
                }),
                SearchMode::All => Ok(Operation::FindAll),
                SearchMode::ByText => match self.query.trim() {
                    "" => Err(WorkflowError::validation("search text is required")),
                    query => Ok(Operation::FindByText {
                        query: query.to_string(),
                    }),
                },
            },
            Mode::UpdateAwaitingId => Ok(Operation::LoadForEdit {
                id: self.typed_id()?,
            }),
            Mode::UpdateEditing { id } => {
                self.check_required()?;
                let mut fields = self.form.clone();
                fields.remove(T::ID_FIELD);
                Ok(Operation::Update {
                    id: id.clone(),
                    fields,
                })
            }
            Mode::Delete => Ok(Operation::Delete {
                id: self.typed_id()?,
            }),
        }
    }

    fn typed_id(&self) -> Result<T::Id, WorkflowError> {
        T::parse_id(self.form.trimmed(T::ID_FIELD))
    }

    fn check_required(&self) -> Result<(), WorkflowError> {
        let missing = self.form.missing_required(T::schema());
        if !missing.is_empty() {
            return Err(WorkflowError::validation(format!(
                "missing required field(s): {}",
                missing.join(", ")
            )));
        }
        let malformed = self.form.malformed(T::schema());
        if !malformed.is_empty() {
            return Err(WorkflowError::validation(format!(
                "invalid value for: {}",
                malformed.join(", ")
            )));
        }
        Ok(())
    }

    fn apply(&mut self, outcome: Outcome<T>) -> SubmitOutcome {
        match outcome {
            Outcome::Created(record) => {
                info!(kind = T::KIND, id = %record.id(), "Created");
                self.mode = Mode::Idle;
                self.form = FormFields::new();
                SubmitOutcome::Created
            }
            Outcome::Found(records) => {
                let count = records.len();
                info!(kind = T::KIND, count, "Results replaced");
                self.results = records;
                SubmitOutcome::Found(count)
            }
            Outcome::Loaded(record) => {
                info!(kind = T::KIND, id = %record.id(), "Loaded for edit");
                self.form = record.edit_form();
                self.mode = Mode::UpdateEditing {
                    id: record.id().clone(),
                };
                SubmitOutcome::Loaded
            }
            Outcome::Updated(record) => {
                info!(kind = T::KIND, id = %record.id(), "Updated");
                self.results = vec![record];
                self.mode = Mode::Idle;
                self.form = FormFields::new();
                SubmitOutcome::Updated
            }
            Outcome::Deleted(listing) => {
                info!(kind = T::KIND, "Deleted");
                self.form = FormFields::new();
                match listing {
                    Ok(records) => self.results = records,
                    Err(e) => {
                        warn!(kind = T::KIND, error = %e, "Listing refresh after delete failed");
                        self.last_error = Some(e);
                    }
                }
                SubmitOutcome::Deleted
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::mock::{MockService, ServiceCall};
    use crate::model::{Bus, BusId};

    fn bus(id: u32, number: &str) -> Bus {
        Bus::new(BusId(id), number, 52, 3, "active")
    }

    fn filled_create(engine: &mut WorkflowEngine<Bus>) {
        engine.set_field("bus_number", "NB-1042").unwrap();
        engine.set_field("seat_capacity", "52").unwrap();
        engine.set_field("route_id", "3").unwrap();
    }

    #[tokio::test]
    async fn create_success_clears_form_and_returns_to_idle() {
        let mock = MockService::<Bus>::new();
        mock.expect_create().return_ok(bus(1, "NB-1042"));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Create);
        filled_create(&mut engine);

        let outcome = engine.submit(&mock).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Created);
        assert_eq!(engine.mode_kind(), ModeKind::Idle);
        assert!(engine.form().is_empty());
        assert!(engine.results().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn create_with_missing_required_field_never_calls_the_service() {
        let mock = MockService::<Bus>::new();
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Create);
        engine.set_field("bus_number", "NB-1042").unwrap();

        let err = engine.submit(&mock).await.unwrap_err();

        assert!(err.is_local());
        assert!(mock.calls().is_empty());
        assert_eq!(engine.mode_kind(), ModeKind::Create);
        assert_eq!(engine.form().get("bus_number"), Some("NB-1042"));
        assert_eq!(engine.last_error(), Some(&err));
    }

    #[tokio::test]
    async fn create_failure_keeps_fields() {
        let mock = MockService::<Bus>::new();
        mock.expect_create()
            .return_err(WorkflowError::ConflictOrConstraint("duplicate bus_number".into()));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Create);
        filled_create(&mut engine);

        let result = engine.submit(&mock).await;

        assert!(matches!(result, Err(WorkflowError::ConflictOrConstraint(_))));
        assert_eq!(engine.mode_kind(), ModeKind::Create);
        assert_eq!(engine.form().get("bus_number"), Some("NB-1042"));
        assert!(!engine.is_busy());
    }

    #[tokio::test]
    async fn find_by_id_replaces_previous_results() {
        let mock = MockService::<Bus>::new();
        mock.expect_find_all()
            .return_ok(vec![bus(1, "A"), bus(2, "B"), bus(3, "C")]);
        mock.expect_find_by_id(BusId(2)).return_ok(bus(2, "B"));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Find);
        engine.set_search_mode(SearchMode::All).unwrap();
        assert_eq!(engine.submit(&mock).await.unwrap(), SubmitOutcome::Found(3));

        engine.set_search_mode(SearchMode::ById).unwrap();
        engine.set_field("bus_id", "2").unwrap();
        assert_eq!(engine.submit(&mock).await.unwrap(), SubmitOutcome::Found(1));

        assert_eq!(engine.mode_kind(), ModeKind::Find);
        assert_eq!(engine.results(), &[bus(2, "B")]);
        assert_eq!(
            mock.calls(),
            vec![ServiceCall::FindAll, ServiceCall::FindById(BusId(2))]
        );
    }

    #[tokio::test]
    async fn find_by_text_requires_a_query() {
        let mock = MockService::<Bus>::new();
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Find);
        engine.set_search_mode(SearchMode::ByText).unwrap();
        engine.set_query("   ").unwrap();

        assert!(engine.submit(&mock).await.unwrap_err().is_local());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn find_by_id_rejects_non_numeric_id_locally() {
        let mock = MockService::<Bus>::new();
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Find);
        engine.set_field("bus_id", "twelve").unwrap();

        assert!(engine.submit(&mock).await.unwrap_err().is_local());
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn update_is_two_phase() {
        let mock = MockService::<Bus>::new();
        mock.expect_find_by_id(BusId(4)).return_ok(bus(4, "NB-4"));
        mock.expect_update(BusId(4)).return_ok(bus(4, "NB-44"));
        mock.expect_find_by_id(BusId(4)).return_ok(bus(4, "NB-44"));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Update);
        assert!(!engine.edit_loaded());
        assert!(engine.set_field("bus_number", "x").is_err());

        engine.set_field("bus_id", "4").unwrap();
        assert_eq!(engine.submit(&mock).await.unwrap(), SubmitOutcome::Loaded);
        assert!(engine.edit_loaded());
        assert_eq!(engine.form().get("bus_number"), Some("NB-4"));
        assert_eq!(engine.form().get("bus_id"), Some("4"));

        engine.set_field("bus_number", "NB-44").unwrap();
        assert_eq!(engine.submit(&mock).await.unwrap(), SubmitOutcome::Updated);

        assert_eq!(engine.mode_kind(), ModeKind::Idle);
        assert_eq!(engine.results(), &[bus(4, "NB-44")]);
        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        match &calls[1] {
            ServiceCall::Update(id, fields) => {
                assert_eq!(*id, BusId(4));
                assert_eq!(fields.get("bus_number"), Some("NB-44"));
                assert_eq!(fields.get("bus_id"), None);
            }
            other => panic!("expected update, got {other:?}"),
        }
        mock.verify();
    }

    #[tokio::test]
    async fn failed_lookup_stays_awaiting_id() {
        let mock = MockService::<Bus>::new();
        mock.expect_find_by_id(BusId(9))
            .return_err(WorkflowError::not_found("bus 9"));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Update);
        engine.set_field("bus_id", "9").unwrap();

        assert!(engine.submit(&mock).await.is_err());
        assert_eq!(engine.mode(), &Mode::UpdateAwaitingId);
        assert!(!engine.edit_loaded());
        assert_eq!(engine.form().get("bus_id"), Some("9"));
    }

    #[tokio::test]
    async fn failed_update_keeps_edits() {
        let mock = MockService::<Bus>::new();
        mock.expect_find_by_id(BusId(4)).return_ok(bus(4, "NB-4"));
        mock.expect_update(BusId(4))
            .return_err(WorkflowError::Server("500".into()));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Update);
        engine.set_field("bus_id", "4").unwrap();
        engine.submit(&mock).await.unwrap();
        engine.set_field("seat_capacity", "60").unwrap();

        assert!(engine.submit(&mock).await.is_err());
        assert!(engine.edit_loaded());
        assert_eq!(engine.form().get("seat_capacity"), Some("60"));
        mock.verify();
    }

    #[tokio::test]
    async fn delete_refreshes_full_listing() {
        let mock = MockService::<Bus>::new();
        mock.expect_delete(BusId(1)).return_ok(());
        mock.expect_find_all().return_ok(vec![bus(2, "B")]);

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Delete);
        engine.set_field("bus_id", "1").unwrap();

        assert_eq!(engine.submit(&mock).await.unwrap(), SubmitOutcome::Deleted);
        assert_eq!(engine.mode_kind(), ModeKind::Delete);
        assert_eq!(engine.results(), &[bus(2, "B")]);
        assert!(engine.form().is_blank("bus_id"));
    }

    #[tokio::test]
    async fn delete_not_found_leaves_results_untouched() {
        let mock = MockService::<Bus>::new();
        mock.expect_find_all().return_ok(vec![bus(1, "A")]);
        mock.expect_delete(BusId(8))
            .return_err(WorkflowError::not_found("bus 8"));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Find);
        engine.set_search_mode(SearchMode::All).unwrap();
        engine.submit(&mock).await.unwrap();

        engine.select_mode(ModeKind::Delete);
        engine.set_field("bus_id", "8").unwrap();
        let result = engine.submit(&mock).await;

        assert!(matches!(result, Err(WorkflowError::NotFound(_))));
        assert_eq!(engine.mode_kind(), ModeKind::Delete);
        assert_eq!(engine.results(), &[bus(1, "A")]);
    }

    #[tokio::test]
    async fn switching_from_update_to_find_discards_edits() {
        let mock = MockService::<Bus>::new();
        mock.expect_find_by_id(BusId(4)).return_ok(bus(4, "NB-4"));

        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Update);
        engine.set_field("bus_id", "4").unwrap();
        engine.submit(&mock).await.unwrap();
        engine.set_field("bus_number", "unsaved").unwrap();

        engine.select_mode(ModeKind::Find);

        assert!(!engine.edit_loaded());
        assert!(engine.form().is_empty());
        assert_eq!(engine.search_mode(), Some(SearchMode::ById));
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Delete);
        engine.set_field("bus_id", "3").unwrap();

        let first = engine.begin_submit().unwrap();
        assert!(first.is_some());
        assert!(engine.is_busy());
        assert!(engine.begin_submit().unwrap().is_none());
    }

    #[test]
    fn response_after_cancel_is_discarded() {
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Find);
        engine.set_search_mode(SearchMode::All).unwrap();
        let request = engine.begin_submit().unwrap().unwrap();

        engine.cancel();
        assert!(engine.is_busy());

        let outcome = engine
            .complete(Completion {
                ticket: request.ticket,
                result: Ok(Outcome::Found(vec![bus(1, "A")])),
            })
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert!(engine.results().is_empty());
        assert_eq!(engine.mode_kind(), ModeKind::Idle);
        assert!(!engine.is_busy());
    }

    #[test]
    fn mode_switch_keeps_gate_closed_until_old_request_returns() {
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Delete);
        engine.set_field("bus_id", "1").unwrap();
        let delete = engine.begin_submit().unwrap().unwrap();

        engine.select_mode(ModeKind::Create);
        filled_create(&mut engine);
        assert!(engine.is_busy());
        assert!(engine.begin_submit().unwrap().is_none());

        let outcome = engine
            .complete(Completion {
                ticket: delete.ticket,
                result: Ok(Outcome::Deleted(Ok(Vec::new()))),
            })
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Discarded);
        assert_eq!(engine.form().get("bus_number"), Some("NB-1042"));

        let create = engine.begin_submit().unwrap().unwrap();
        assert_ne!(create.ticket, delete.ticket);
        let outcome = engine
            .complete(Completion {
                ticket: create.ticket,
                result: Ok(Outcome::Created(bus(2, "NB-1042"))),
            })
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::Created);
        assert_eq!(engine.mode_kind(), ModeKind::Idle);
    }

    #[test]
    fn failed_stale_response_leaves_no_error_behind() {
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Find);
        engine.set_search_mode(SearchMode::All).unwrap();
        let request = engine.begin_submit().unwrap().unwrap();
        engine.select_mode(ModeKind::Delete);

        let outcome = engine.complete(Completion {
            ticket: request.ticket,
            result: Err(WorkflowError::Server("502".into())),
        });

        assert_eq!(outcome, Ok(SubmitOutcome::Discarded));
        assert!(engine.last_error().is_none());
        assert!(!engine.is_busy());
    }

    #[test]
    fn cancel_clears_everything() {
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Create);
        engine.set_field("bus_number", "NB-1").unwrap();
        engine.cancel();

        assert_eq!(engine.mode(), &Mode::Idle);
        assert!(engine.form().is_empty());
        assert!(engine.results().is_empty());
        assert!(!engine.is_busy());
    }

    #[tokio::test]
    async fn malformed_number_is_caught_before_the_call() {
        let mock = MockService::<Bus>::new();
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Create);
        filled_create(&mut engine);
        engine.set_field("seat_capacity", "fifty").unwrap();

        let err = engine.submit(&mock).await.unwrap_err();

        assert_eq!(
            err,
            WorkflowError::Validation("invalid value for: seat_capacity".into())
        );
        assert!(mock.calls().is_empty());
        assert_eq!(engine.mode_kind(), ModeKind::Create);
    }

    #[test]
    fn create_form_starts_with_schema_defaults() {
        let mut engine = WorkflowEngine::<Bus>::new();
        engine.select_mode(ModeKind::Create);
        assert_eq!(engine.form().get("status"), Some("active"));
    }
}
