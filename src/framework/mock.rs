//! # Mock Service & Testing Guide
//!
//! [`MockService<T>`] implements [`ResourceService<T>`] entirely in memory from a queue of
//! expectations. It lets you drive a [`WorkflowEngine`](crate::framework::WorkflowEngine)
//! through every transition, including failures that are hard to provoke against a real
//! backend (timeouts, 5xx, constraint violations).
//!
//! ## When to use Mocks vs the in-memory backend
//!
//! | Feature | MockService | StoreActor backend |
//! |---------|-------------|--------------------|
//! | **State** | None (scripted responses) | Real records |
//! | **Determinism** | Fully deterministic | Deterministic, but spawns a task |
//! | **Error Injection** | Easy (`return_err`) | Only what the data provokes |
//! | **Call assertions** | [`MockService::calls`] | Not recorded |
//!
//! ## Example
//!
//! ```rust
//! use transit_console::framework::mock::{MockService, ServiceCall};
//! use transit_console::framework::{ModeKind, WorkflowEngine, WorkflowError};
//! use transit_console::model::{Bus, BusId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockService::<Bus>::new();
//!     mock.expect_delete(BusId(7))
//!         .return_err(WorkflowError::NotFound("bus 7".into()));
//!
//!     let mut screen = WorkflowEngine::<Bus>::new();
//!     screen.select_mode(ModeKind::Delete);
//!     screen.set_field("bus_id", "7").unwrap();
//!
//!     let result = screen.submit(&mock).await;
//!     assert!(matches!(result, Err(WorkflowError::NotFound(_))));
//!     assert_eq!(screen.mode_kind(), ModeKind::Delete);
//!     assert_eq!(mock.calls(), vec![ServiceCall::Delete(BusId(7))]);
//!     mock.verify();
//! }
//! ```

use crate::framework::{FormFields, Resource, ResourceService, WorkflowError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceCall<Id> {
    Create(FormFields),
    FindById(Id),
    FindAll,
    FindByText(String),
    Update(Id, FormFields),
    Delete(Id),
}

enum Expectation<T: Resource> {
    Create(Result<T, WorkflowError>),
    FindById(T::Id, Result<T, WorkflowError>),
    FindAll(Result<Vec<T>, WorkflowError>),
    FindByText(Result<Vec<T>, WorkflowError>),
    Update(T::Id, Result<T, WorkflowError>),
    Delete(T::Id, Result<(), WorkflowError>),
}

impl<T: Resource> Expectation<T> {
    fn describe(&self) -> String {
        match self {
            Expectation::Create(_) => "create".to_string(),
            Expectation::FindById(id, _) => format!("find_by_id({id})"),
            Expectation::FindAll(_) => "find_all".to_string(),
            Expectation::FindByText(_) => "find_by_text".to_string(),
            Expectation::Update(id, _) => format!("update({id})"),
            Expectation::Delete(id, _) => format!("delete({id})"),
        }
    }
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// Scripted [`ResourceService`] for tests.
///
/// Expectations are consumed in order; a call that does not match the next expectation
/// panics. Clones share the same queue and call log.
pub struct MockService<T: Resource> {
    expectations: Queue<T>,
    calls: Arc<Mutex<Vec<ServiceCall<T::Id>>>>,
}

impl<T: Resource> Clone for MockService<T> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            calls: self.calls.clone(),
        }
    }
}

impl<T: Resource> Default for MockService<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> MockService<T> {
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn expect_create(&self) -> Respond<T, T> {
        self.respond(Box::new(Expectation::Create))
    }

    pub fn expect_find_by_id(&self, id: T::Id) -> Respond<T, T> {
        self.respond(Box::new(move |r| Expectation::FindById(id, r)))
    }

    pub fn expect_find_all(&self) -> Respond<T, Vec<T>> {
        self.respond(Box::new(Expectation::FindAll))
    }

    pub fn expect_find_by_text(&self) -> Respond<T, Vec<T>> {
        self.respond(Box::new(Expectation::FindByText))
    }

    pub fn expect_update(&self, id: T::Id) -> Respond<T, T> {
        self.respond(Box::new(move |r| Expectation::Update(id, r)))
    }

    pub fn expect_delete(&self, id: T::Id) -> Respond<T, ()> {
        self.respond(Box::new(move |r| Expectation::Delete(id, r)))
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<ServiceCall<T::Id>> {
        self.calls.lock().unwrap().clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            let pending: Vec<String> = exps.iter().map(Expectation::describe).collect();
            panic!(
                "Not all expectations were met. {} remaining: {}",
                exps.len(),
                pending.join(", ")
            );
        }
    }

    fn respond<V>(&self, wrap: Wrap<T, V>) -> Respond<T, V> {
        Respond {
            expectations: self.expectations.clone(),
            wrap,
        }
    }

    fn next(&self, call: ServiceCall<T::Id>) -> Expectation<T> {
        self.calls.lock().unwrap().push(call.clone());
        match self.expectations.lock().unwrap().pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected call {call:?}: no expectations left"),
        }
    }
}

type Wrap<T, V> = Box<dyn FnOnce(Result<V, WorkflowError>) -> Expectation<T> + Send>;

/// Completes an expectation with the value the mock returns.
pub struct Respond<T: Resource, V> {
    expectations: Queue<T>,
    wrap: Wrap<T, V>,
}

impl<T: Resource, V> Respond<T, V> {
    pub fn return_ok(self, value: V) {
        self.push(Ok(value));
    }

    pub fn return_err(self, error: WorkflowError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<V, WorkflowError>) {
        let expectation = (self.wrap)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

fn check_id<Id: PartialEq + std::fmt::Debug>(op: &str, expected: &Id, actual: &Id) {
    if expected != actual {
        panic!("{op}: expected id {expected:?}, got {actual:?}");
    }
}

#[async_trait]
impl<T: Resource> ResourceService<T> for MockService<T> {
    async fn create(&self, fields: FormFields) -> Result<T, WorkflowError> {
        match self.next(ServiceCall::Create(fields)) {
            Expectation::Create(response) => response,
            other => panic!("Unexpected create, expected {}", other.describe()),
        }
    }

    async fn find_by_id(&self, id: T::Id) -> Result<T, WorkflowError> {
        match self.next(ServiceCall::FindById(id.clone())) {
            Expectation::FindById(expected, response) => {
                check_id("find_by_id", &expected, &id);
                response
            }
            other => panic!("Unexpected find_by_id({id}), expected {}", other.describe()),
        }
    }

    async fn find_all(&self) -> Result<Vec<T>, WorkflowError> {
        match self.next(ServiceCall::FindAll) {
            Expectation::FindAll(response) => response,
            other => panic!("Unexpected find_all, expected {}", other.describe()),
        }
    }

    async fn find_by_text(&self, query: String) -> Result<Vec<T>, WorkflowError> {
        match self.next(ServiceCall::FindByText(query)) {
            Expectation::FindByText(response) => response,
            other => panic!("Unexpected find_by_text, expected {}", other.describe()),
        }
    }

    async fn update(&self, id: T::Id, fields: FormFields) -> Result<T, WorkflowError> {
        match self.next(ServiceCall::Update(id.clone(), fields)) {
            Expectation::Update(expected, response) => {
                check_id("update", &expected, &id);
                response
            }
            other => panic!("Unexpected update({id}), expected {}", other.describe()),
        }
    }

    async fn delete(&self, id: T::Id) -> Result<(), WorkflowError> {
        match self.next(ServiceCall::Delete(id.clone())) {
            Expectation::Delete(expected, response) => {
                check_id("delete", &expected, &id);
                response
            }
            other => panic!("Unexpected delete({id}), expected {}", other.describe()),
        }
    }
}
