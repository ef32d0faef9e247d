//! Scripted [`RouteStopService`] for editor tests.
//!
//! Works like [`MockService`](crate::framework::mock::MockService): responses are queued
//! with `expect_*().return_ok(..)` / `return_err(..)`, calls are recorded, and
//! [`verify`](MockRouteStopService::verify) checks the queue was drained.

use crate::framework::WorkflowError;
use crate::model::{RouteId, RouteStop, RouteStopSequence, StopEntry, StopId};
use crate::sequence::RouteStopService;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A call received by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteStopCall {
    GetStopsByRoute(RouteId),
    FindAll,
    BulkCreate(RouteId, Vec<String>),
    BulkUpdate(RouteId, Vec<StopEntry>, Option<u64>),
    Delete(StopId),
}

#[derive(Debug)]
enum Expectation {
    GetStopsByRoute(Result<RouteStopSequence, WorkflowError>),
    FindAll(Result<Vec<RouteStop>, WorkflowError>),
    BulkCreate(Result<(), WorkflowError>),
    BulkUpdate(Result<(), WorkflowError>),
    Delete(Result<(), WorkflowError>),
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

#[derive(Clone, Default)]
pub struct MockRouteStopService {
    expectations: Queue,
    calls: Arc<Mutex<Vec<RouteStopCall>>>,
}

impl MockRouteStopService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_get_stops_by_route(&self) -> Reply<RouteStopSequence> {
        self.reply(Expectation::GetStopsByRoute)
    }

    pub fn expect_find_all(&self) -> Reply<Vec<RouteStop>> {
        self.reply(Expectation::FindAll)
    }

    pub fn expect_bulk_create(&self) -> Reply<()> {
        self.reply(Expectation::BulkCreate)
    }

    pub fn expect_bulk_update(&self) -> Reply<()> {
        self.reply(Expectation::BulkUpdate)
    }

    pub fn expect_delete(&self) -> Reply<()> {
        self.reply(Expectation::Delete)
    }

    pub fn calls(&self) -> Vec<RouteStopCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining: {:?}", exps.len(), exps);
        }
    }

    fn reply<V>(&self, wrap: fn(Result<V, WorkflowError>) -> Expectation) -> Reply<V> {
        Reply {
            expectations: self.expectations.clone(),
            wrap,
        }
    }

    fn next(&self, call: RouteStopCall) -> Expectation {
        self.calls.lock().unwrap().push(call.clone());
        match self.expectations.lock().unwrap().pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected call {call:?}: no expectations left"),
        }
    }
}

/// Completes an expectation.
pub struct Reply<V> {
    expectations: Queue,
    wrap: fn(Result<V, WorkflowError>) -> Expectation,
}

impl<V> Reply<V> {
    pub fn return_ok(self, value: V) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.wrap)(Ok(value)));
    }

    pub fn return_err(self, error: WorkflowError) {
        self.expectations
            .lock()
            .unwrap()
            .push_back((self.wrap)(Err(error)));
    }
}

#[async_trait]
impl RouteStopService for MockRouteStopService {
    async fn get_stops_by_route(
        &self,
        route_id: RouteId,
    ) -> Result<RouteStopSequence, WorkflowError> {
        match self.next(RouteStopCall::GetStopsByRoute(route_id)) {
            Expectation::GetStopsByRoute(response) => response,
            other => panic!("Unexpected get_stops_by_route, expected {other:?}"),
        }
    }

    async fn find_all(&self) -> Result<Vec<RouteStop>, WorkflowError> {
        match self.next(RouteStopCall::FindAll) {
            Expectation::FindAll(response) => response,
            other => panic!("Unexpected find_all, expected {other:?}"),
        }
    }

    async fn bulk_create(&self, route_id: RouteId, names: Vec<String>) -> Result<(), WorkflowError> {
        match self.next(RouteStopCall::BulkCreate(route_id, names)) {
            Expectation::BulkCreate(response) => response,
            other => panic!("Unexpected bulk_create, expected {other:?}"),
        }
    }

    async fn bulk_update(
        &self,
        route_id: RouteId,
        stops: Vec<StopEntry>,
        expected_version: Option<u64>,
    ) -> Result<(), WorkflowError> {
        match self.next(RouteStopCall::BulkUpdate(route_id, stops, expected_version)) {
            Expectation::BulkUpdate(response) => response,
            other => panic!("Unexpected bulk_update, expected {other:?}"),
        }
    }

    async fn delete(&self, stop_id: StopId) -> Result<(), WorkflowError> {
        match self.next(RouteStopCall::Delete(stop_id)) {
            Expectation::Delete(response) => response,
            other => panic!("Unexpected delete, expected {other:?}"),
        }
    }
}
