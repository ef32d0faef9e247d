//! # Store Actor
//!
//! An in-memory record store for one [`Resource`] type. It owns its records outright and
//! handles one [`StoreRequest`] at a time, so no locking is needed. Identifiers are
//! assigned from a counter starting at 1, the way a database sequence would.

use crate::backend::error::rejected;
use crate::backend::{StoreClient, StoreRequest};
use crate::framework::{FormFields, Resource, WorkflowError};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct StoreActor<T: Resource> {
    receiver: mpsc::Receiver<StoreRequest<T>>,
    records: HashMap<T::Id, T>,
    /// Insertion order, so listings are stable.
    order: Vec<T::Id>,
    next_id: u32,
}

impl<T: Resource> StoreActor<T> {
    pub fn new(buffer_size: usize) -> (Self, StoreClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: HashMap::new(),
            order: Vec::new(),
            next_id: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Processes requests until every client has been dropped.
    pub async fn run(mut self) {
        let kind = T::KIND;
        info!(kind, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::Create { fields, respond_to } => {
                    debug!(kind, ?fields, "Create");
                    let result = self.create(&fields).map_err(rejected);
                    match &result {
                        Ok(record) => info!(kind, id = %record.id(), size = self.records.len(), "Created"),
                        Err(e) => warn!(kind, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Get { id, respond_to } => {
                    let result = self.get(&id);
                    debug!(kind, %id, found = result.is_ok(), "Get");
                    let _ = respond_to.send(result);
                }
                StoreRequest::List { respond_to } => {
                    debug!(kind, size = self.records.len(), "List");
                    let _ = respond_to.send(Ok(self.listing(|_| true)));
                }
                StoreRequest::Search { query, respond_to } => {
                    let matches = self.listing(|record| record.matches_text(&query));
                    debug!(kind, %query, matches = matches.len(), "Search");
                    let _ = respond_to.send(Ok(matches));
                }
                StoreRequest::Update {
                    id,
                    fields,
                    respond_to,
                } => {
                    debug!(kind, %id, ?fields, "Update");
                    let result = self.update(id.clone(), &fields).map_err(rejected);
                    match &result {
                        Ok(_) => info!(kind, %id, "Updated"),
                        Err(e) => warn!(kind, %id, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete { id, respond_to } => {
                    debug!(kind, %id, "Delete");
                    let result = self.delete(&id);
                    match &result {
                        Ok(()) => info!(kind, %id, size = self.records.len(), "Deleted"),
                        Err(e) => warn!(kind, %id, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(kind, size = self.records.len(), "Shutdown");
    }

    fn create(&mut self, fields: &FormFields) -> Result<T, WorkflowError> {
        check_required::<T>(fields)?;
        let id: T::Id = self.next_id.into();
        let record = T::from_fields(id.clone(), fields)?;
        self.next_id += 1;
        self.order.push(id.clone());
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: &T::Id) -> Result<T, WorkflowError> {
        self.records
            .get(id)
            .cloned()
            .ok_or_else(|| WorkflowError::not_found(format!("{} {id}", T::KIND)))
    }

    fn update(&mut self, id: T::Id, fields: &FormFields) -> Result<T, WorkflowError> {
        if !self.records.contains_key(&id) {
            return Err(WorkflowError::not_found(format!("{} {id}", T::KIND)));
        }
        check_required::<T>(fields)?;
        let record = T::from_fields(id.clone(), fields)?;
        self.records.insert(id, record.clone());
        Ok(record)
    }

    fn delete(&mut self, id: &T::Id) -> Result<(), WorkflowError> {
        if self.records.remove(id).is_none() {
            return Err(WorkflowError::not_found(format!("{} {id}", T::KIND)));
        }
        self.order.retain(|stored| stored != id);
        Ok(())
    }

    fn listing(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .filter(|record| keep(record))
            .cloned()
            .collect()
    }
}

fn check_required<T: Resource>(fields: &FormFields) -> Result<(), WorkflowError> {
    let missing = fields.missing_required(T::schema());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(WorkflowError::validation(format!(
            "missing required fields: {}",
            missing.join(", ")
        )))
    }
}
