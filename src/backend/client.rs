//! # Store Client
//!
//! Cloneable handle to a [`StoreActor`](super::StoreActor). It implements
//! [`ResourceService`] so a workflow engine can run against it directly.

use crate::backend::{Response, StoreError, StoreRequest};
use crate::framework::{FormFields, Resource, ResourceService, WorkflowError};
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::instrument;

pub struct StoreClient<T: Resource> {
    sender: mpsc::Sender<StoreRequest<T>>,
}

impl<T: Resource> Clone for StoreClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Resource> StoreClient<T> {
    pub fn new(sender: mpsc::Sender<StoreRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<V>(
        &self,
        build: impl FnOnce(Response<V>) -> StoreRequest<T> + Send,
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
impl<T: Resource> ResourceService<T> for StoreClient<T> {
    #[instrument(skip(self, fields), fields(kind = T::KIND))]
    async fn create(&self, fields: FormFields) -> Result<T, WorkflowError> {
        self.call(|respond_to| StoreRequest::Create { fields, respond_to })
            .await
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn find_by_id(&self, id: T::Id) -> Result<T, WorkflowError> {
        self.call(|respond_to| StoreRequest::Get { id, respond_to })
            .await
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn find_all(&self) -> Result<Vec<T>, WorkflowError> {
        self.call(|respond_to| StoreRequest::List { respond_to })
            .await
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn find_by_text(&self, query: String) -> Result<Vec<T>, WorkflowError> {
        self.call(|respond_to| StoreRequest::Search { query, respond_to })
            .await
    }

    #[instrument(skip(self, fields), fields(kind = T::KIND))]
    async fn update(&self, id: T::Id, fields: FormFields) -> Result<T, WorkflowError> {
        self.call(|respond_to| StoreRequest::Update {
            id,
            fields,
            respond_to,
        })
        .await
    }

    #[instrument(skip(self), fields(kind = T::KIND))]
    async fn delete(&self, id: T::Id) -> Result<(), WorkflowError> {
        self.call(|respond_to| StoreRequest::Delete { id, respond_to })
            .await
    }
}
