//! # Session Client
//!
//! Cloneable handle the view layer uses to drive a [`SessionActor`](super::SessionActor).

use crate::framework::{ModeKind, Resource, ScreenSnapshot, SearchMode, WorkflowError};
use crate::session::{SessionEvent, SubmitReceipt};
use tokio::sync::{mpsc, oneshot};

pub struct SessionClient<T: Resource> {
    sender: mpsc::Sender<SessionEvent<T>>,
}

impl<T: Resource> Clone for SessionClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<T: Resource> SessionClient<T> {
    pub fn new(sender: mpsc::Sender<SessionEvent<T>>) -> Self {
        Self { sender }
    }

    async fn send<V>(
        &self,
        build: impl FnOnce(oneshot::Sender<V>) -> SessionEvent<T>,
    ) -> Result<V, WorkflowError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| closed())?;
        response.await.map_err(|_| closed())
    }

    pub async fn select_mode(&self, kind: ModeKind) -> Result<(), WorkflowError> {
        self.send(|respond_to| SessionEvent::SelectMode { kind, respond_to })
            .await
    }

    pub async fn set_field(
        &self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), WorkflowError> {
        let (name, value) = (name.into(), value.into());
        self.send(|respond_to| SessionEvent::SetField {
            name,
            value,
            respond_to,
        })
        .await?
    }

    pub async fn set_search_mode(&self, search_mode: SearchMode) -> Result<(), WorkflowError> {
        self.send(|respond_to| SessionEvent::SetSearchMode {
            search_mode,
            respond_to,
        })
        .await?
    }

    pub async fn set_query(&self, query: impl Into<String>) -> Result<(), WorkflowError> {
        let query = query.into();
        self.send(|respond_to| SessionEvent::SetQuery { query, respond_to })
            .await?
    }

    /// Submits the current form. Returns as soon as the request is issued, ignored or
    /// rejected; use [`settle`](Self::settle) to wait for its result.
    pub async fn submit(&self) -> Result<SubmitReceipt, WorkflowError> {
        self.send(|respond_to| SessionEvent::Submit { respond_to })
            .await
    }

    pub async fn cancel(&self) -> Result<(), WorkflowError> {
        self.send(|respond_to| SessionEvent::Cancel { respond_to })
            .await
    }

    pub async fn snapshot(&self) -> Result<ScreenSnapshot<T>, WorkflowError> {
        self.send(|respond_to| SessionEvent::Snapshot { respond_to })
            .await
    }

    /// Waits until no request is outstanding and returns the resulting screen.
    pub async fn settle(&self) -> Result<ScreenSnapshot<T>, WorkflowError> {
        self.send(|respond_to| SessionEvent::Settle { respond_to })
            .await
    }
}

fn closed() -> WorkflowError {
    WorkflowError::Network("session closed".into())
}
