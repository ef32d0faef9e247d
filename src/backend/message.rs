//! # Store Messages
//!
//! Requests a [`StoreClient`](super::StoreClient) sends to its
//! [`StoreActor`](super::StoreActor). One variant per
//! [`ResourceService`](crate::framework::ResourceService) operation, each carrying a
//! oneshot sender for the reply.

use crate::framework::{FormFields, Resource, WorkflowError};
use tokio::sync::oneshot;

/// One-shot reply channel used by every store request.
pub type Response<T> = oneshot::Sender<Result<T, WorkflowError>>;

#[derive(Debug)]
pub enum StoreRequest<T: Resource> {
    Create {
        fields: FormFields,
        respond_to: Response<T>,
    },
    Get {
        id: T::Id,
        respond_to: Response<T>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Search {
        query: String,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        fields: FormFields,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
}
