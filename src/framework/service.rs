//! # ResourceService Trait
//!
//! The only collaborator the workflow engine depends on. The engine does not know or care
//! about the transport. A deployed console would talk HTTP+JSON here; tests and the demo use
//! the in-memory [`StoreClient`](crate::backend::StoreClient).

use crate::framework::{FormFields, Resource, WorkflowError};
use async_trait::async_trait;

/// Server-side operations for one resource type.
#[async_trait]
pub trait ResourceService<T: Resource>: Send + Sync {
    /// Creates a record from form values. Errors: `Validation`, `ConflictOrConstraint`, `Server`.
    async fn create(&self, fields: FormFields) -> Result<T, WorkflowError>;

    /// Errors: `NotFound`, `Server`.
    async fn find_by_id(&self, id: T::Id) -> Result<T, WorkflowError>;

    async fn find_all(&self) -> Result<Vec<T>, WorkflowError>;

    /// Full-text search. The server decides which fields qualify.
    async fn find_by_text(&self, query: String) -> Result<Vec<T>, WorkflowError>;

    /// Errors: `NotFound`, `Validation`, `Server`.
    async fn update(&self, id: T::Id, fields: FormFields) -> Result<T, WorkflowError>;

    /// Not idempotent: deleting a missing id is `NotFound`.
    async fn delete(&self, id: T::Id) -> Result<(), WorkflowError>;
}
