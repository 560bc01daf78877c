//! Persistence seam over the record backend.
//!
//! Every entity is stored through the same generic create/get/list/update/delete
//! interface keyed by integer identity. The domain crate never sees this
//! trait; services compose it with the pure rules.

mod in_memory;

pub use in_memory::{InMemoryRepository, RepoOp};

use async_trait::async_trait;
use thiserror::Error;

use vaxtrack_core::Record;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Backend error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },

    /// Transport or backend failure; the operation may not have been applied.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl RepositoryError {
    pub fn not_found<T: Record>(id: T::Id) -> Self {
        Self::NotFound {
            entity: T::KIND,
            id: id.into(),
        }
    }

    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }
}

/// Generic record store for one entity type.
#[async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Persist a new record; the backend assigns its identity.
    async fn create(&self, draft: T::Draft) -> RepositoryResult<T>;

    async fn get(&self, id: T::Id) -> RepositoryResult<T>;

    async fn list(&self) -> RepositoryResult<Vec<T>>;

    /// Replace a stored record. Fails with `NotFound` if it does not exist.
    async fn update(&self, record: T) -> RepositoryResult<T>;

    async fn delete(&self, id: T::Id) -> RepositoryResult<()>;
}
