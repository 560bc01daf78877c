//! Workflow services: domain rules composed with persistence.
//!
//! Each user action runs as one sequential chain of repository calls:
//!
//! ```text
//! input
//!   ↓
//! 1. Read current records (lot, catalog)
//!   ↓
//! 2. Apply pure rules (reconcile / decrement), rejecting before any write
//!   ↓
//! 3. First write (receipt / event record)
//!   ↓
//! 4. Second write (lot creation / lot update)
//!   ↓ on failure
//! 5. Compensate: delete the first write, return the original error
//! ```
//!
//! If the compensating delete fails as well, the inconsistency is reported as
//! [`ServiceError::CompensationFailed`] and logged at error level. User actions
//! are never retried automatically.
//!
//! There is no locking between sessions: two operators drawing from the same
//! lot each validate against the quantity they read, and the last update wins.

pub mod catalog;
pub mod inventory;
pub mod ledger;
pub mod receiving;

pub use catalog::CatalogService;
pub use inventory::InventoryService;
pub use ledger::{LedgerOutcome, LedgerService};
pub use receiving::{ReceiptOutcome, ReceivingService};

use thiserror::Error;

use vaxtrack_core::{CommandId, DomainError, Record};

use crate::repository::{Repository, RepositoryError};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced to the caller of a workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Rejected by domain rules; nothing was written.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Transport or backend failure.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A second write failed and so did the rollback of the first one.
    #[error(
        "{operation} left a partial write: {cause}; rollback of {entity} {id} failed: {rollback}"
    )]
    CompensationFailed {
        operation: &'static str,
        entity: &'static str,
        id: u64,
        cause: String,
        rollback: String,
    },
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound { entity, id } => {
                ServiceError::Domain(DomainError::not_found(entity, id))
            }
            RepositoryError::BackendUnavailable(msg) => ServiceError::BackendUnavailable(msg),
        }
    }
}

impl ServiceError {
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            ServiceError::Domain(e) => Some(e),
            _ => None,
        }
    }

    /// Whether nothing was persisted before the error.
    pub fn is_rejection(&self) -> bool {
        self.domain().is_some_and(DomainError::is_rejection)
    }
}

/// Undo the first write of a two-phase command after the second one failed.
pub(crate) async fn roll_back<T: Record>(
    repo: &dyn Repository<T>,
    id: T::Id,
    operation: &'static str,
    command_id: CommandId,
    cause: RepositoryError,
) -> ServiceError {
    match repo.delete(id).await {
        Ok(()) => {
            tracing::warn!(
                %command_id,
                operation,
                entity = T::KIND,
                %id,
                error = %cause,
                "second write failed, first write rolled back"
            );
            cause.into()
        }
        Err(rollback) => {
            tracing::error!(
                %command_id,
                operation,
                entity = T::KIND,
                %id,
                error = %cause,
                rollback_error = %rollback,
                "rollback failed, backend left inconsistent"
            );
            ServiceError::CompensationFailed {
                operation,
                entity: T::KIND,
                id: id.into(),
                cause: cause.to_string(),
                rollback: rollback.to_string(),
            }
        }
    }
}

/// Log a rejected or failed command before returning its error.
pub(crate) fn log_failure(command_id: CommandId, operation: &'static str, err: &ServiceError) {
    if err.is_rejection() {
        tracing::warn!(%command_id, operation, error = %err, "command rejected");
    } else {
        tracing::error!(%command_id, operation, error = %err, "command failed");
    }
}
