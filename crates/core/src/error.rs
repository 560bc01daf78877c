//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// reconciliation, ledger rules). Transport and backend failures belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was missing or a value was malformed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Inspection counts do not add up to the quantity received.
    #[error(
        "reconciliation mismatch: passed + failed inspection must equal quantity received \
         (expected {expected}, got {actual})"
    )]
    ReconciliationMismatch { expected: i64, actual: i64 },

    /// Doses failed inspection but no discrepancy reason was given.
    #[error("discrepancy reason is required when doses fail inspection")]
    MissingDiscrepancyReason,

    /// A decrement asked for more doses than the lot holds.
    #[error("insufficient quantity: requested {requested}, on hand {on_hand}")]
    InsufficientQuantity { requested: i64, on_hand: i64 },

    /// A decrement quantity was zero or negative.
    #[error("invalid quantity: {0} (must be a positive number of doses)")]
    InvalidQuantity(i64),

    /// A loss report is missing one or more mandatory parts.
    #[error("incomplete loss report: missing {}", .0.join(", "))]
    IncompleteLossReport(Vec<String>),

    /// A domain invariant was violated (e.g. stored stock below zero).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A referenced record does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: u64 },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(entity: &'static str, id: u64) -> Self {
        Self::NotFound { entity, id }
    }

    /// Whether the error was raised by input checks, before anything could be
    /// written.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, Self::InvariantViolation(_) | Self::NotFound { .. })
    }
}
