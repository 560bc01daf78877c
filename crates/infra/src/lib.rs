//! Infrastructure layer: repositories, configuration, workflow services.

pub mod backend;
pub mod config;
pub mod repository;
pub mod services;


pub use backend::{Backend, InMemoryBackend};
pub use config::BackendConfig;
pub use repository::{InMemoryRepository, RepoOp, Repository, RepositoryError, RepositoryResult};
pub use services::{
    CatalogService, InventoryService, LedgerOutcome, LedgerService, ReceiptOutcome,
    ReceivingService, ServiceError, ServiceResult,
};
