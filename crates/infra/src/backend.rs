//! Repository wiring: one store per entity.

use std::sync::Arc;

use vaxtrack_inventory::{AdministrationRecord, InventoryLot, LossRecord, Receipt, Vaccine};

use crate::config::BackendConfig;
use crate::repository::{InMemoryRepository, Repository};

/// Handles to every entity store, as consumed by the services.
#[derive(Clone)]
pub struct Backend {
    pub vaccines: Arc<dyn Repository<Vaccine>>,
    pub lots: Arc<dyn Repository<InventoryLot>>,
    pub receipts: Arc<dyn Repository<Receipt>>,
    pub administrations: Arc<dyn Repository<AdministrationRecord>>,
    pub losses: Arc<dyn Repository<LossRecord>>,
}

/// In-memory stores with typed access for seeding and fault injection.
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    pub vaccines: Arc<InMemoryRepository<Vaccine>>,
    pub lots: Arc<InMemoryRepository<InventoryLot>>,
    pub receipts: Arc<InMemoryRepository<Receipt>>,
    pub administrations: Arc<InMemoryRepository<AdministrationRecord>>,
    pub losses: Arc<InMemoryRepository<LossRecord>>,
}

impl InMemoryBackend {
    pub fn new(config: &BackendConfig) -> Self {
        let latency = config.simulated_latency;
        Self {
            vaccines: Arc::new(InMemoryRepository::new().with_latency(latency)),
            lots: Arc::new(InMemoryRepository::new().with_latency(latency)),
            receipts: Arc::new(InMemoryRepository::new().with_latency(latency)),
            administrations: Arc::new(InMemoryRepository::new().with_latency(latency)),
            losses: Arc::new(InMemoryRepository::new().with_latency(latency)),
        }
    }

    pub fn backend(&self) -> Backend {
        Backend {
            vaccines: self.vaccines.clone(),
            lots: self.lots.clone(),
            receipts: self.receipts.clone(),
            administrations: self.administrations.clone(),
            losses: self.losses.clone(),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(&BackendConfig::default())
    }
}
