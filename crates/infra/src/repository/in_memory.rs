use std::collections::BTreeMap;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use vaxtrack_core::Record;

use super::{Repository, RepositoryError, RepositoryResult};

/// Repository operation, used to target injected faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepoOp {
    Create,
    Get,
    List,
    Update,
    Delete,
}

/// In-memory record store standing in for the hosted backend.
///
/// Identities are assigned as `max(existing) + 1`, reads return copies, and
/// every call can be delayed to mimic a network round trip. Faults can be
/// queued to exercise partial-failure paths.
#[derive(Debug)]
pub struct InMemoryRepository<T: Record> {
    inner: RwLock<BTreeMap<u64, T>>,
    latency: Duration,
    faults: Mutex<Vec<RepoOp>>,
}

impl<T: Record> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(BTreeMap::new()),
            latency: Duration::ZERO,
            faults: Mutex::new(Vec::new()),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Seed the store with existing records (fixtures, tests).
    pub fn with_records(self, records: impl IntoIterator<Item = T>) -> Self {
        if let Ok(mut map) = self.inner.write() {
            for record in records {
                map.insert(record.id().into(), record);
            }
        }
        self
    }

    /// Make the next call of `op` fail with `BackendUnavailable`.
    pub fn fail_next(&self, op: RepoOp) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.push(op);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    async fn round_trip(&self, op: RepoOp) -> RepositoryResult<()> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut faults = self
            .faults
            .lock()
            .map_err(|_| RepositoryError::unavailable("fault queue poisoned"))?;
        if let Some(pos) = faults.iter().position(|f| *f == op) {
            faults.remove(pos);
            return Err(RepositoryError::unavailable(format!(
                "injected {op:?} failure on {}",
                T::KIND
            )));
        }
        Ok(())
    }
}

impl<T: Record> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> RepositoryError {
    RepositoryError::unavailable("store lock poisoned")
}

#[async_trait]
impl<T: Record> Repository<T> for InMemoryRepository<T> {
    async fn create(&self, draft: T::Draft) -> RepositoryResult<T> {
        self.round_trip(RepoOp::Create).await?;
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let next_id = map.keys().next_back().copied().unwrap_or(0) + 1;
        let record = T::from_draft(T::Id::from(next_id), draft);
        map.insert(next_id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: T::Id) -> RepositoryResult<T> {
        self.round_trip(RepoOp::Get).await?;
        let key: u64 = id.into();
        let map = self.inner.read().map_err(|_| poisoned())?;
        map.get(&key)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found::<T>(id))
    }

    async fn list(&self) -> RepositoryResult<Vec<T>> {
        self.round_trip(RepoOp::List).await?;
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    async fn update(&self, record: T) -> RepositoryResult<T> {
        self.round_trip(RepoOp::Update).await?;
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let id = record.id();
        let key: u64 = id.into();
        match map.get_mut(&key) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(RepositoryError::not_found::<T>(id)),
        }
    }

    async fn delete(&self, id: T::Id) -> RepositoryResult<()> {
        self.round_trip(RepoOp::Delete).await?;
        let key: u64 = id.into();
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(&key)
            .map(|_| ())
            .ok_or_else(|| RepositoryError::not_found::<T>(id))
    }
}
