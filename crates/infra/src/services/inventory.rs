use std::sync::Arc;

use chrono::{DateTime, Utc};

use vaxtrack_core::LotId;
use vaxtrack_inventory::{
    AdministrationRecord, DashboardStats, InventoryLot, InventoryQuery, InventoryReport,
    LossRecord, LotView, Vaccine,
};

use crate::backend::Backend;
use crate::config::BackendConfig;
use crate::repository::Repository;

use super::ServiceResult;

/// Read side: inventory tables, candidate lists, dashboard and reports.
#[derive(Clone)]
pub struct InventoryService {
    vaccines: Arc<dyn Repository<Vaccine>>,
    lots: Arc<dyn Repository<InventoryLot>>,
    administrations: Arc<dyn Repository<AdministrationRecord>>,
    losses: Arc<dyn Repository<LossRecord>>,
    default_alert_threshold: i64,
}

impl InventoryService {
    pub fn new(backend: &Backend, config: &BackendConfig) -> Self {
        Self {
            vaccines: backend.vaccines.clone(),
            lots: backend.lots.clone(),
            administrations: backend.administrations.clone(),
            losses: backend.losses.clone(),
            default_alert_threshold: config.default_alert_threshold,
        }
    }

    /// Every lot joined with its vaccine, exhausted lots included.
    pub async fn lot_views(&self) -> ServiceResult<Vec<LotView>> {
        let (lots, vaccines) = tokio::try_join!(self.lots.list(), self.vaccines.list())?;
        Ok(LotView::enrich(lots, &vaccines))
    }

    pub async fn lot_view(&self, id: LotId) -> ServiceResult<LotView> {
        let (lot, vaccines) = tokio::try_join!(self.lots.get(id), self.vaccines.list())?;
        Ok(LotView::enrich(vec![lot], &vaccines).remove(0))
    }

    /// Lots that still have doses to administer or report lost.
    pub async fn candidates(&self) -> ServiceResult<Vec<LotView>> {
        let mut views = self.lot_views().await?;
        views.retain(|v| !v.lot.is_exhausted());
        Ok(views)
    }

    /// Inventory table rows for the given search/filter/sort.
    pub async fn search(&self, query: &InventoryQuery) -> ServiceResult<Vec<LotView>> {
        let views = self.lot_views().await?;
        Ok(query.apply(&views).into_iter().cloned().collect())
    }

    pub async fn administrations(&self) -> ServiceResult<Vec<AdministrationRecord>> {
        Ok(self.administrations.list().await?)
    }

    pub async fn losses(&self) -> ServiceResult<Vec<LossRecord>> {
        Ok(self.losses.list().await?)
    }

    pub async fn dashboard(&self, now: DateTime<Utc>) -> ServiceResult<DashboardStats> {
        let (views, administrations) =
            tokio::try_join!(self.lot_views(), self.administrations())?;
        Ok(DashboardStats::compute(
            &views,
            &administrations,
            now,
            self.default_alert_threshold,
        ))
    }

    pub async fn report(&self, now: DateTime<Utc>) -> ServiceResult<InventoryReport> {
        let (views, administrations) =
            tokio::try_join!(self.lot_views(), self.administrations())?;
        Ok(InventoryReport::generate(views, administrations, now))
    }

    /// Remove a lot record (inventory page). Its event history is kept.
    pub async fn delete_lot(&self, id: LotId) -> ServiceResult<()> {
        self.lots.delete(id).await?;
        tracing::info!(lot_id = %id, "inventory lot deleted");
        Ok(())
    }
}
