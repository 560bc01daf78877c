use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use vaxtrack_core::{CommandId, LotId, Record};
use vaxtrack_inventory::{
    AdministrationRecord, Decrement, InventoryLot, LossRecord, LossReport, administer,
    ensure_positive, report_loss,
};

use crate::backend::Backend;
use crate::repository::Repository;

use super::{ServiceResult, log_failure, roll_back};

/// Both records written by a ledger command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerOutcome<E> {
    pub event: E,
    pub lot: InventoryLot,
}

/// Draws doses out of lots for administrations and losses.
#[derive(Clone)]
pub struct LedgerService {
    lots: Arc<dyn Repository<InventoryLot>>,
    administrations: Arc<dyn Repository<AdministrationRecord>>,
    losses: Arc<dyn Repository<LossRecord>>,
}

impl LedgerService {
    pub fn new(backend: &Backend) -> Self {
        Self {
            lots: backend.lots.clone(),
            administrations: backend.administrations.clone(),
            losses: backend.losses.clone(),
        }
    }

    /// Record `doses` administered from a lot and reduce its stock.
    ///
    /// A non-positive dose count is rejected before the lot is read.
    pub async fn administer(
        &self,
        lot_id: LotId,
        doses: i64,
        administration_date: NaiveDate,
    ) -> ServiceResult<LedgerOutcome<AdministrationRecord>> {
        let command_id = CommandId::new();
        let result: ServiceResult<LedgerOutcome<AdministrationRecord>> = async {
            ensure_positive(doses)?;
            let lot = self.lots.get(lot_id).await?;
            let decrement = administer(&lot, doses, administration_date)?;
            self.commit(self.administrations.as_ref(), decrement, "administer", command_id)
                .await
        }
        .await;

        match &result {
            Ok(outcome) => tracing::info!(
                %command_id,
                %lot_id,
                administration_id = %outcome.event.id,
                doses,
                remaining = outcome.lot.quantity_on_hand,
                "doses administered"
            ),
            Err(err) => log_failure(command_id, "administer", err),
        }
        result
    }

    /// Record a loss against a lot and reduce its stock.
    ///
    /// Reason, details, the training acknowledgment and the quantity sign are
    /// checked before the lot is even read.
    pub async fn report_loss(
        &self,
        report: &LossReport,
    ) -> ServiceResult<LedgerOutcome<LossRecord>> {
        let command_id = CommandId::new();
        let result: ServiceResult<LedgerOutcome<LossRecord>> = async {
            report.ensure_complete()?;
            ensure_positive(report.quantity)?;
            let lot = self.lots.get(report.inventory_id).await?;
            let decrement = report_loss(&lot, report)?;
            self.commit(self.losses.as_ref(), decrement, "report_loss", command_id)
                .await
        }
        .await;

        match &result {
            Ok(outcome) => tracing::info!(
                %command_id,
                lot_id = %report.inventory_id,
                loss_id = %outcome.event.id,
                quantity = report.quantity,
                reason = outcome.event.reason.code(),
                remaining = outcome.lot.quantity_on_hand,
                "loss recorded"
            ),
            Err(err) => log_failure(command_id, "report_loss", err),
        }
        result
    }

    /// Write the event record, then the decremented lot; roll back the event
    /// record if the lot update fails.
    async fn commit<E: Record>(
        &self,
        events: &dyn Repository<E>,
        decrement: Decrement<E::Draft>,
        operation: &'static str,
        command_id: CommandId,
    ) -> ServiceResult<LedgerOutcome<E>> {
        let event = events.create(decrement.event).await?;
        match self.lots.update(decrement.lot).await {
            Ok(lot) => Ok(LedgerOutcome { event, lot }),
            Err(cause) => Err(roll_back(events, event.id(), operation, command_id, cause).await),
        }
    }
}
