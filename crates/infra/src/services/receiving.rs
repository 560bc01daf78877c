use std::sync::Arc;

use serde::Serialize;

use vaxtrack_core::CommandId;
use vaxtrack_inventory::{InventoryLot, Receipt, ReceiptCandidate, reconcile};

use crate::backend::Backend;
use crate::repository::Repository;

use super::{ServiceResult, log_failure, roll_back};

/// What a successful receipt persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptOutcome {
    pub receipt: Receipt,
    /// `None` when every dose failed inspection.
    pub lot: Option<InventoryLot>,
}

/// Records incoming shipments and turns accepted doses into stock.
#[derive(Clone)]
pub struct ReceivingService {
    receipts: Arc<dyn Repository<Receipt>>,
    lots: Arc<dyn Repository<InventoryLot>>,
}

impl ReceivingService {
    pub fn new(backend: &Backend) -> Self {
        Self {
            receipts: backend.receipts.clone(),
            lots: backend.lots.clone(),
        }
    }

    /// Reconcile and persist a receipt, then create the lot for the doses
    /// that passed inspection.
    ///
    /// If the lot cannot be created the receipt is deleted again, so a
    /// shipment is either fully recorded or not at all.
    pub async fn receive(&self, candidate: &ReceiptCandidate) -> ServiceResult<ReceiptOutcome> {
        let command_id = CommandId::new();

        let result = self.receive_inner(command_id, candidate).await;
        if let Err(err) = &result {
            log_failure(command_id, "receive", err);
        }
        result
    }

    async fn receive_inner(
        &self,
        command_id: CommandId,
        candidate: &ReceiptCandidate,
    ) -> ServiceResult<ReceiptOutcome> {
        let reconciled = reconcile(candidate)?;

        let receipt = self.receipts.create(reconciled.receipt).await?;

        let lot = match reconciled.lot {
            None => {
                tracing::info!(
                    %command_id,
                    receipt_id = %receipt.id,
                    failed = receipt.failed_inspection,
                    "no doses passed inspection, no lot created"
                );
                None
            }
            Some(draft) => match self.lots.create(draft).await {
                Ok(lot) => Some(lot),
                Err(cause) => {
                    return Err(roll_back(
                        self.receipts.as_ref(),
                        receipt.id,
                        "receive",
                        command_id,
                        cause,
                    )
                    .await);
                }
            },
        };

        tracing::info!(
            %command_id,
            receipt_id = %receipt.id,
            lot_id = lot.as_ref().map(|l| l.id.get()),
            received = receipt.quantity_received,
            passed = receipt.passed_inspection,
            "shipment received"
        );

        Ok(ReceiptOutcome { receipt, lot })
    }
}
