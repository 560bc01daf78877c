use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use vaxtrack_core::{DomainError, DomainResult, Entity, LotId, Record, VaccineId};

use crate::expiration::{self, ExpirationStatus};
use crate::vaccine::Vaccine;

/// A received batch of one vaccine, tracked as a single on-hand counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryLot {
    pub id: LotId,
    pub vaccine_id: VaccineId,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub quantity_on_hand: i64,
    pub received_date: NaiveDate,
}

/// Lot as created from a reconciled receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotDraft {
    pub vaccine_id: VaccineId,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub quantity_on_hand: i64,
    pub received_date: NaiveDate,
}

impl InventoryLot {
    /// Exhausted lots stay on record but are no longer offered for
    /// administration or loss reporting.
    pub fn is_exhausted(&self) -> bool {
        self.quantity_on_hand <= 0
    }

    pub fn days_until_expiry(&self, now: DateTime<Utc>) -> i64 {
        expiration::days_until_expiry(expiration::expiration_instant(self.expiration_date), now)
    }

    pub fn expiration_status(&self, now: DateTime<Utc>) -> ExpirationStatus {
        expiration::classify_date(self.expiration_date, now)
    }

    /// Stored stock must never be negative; a negative value means a write
    /// raced past the ledger checks.
    pub fn ensure_consistent(&self) -> DomainResult<()> {
        if self.quantity_on_hand < 0 {
            return Err(DomainError::invariant(format!(
                "lot {} has negative quantity on hand ({})",
                self.id, self.quantity_on_hand
            )));
        }
        Ok(())
    }
}

impl Entity for InventoryLot {
    type Id = LotId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for InventoryLot {
    type Draft = LotDraft;

    const KIND: &'static str = "inventory lot";

    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self {
        Self {
            id,
            vaccine_id: draft.vaccine_id,
            lot_number: draft.lot_number,
            expiration_date: draft.expiration_date,
            quantity_on_hand: draft.quantity_on_hand,
            received_date: draft.received_date,
        }
    }
}

/// A lot joined with its catalog entry, as shown by every inventory page.
///
/// `vaccine` is `None` when the catalog entry has been deleted since the lot
/// was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotView {
    #[serde(flatten)]
    pub lot: InventoryLot,
    pub vaccine: Option<Vaccine>,
}

impl LotView {
    /// Join lots with the catalog. Unknown vaccine ids produce `vaccine: None`.
    pub fn enrich(lots: Vec<InventoryLot>, vaccines: &[Vaccine]) -> Vec<LotView> {
        lots.into_iter()
            .map(|lot| {
                let vaccine = vaccines.iter().find(|v| v.id == lot.vaccine_id).cloned();
                LotView { lot, vaccine }
            })
            .collect()
    }

    pub fn commercial_name(&self) -> &str {
        self.vaccine
            .as_ref()
            .map(|v| v.commercial_name.as_str())
            .unwrap_or("Unknown")
    }

    pub fn generic_name(&self) -> &str {
        self.vaccine
            .as_ref()
            .map(|v| v.generic_name.as_str())
            .unwrap_or("Unknown")
    }

    /// Low-stock threshold for this lot, falling back to `default_threshold`
    /// when the vaccine is unknown.
    pub fn alert_threshold(&self, default_threshold: i64) -> i64 {
        self.vaccine
            .as_ref()
            .map(|v| v.alert_threshold)
            .unwrap_or(default_threshold)
    }

    pub fn is_low_stock(&self, default_threshold: i64) -> bool {
        self.lot.quantity_on_hand <= self.alert_threshold(default_threshold)
    }

    /// Selection-list label, e.g. `"Fluzone - Lot: FZ-221 (40 available)"`.
    pub fn candidate_label(&self) -> String {
        format!(
            "{} - Lot: {} ({} available)",
            self.commercial_name(),
            self.lot.lot_number,
            self.lot.quantity_on_hand
        )
    }
}

/// Lots that can still be administered from or reported lost.
pub fn candidates(views: &[LotView]) -> Vec<&LotView> {
    views.iter().filter(|v| !v.lot.is_exhausted()).collect()
}
