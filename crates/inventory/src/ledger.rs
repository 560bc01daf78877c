//! Quantity ledger: administration and loss events that draw down a lot.
//!
//! Functions here are pure. They validate a decrement against the lot as it
//! was read and return both writes the caller has to persist: the event record
//! and the lot with its reduced on-hand quantity.

use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vaxtrack_core::{AdministrationId, DomainError, DomainResult, Entity, LossId, LotId, Record};

use crate::lot::InventoryLot;

/// Doses given to patients from one lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationRecord {
    pub id: AdministrationId,
    pub inventory_id: LotId,
    pub doses_administered: i64,
    pub administration_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdministrationDraft {
    pub inventory_id: LotId,
    pub doses_administered: i64,
    pub administration_date: NaiveDate,
}

impl Entity for AdministrationRecord {
    type Id = AdministrationId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for AdministrationRecord {
    type Draft = AdministrationDraft;

    const KIND: &'static str = "administration";

    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self {
        Self {
            id,
            inventory_id: draft.inventory_id,
            doses_administered: draft.doses_administered,
            administration_date: draft.administration_date,
        }
    }
}

/// Why doses were written off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LossReason {
    Expired,
    Damaged,
    Temperature,
    Contamination,
    BrokenVial,
    DrawingError,
    Other,
}

impl LossReason {
    pub const ALL: [LossReason; 7] = [
        LossReason::Expired,
        LossReason::Damaged,
        LossReason::Temperature,
        LossReason::Contamination,
        LossReason::BrokenVial,
        LossReason::DrawingError,
        LossReason::Other,
    ];

    /// Stored value (`"broken-vial"`, ...).
    pub fn code(self) -> &'static str {
        match self {
            LossReason::Expired => "expired",
            LossReason::Damaged => "damaged",
            LossReason::Temperature => "temperature",
            LossReason::Contamination => "contamination",
            LossReason::BrokenVial => "broken-vial",
            LossReason::DrawingError => "drawing-error",
            LossReason::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LossReason::Expired => "Expired",
            LossReason::Damaged => "Damaged during transport",
            LossReason::Temperature => "Temperature excursion",
            LossReason::Contamination => "Contamination",
            LossReason::BrokenVial => "Broken vial",
            LossReason::DrawingError => "Drawing error",
            LossReason::Other => "Other",
        }
    }
}

impl FromStr for LossReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        LossReason::ALL
            .into_iter()
            .find(|reason| reason.code() == s)
            .ok_or_else(|| DomainError::validation(format!("unknown loss reason: {s:?}")))
    }
}

/// Doses written off from one lot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossRecord {
    pub id: LossId,
    pub inventory_id: LotId,
    pub quantity: i64,
    pub reason: LossReason,
    pub details: String,
    pub report_date: NaiveDate,
    pub training_acknowledged: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossDraft {
    pub inventory_id: LotId,
    pub quantity: i64,
    pub reason: LossReason,
    pub details: String,
    pub report_date: NaiveDate,
    pub training_acknowledged: bool,
}

impl Entity for LossRecord {
    type Id = LossId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for LossRecord {
    type Draft = LossDraft;

    const KIND: &'static str = "loss";

    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self {
        Self {
            id,
            inventory_id: draft.inventory_id,
            quantity: draft.quantity,
            reason: draft.reason,
            details: draft.details,
            report_date: draft.report_date,
            training_acknowledged: draft.training_acknowledged,
        }
    }
}

/// Loss report as submitted from the loss form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LossReport {
    pub inventory_id: LotId,
    pub quantity: i64,
    pub reason: Option<LossReason>,
    pub details: String,
    pub report_date: NaiveDate,
    pub training_acknowledged: bool,
}

impl LossReport {
    /// Reason, details and acknowledgment are mandatory regardless of the
    /// quantity reported.
    pub fn ensure_complete(&self) -> DomainResult<LossReason> {
        let mut missing = Vec::new();
        if self.reason.is_none() {
            missing.push("reason".to_string());
        }
        if self.details.trim().is_empty() {
            missing.push("details".to_string());
        }
        if !self.training_acknowledged {
            missing.push("training acknowledgment".to_string());
        }

        match self.reason {
            Some(reason) if missing.is_empty() => Ok(reason),
            _ => Err(DomainError::IncompleteLossReport(missing)),
        }
    }
}

/// Both writes of a ledger event: the record to create and the lot to store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decrement<E> {
    pub event: E,
    pub lot: InventoryLot,
}

/// Reject a dose count that could never be drawn from any lot.
pub fn ensure_positive(n: i64) -> DomainResult<()> {
    if n <= 0 {
        return Err(DomainError::InvalidQuantity(n));
    }
    Ok(())
}

/// Take `n` doses out of `lot`.
///
/// Fails with `InvalidQuantity` when `n <= 0` and `InsufficientQuantity` when
/// `n` exceeds the on-hand count; `lot` is never modified.
pub fn decrement(lot: &InventoryLot, n: i64) -> DomainResult<InventoryLot> {
    ensure_positive(n)?;
    lot.ensure_consistent()?;
    if n > lot.quantity_on_hand {
        return Err(DomainError::InsufficientQuantity {
            requested: n,
            on_hand: lot.quantity_on_hand,
        });
    }

    let mut next = lot.clone();
    next.quantity_on_hand -= n;
    Ok(next)
}

pub fn administer(
    lot: &InventoryLot,
    doses: i64,
    administration_date: NaiveDate,
) -> DomainResult<Decrement<AdministrationDraft>> {
    let next = decrement(lot, doses)?;
    Ok(Decrement {
        event: AdministrationDraft {
            inventory_id: lot.id,
            doses_administered: doses,
            administration_date,
        },
        lot: next,
    })
}

pub fn report_loss(lot: &InventoryLot, report: &LossReport) -> DomainResult<Decrement<LossDraft>> {
    let reason = report.ensure_complete()?;
    if report.inventory_id != lot.id {
        return Err(DomainError::invariant("inventory_id mismatch"));
    }
    let next = decrement(lot, report.quantity)?;
    Ok(Decrement {
        event: LossDraft {
            inventory_id: lot.id,
            quantity: report.quantity,
            reason,
            details: report.details.trim().to_string(),
            report_date: report.report_date,
            training_acknowledged: true,
        },
        lot: next,
    })
}
