//! Vaccine inventory domain module.
//!
//! This crate contains the business rules for vaccine stock, implemented
//! purely as deterministic domain logic (no IO, no storage):
//!
//! - [`expiration`]: severity buckets from days until expiry;
//! - [`receipt`]: shipment reconciliation into inventory lots;
//! - [`ledger`]: administration and loss decrements;
//! - [`dashboard`] and [`query`]: read-side aggregates for the pages.

pub mod dashboard;
pub mod expiration;
pub mod ledger;
pub mod lot;
pub mod query;
pub mod receipt;
pub mod vaccine;

pub use dashboard::{CriticalAlert, DashboardStats, InventoryReport, ReportLine, ReportSummary};
pub use expiration::{ExpirationStatus, Severity, classify, classify_date, days_until_expiry};
pub use ledger::{
    AdministrationDraft, AdministrationRecord, Decrement, LossDraft, LossReason, LossRecord,
    LossReport, administer, decrement, ensure_positive, report_loss,
};
pub use lot::{InventoryLot, LotDraft, LotView, candidates};
pub use query::{InventoryQuery, SortField, SortOrder, families_in_stock};
pub use receipt::{
    InspectionCounts, Receipt, ReceiptCandidate, ReceiptDraft, ReconciledReceipt, parse_date,
    parse_quantity, reconcile,
};
pub use vaccine::{DEFAULT_ALERT_THRESHOLD, Vaccine, VaccineDraft, VaccineFamily};
