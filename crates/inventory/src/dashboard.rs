//! Dashboard and report aggregates.
//!
//! All expiration logic goes through [`crate::expiration`]; nothing here
//! compares dates directly.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use vaxtrack_core::LotId;

use crate::expiration::ExpirationStatus;
use crate::ledger::AdministrationRecord;
use crate::lot::LotView;

/// A lot that is expired or inside the critical window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CriticalAlert {
    pub lot_id: LotId,
    pub vaccine_name: String,
    pub lot_number: String,
    pub quantity_on_hand: i64,
    pub days_until_expiry: i64,
    pub status: ExpirationStatus,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_doses: i64,
    pub total_administered: i64,
    /// Doses on hand in lots expiring within 30 days (not yet expired).
    pub expiring_soon_doses: i64,
    pub expired_doses: i64,
    pub low_stock_lots: usize,
    pub active_lots: usize,
    /// Share of all doses (administered + on hand) that were administered.
    pub utilization_percent: u32,
    /// Most urgent first.
    pub critical_alerts: Vec<CriticalAlert>,
}

pub fn total_doses(views: &[LotView]) -> i64 {
    views
        .iter()
        .fold(0, |sum: i64, v| sum.saturating_add(v.lot.quantity_on_hand))
}

pub fn total_administered(administrations: &[AdministrationRecord]) -> i64 {
    administrations
        .iter()
        .fold(0, |sum: i64, a| sum.saturating_add(a.doses_administered))
}

pub fn active_lots(views: &[LotView]) -> usize {
    views.iter().filter(|v| !v.lot.is_exhausted()).count()
}

/// Negative stock left by a racing decrement counts as empty.
fn utilization_percent(administered: i64, on_hand: i64) -> u32 {
    if administered <= 0 {
        return 0;
    }
    let total = administered.saturating_add(on_hand.max(0)) as f64;
    ((administered as f64 / total) * 100.0).round() as u32
}

impl DashboardStats {
    pub fn compute(
        views: &[LotView],
        administrations: &[AdministrationRecord],
        now: DateTime<Utc>,
        default_threshold: i64,
    ) -> Self {
        let mut expiring_soon_doses: i64 = 0;
        let mut expired_doses: i64 = 0;
        let mut critical_alerts = Vec::new();

        for view in views {
            let days = view.lot.days_until_expiry(now);
            let status = ExpirationStatus::from_days(days);
            match status {
                ExpirationStatus::Expired => {
                    expired_doses = expired_doses.saturating_add(view.lot.quantity_on_hand);
                }
                s if s.is_expiring_soon() => {
                    expiring_soon_doses =
                        expiring_soon_doses.saturating_add(view.lot.quantity_on_hand);
                }
                _ => {}
            }
            if status.needs_attention() {
                critical_alerts.push(CriticalAlert {
                    lot_id: view.lot.id,
                    vaccine_name: view.commercial_name().to_string(),
                    lot_number: view.lot.lot_number.clone(),
                    quantity_on_hand: view.lot.quantity_on_hand,
                    days_until_expiry: days,
                    status,
                });
            }
        }
        critical_alerts.sort_by_key(|a| (a.days_until_expiry, a.lot_id));

        let total_doses = total_doses(views);
        let total_administered = total_administered(administrations);

        DashboardStats {
            total_doses,
            total_administered,
            expiring_soon_doses,
            expired_doses,
            low_stock_lots: views
                .iter()
                .filter(|v| v.is_low_stock(default_threshold))
                .count(),
            active_lots: active_lots(views),
            utilization_percent: utilization_percent(total_administered, total_doses),
            critical_alerts,
        }
    }
}

/// Report summary block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_doses: i64,
    pub total_administered: i64,
    pub active_lots: usize,
    pub expired_lots: usize,
    pub expiring_lots: usize,
}

/// One row of the printed inventory status table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLine {
    pub lot_id: LotId,
    pub vaccine_name: String,
    pub generic_name: String,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub quantity_on_hand: i64,
    pub days_until_expiry: i64,
    pub status: ExpirationStatus,
}

/// Point-in-time inventory report, exportable as JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    pub timestamp: DateTime<Utc>,
    pub summary: ReportSummary,
    pub lines: Vec<ReportLine>,
    pub inventory: Vec<LotView>,
    pub administrations: Vec<AdministrationRecord>,
}

impl InventoryReport {
    pub fn generate(
        views: Vec<LotView>,
        administrations: Vec<AdministrationRecord>,
        now: DateTime<Utc>,
    ) -> Self {
        let lines: Vec<ReportLine> = views
            .iter()
            .map(|view| {
                let days = view.lot.days_until_expiry(now);
                ReportLine {
                    lot_id: view.lot.id,
                    vaccine_name: view.commercial_name().to_string(),
                    generic_name: view.generic_name().to_string(),
                    lot_number: view.lot.lot_number.clone(),
                    expiration_date: view.lot.expiration_date,
                    quantity_on_hand: view.lot.quantity_on_hand,
                    days_until_expiry: days,
                    status: ExpirationStatus::from_days(days),
                }
            })
            .collect();

        let summary = ReportSummary {
            total_doses: total_doses(&views),
            total_administered: total_administered(&administrations),
            active_lots: active_lots(&views),
            expired_lots: lines
                .iter()
                .filter(|l| l.status == ExpirationStatus::Expired)
                .count(),
            expiring_lots: lines.iter().filter(|l| l.status.is_expiring_soon()).count(),
        };

        InventoryReport {
            timestamp: now,
            summary,
            lines,
            inventory: views,
            administrations,
        }
    }

    /// Download file name, e.g. `vaccine-inventory-report-2026-10-17.json`.
    pub fn file_name(&self) -> String {
        format!(
            "vaccine-inventory-report-{}.json",
            self.timestamp.format("%Y-%m-%d")
        )
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
