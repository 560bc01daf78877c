//! Shipment receipts and their reconciliation into inventory lots.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use vaxtrack_core::{DomainError, DomainResult, Entity, ReceiptId, Record, VaccineId};

use crate::lot::LotDraft;

/// Recorded shipment receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: ReceiptId,
    pub vaccine_id: VaccineId,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub quantity_sent: i64,
    pub quantity_received: i64,
    pub passed_inspection: i64,
    pub failed_inspection: i64,
    pub discrepancy_reason: Option<String>,
    pub received_date: NaiveDate,
}

/// Receipt as persisted after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptDraft {
    pub vaccine_id: VaccineId,
    pub lot_number: String,
    pub expiration_date: NaiveDate,
    pub quantity_sent: i64,
    pub quantity_received: i64,
    pub passed_inspection: i64,
    pub failed_inspection: i64,
    pub discrepancy_reason: Option<String>,
    pub received_date: NaiveDate,
}

impl Entity for Receipt {
    type Id = ReceiptId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl Record for Receipt {
    type Draft = ReceiptDraft;

    const KIND: &'static str = "receipt";

    fn from_draft(id: Self::Id, draft: Self::Draft) -> Self {
        Self {
            id,
            vaccine_id: draft.vaccine_id,
            lot_number: draft.lot_number,
            expiration_date: draft.expiration_date,
            quantity_sent: draft.quantity_sent,
            quantity_received: draft.quantity_received,
            passed_inspection: draft.passed_inspection,
            failed_inspection: draft.failed_inspection,
            discrepancy_reason: draft.discrepancy_reason,
            received_date: draft.received_date,
        }
    }
}

/// Receipt as entered on the receiving form, before any checks.
///
/// Numeric fields are `None` when the form left them blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptCandidate {
    pub vaccine_id: Option<VaccineId>,
    pub lot_number: String,
    pub quantity_sent: Option<i64>,
    pub quantity_received: Option<i64>,
    pub passed_inspection: Option<i64>,
    pub failed_inspection: Option<i64>,
    pub discrepancy_reason: Option<String>,
    pub expiration_date: Option<NaiveDate>,
    pub received_date: NaiveDate,
}

/// Outcome of a successful reconciliation: what to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledReceipt {
    pub receipt: ReceiptDraft,
    /// Lot holding the doses that passed inspection. `None` when every dose
    /// was rejected.
    pub lot: Option<LotDraft>,
}

fn required<T>(value: Option<T>, field: &str) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::validation(format!("{field} is required")))
}

fn non_negative(value: i64, field: &str) -> DomainResult<i64> {
    if value < 0 {
        return Err(DomainError::validation(format!("{field} cannot be negative")));
    }
    Ok(value)
}

/// Validate a receipt candidate and derive the lot it creates.
///
/// Checks run in a fixed order: required fields, then the inspection sum,
/// then the discrepancy reason.
pub fn reconcile(candidate: &ReceiptCandidate) -> DomainResult<ReconciledReceipt> {
    let vaccine_id = required(candidate.vaccine_id, "vaccine")?;
    let lot_number = candidate.lot_number.trim();
    if lot_number.is_empty() {
        return Err(DomainError::validation("lot number is required"));
    }
    let quantity_sent = non_negative(
        required(candidate.quantity_sent, "quantity sent")?,
        "quantity sent",
    )?;
    let quantity_received = non_negative(
        required(candidate.quantity_received, "quantity received")?,
        "quantity received",
    )?;
    let passed = non_negative(
        required(candidate.passed_inspection, "passed inspection count")?,
        "passed inspection count",
    )?;
    let failed = non_negative(
        required(candidate.failed_inspection, "failed inspection count")?,
        "failed inspection count",
    )?;
    let expiration_date = required(candidate.expiration_date, "expiration date")?;

    // A sum past i64::MAX can never equal a representable received count.
    match passed.checked_add(failed) {
        Some(inspected) if inspected == quantity_received => {}
        inspected => {
            return Err(DomainError::ReconciliationMismatch {
                expected: quantity_received,
                actual: inspected.unwrap_or(i64::MAX),
            });
        }
    }

    let discrepancy_reason = candidate
        .discrepancy_reason
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string);
    if failed > 0 && discrepancy_reason.is_none() {
        return Err(DomainError::MissingDiscrepancyReason);
    }

    let receipt = ReceiptDraft {
        vaccine_id,
        lot_number: lot_number.to_string(),
        expiration_date,
        quantity_sent,
        quantity_received,
        passed_inspection: passed,
        failed_inspection: failed,
        discrepancy_reason,
        received_date: candidate.received_date,
    };

    let lot = (passed > 0).then(|| LotDraft {
        vaccine_id,
        lot_number: receipt.lot_number.clone(),
        expiration_date,
        quantity_on_hand: passed,
        received_date: candidate.received_date,
    });

    Ok(ReconciledReceipt { receipt, lot })
}

/// Inspection counts kept balanced while the operator edits them.
///
/// Editing one count derives the other so that `passed + failed == received`
/// whenever the edited value fits inside `received`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InspectionCounts {
    pub received: i64,
    pub passed: i64,
    pub failed: i64,
}

impl InspectionCounts {
    /// New received quantity: every dose starts out as passed.
    pub fn for_received(received: i64) -> Self {
        Self {
            received,
            passed: received,
            failed: 0,
        }
    }

    pub fn set_received(&mut self, received: i64) {
        *self = Self::for_received(received);
    }

    pub fn set_passed(&mut self, passed: i64) {
        self.passed = passed;
        self.failed = self.received.saturating_sub(passed).max(0);
    }

    pub fn set_failed(&mut self, failed: i64) {
        self.failed = failed;
        self.passed = self.received.saturating_sub(failed).max(0);
    }

    pub fn is_balanced(&self) -> bool {
        self.passed.checked_add(self.failed) == Some(self.received)
    }
}

/// Parse a quantity typed into a form field.
///
/// Blank input is `Ok(None)`; anything else must be a non-negative integer.
pub fn parse_quantity(field: &str, input: &str) -> DomainResult<Option<i64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    let value = input
        .parse::<i64>()
        .map_err(|_| DomainError::validation(format!("{field} must be a whole number")))?;
    non_negative(value, field).map(Some)
}

/// Parse a `YYYY-MM-DD` date typed into a form field. Blank input is `Ok(None)`.
pub fn parse_date(field: &str, input: &str) -> DomainResult<Option<NaiveDate>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| DomainError::validation(format!("{field} must be a date (YYYY-MM-DD)")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn candidate(received: i64, passed: i64, failed: i64) -> ReceiptCandidate {
        ReceiptCandidate {
            vaccine_id: Some(VaccineId::new(1)),
            lot_number: "EK5730".to_string(),
            quantity_sent: Some(received),
            quantity_received: Some(received),
            passed_inspection: Some(passed),
            failed_inspection: Some(failed),
            discrepancy_reason: None,
            expiration_date: Some(date(2027, 6, 30)),
            received_date: date(2026, 10, 1),
        }
    }

    #[test]
    fn accepted_doses_become_a_lot() {
        let mut c = candidate(100, 95, 5);
        c.discrepancy_reason = Some("5 damaged in transit".to_string());

        let reconciled = reconcile(&c).unwrap();
        let lot = reconciled.lot.expect("lot for passed doses");
        assert_eq!(lot.quantity_on_hand, 95);
        assert_eq!(lot.vaccine_id, VaccineId::new(1));
        assert_eq!(lot.lot_number, "EK5730");
        assert_eq!(lot.expiration_date, date(2027, 6, 30));
        assert_eq!(lot.received_date, date(2026, 10, 1));
        assert_eq!(
            reconciled.receipt.discrepancy_reason.as_deref(),
            Some("5 damaged in transit")
        );
    }

    #[test]
    fn inspection_sum_must_match_received() {
        let err = reconcile(&candidate(50, 40, 5)).unwrap_err();
        assert_eq!(
            err,
            DomainError::ReconciliationMismatch {
                expected: 50,
                actual: 45
            }
        );
    }

    #[test]
    fn oversized_counts_are_a_mismatch_not_an_overflow() {
        let passed = parse_quantity("passed", "9223372036854775807").unwrap();
        let mut c = candidate(10, 0, 1);
        c.passed_inspection = passed;
        c.discrepancy_reason = Some("broken".to_string());
        assert_eq!(
            reconcile(&c).unwrap_err(),
            DomainError::ReconciliationMismatch {
                expected: 10,
                actual: i64::MAX
            }
        );

        let mut at_limit = candidate(i64::MAX, i64::MAX, 1);
        at_limit.discrepancy_reason = Some("broken".to_string());
        assert!(matches!(
            reconcile(&at_limit),
            Err(DomainError::ReconciliationMismatch { .. })
        ));
    }

    #[test]
    fn extreme_edits_do_not_overflow() {
        let mut counts = InspectionCounts::for_received(i64::MAX);
        counts.set_passed(i64::MIN);
        assert_eq!(counts.failed, i64::MAX);
        assert!(!counts.is_balanced());

        counts.set_failed(-1);
        assert_eq!(counts.passed, i64::MAX);
        assert!(!counts.is_balanced());
    }

    #[test]
    fn failed_doses_require_a_reason() {
        assert_eq!(
            reconcile(&candidate(10, 8, 2)).unwrap_err(),
            DomainError::MissingDiscrepancyReason
        );

        let mut blank = candidate(10, 8, 2);
        blank.discrepancy_reason = Some("   ".to_string());
        assert_eq!(
            reconcile(&blank).unwrap_err(),
            DomainError::MissingDiscrepancyReason
        );
    }

    #[test]
    fn fully_rejected_shipment_creates_no_lot() {
        let mut c = candidate(20, 0, 20);
        c.discrepancy_reason = Some("temperature log out of range".to_string());
        let reconciled = reconcile(&c).unwrap();
        assert!(reconciled.lot.is_none());
        assert_eq!(reconciled.receipt.failed_inspection, 20);
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let mut c = candidate(10, 10, 0);
        c.vaccine_id = None;
        assert_eq!(reconcile(&c).unwrap_err(), DomainError::validation("vaccine is required"));

        let mut c = candidate(10, 10, 0);
        c.lot_number = "  ".to_string();
        assert_eq!(
            reconcile(&c).unwrap_err(),
            DomainError::validation("lot number is required")
        );

        let mut c = candidate(10, 10, 0);
        c.expiration_date = None;
        assert_eq!(
            reconcile(&c).unwrap_err(),
            DomainError::validation("expiration date is required")
        );

        let mut c = candidate(10, 10, 0);
        c.failed_inspection = None;
        assert_eq!(
            reconcile(&c).unwrap_err(),
            DomainError::validation("failed inspection count is required")
        );
    }

    #[test]
    fn negative_counts_are_rejected() {
        let err = reconcile(&candidate(10, 12, -2)).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("failed inspection count cannot be negative")
        );
    }

    #[test]
    fn counts_auto_balance_while_editing() {
        let mut counts = InspectionCounts::for_received(30);
        assert_eq!((counts.passed, counts.failed), (30, 0));

        counts.set_passed(26);
        assert_eq!(counts.failed, 4);
        assert!(counts.is_balanced());

        counts.set_failed(10);
        assert_eq!(counts.passed, 20);

        // Over-entry clamps the derived side at zero and leaves the sum off.
        counts.set_failed(35);
        assert_eq!(counts.passed, 0);
        assert!(!counts.is_balanced());

        counts.set_received(12);
        assert_eq!(counts, InspectionCounts::for_received(12));
    }

    #[test]
    fn form_quantities_parse_at_the_boundary() {
        assert_eq!(parse_quantity("quantity", " 12 ").unwrap(), Some(12));
        assert_eq!(parse_quantity("quantity", "").unwrap(), None);
        assert_eq!(parse_quantity("quantity", "0").unwrap(), Some(0));
        assert!(parse_quantity("quantity", "1.5").is_err());
        assert!(parse_quantity("quantity", "-3").is_err());
    }

    #[test]
    fn form_dates_parse_at_the_boundary() {
        assert_eq!(
            parse_date("expiration date", "2027-01-31").unwrap(),
            Some(date(2027, 1, 31))
        );
        assert_eq!(parse_date("expiration date", " ").unwrap(), None);
        assert!(parse_date("expiration date", "31/01/2027").is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: reconcile fails iff the counts disagree or failed
            /// doses lack a reason.
            #[test]
            fn reconcile_fails_iff_rules_broken(
                received in 0i64..500,
                passed in 0i64..500,
                failed in 0i64..500,
                has_reason in any::<bool>(),
            ) {
                let mut c = candidate(received, passed, failed);
                if has_reason {
                    c.discrepancy_reason = Some("short shipment".to_string());
                }
                let should_fail = passed + failed != received || (failed > 0 && !has_reason);
                let result = reconcile(&c);
                prop_assert_eq!(result.is_err(), should_fail);

                if let Ok(r) = result {
                    prop_assert_eq!(r.lot.is_some(), passed > 0);
                    if let Some(lot) = r.lot {
                        prop_assert_eq!(lot.quantity_on_hand, passed);
                    }
                }
            }

            /// Property: editing one side inside the received range keeps the
            /// counts balanced.
            #[test]
            fn in_range_edits_stay_balanced(received in 0i64..1000, pick in 0i64..1000, edit_passed in any::<bool>()) {
                let value = pick.min(received);
                let mut counts = InspectionCounts::for_received(received);
                if edit_passed {
                    counts.set_passed(value);
                } else {
                    counts.set_failed(value);
                }
                prop_assert!(counts.is_balanced());
            }
        }
    }
}
