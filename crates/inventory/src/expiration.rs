//! Expiration classification.
//!
//! Every place that shows or aggregates a lot's expiration status (dashboard
//! counts, table badges, reports) goes through [`classify`] so the bucket
//! boundaries cannot drift apart.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Last day (inclusive) of the critical window.
pub const CRITICAL_WINDOW_DAYS: i64 = 7;
/// Last day (inclusive) of the warning window.
pub const WARNING_WINDOW_DAYS: i64 = 30;

/// Severity bucket for a lot's expiration date.
///
/// Variants are declared from most to least urgent, so `Ord` sorts by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpirationStatus {
    Expired,
    Critical,
    Warning,
    Good,
}

/// Badge variant used to render a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Good,
}

impl ExpirationStatus {
    pub fn from_days(days_until_expiry: i64) -> Self {
        if days_until_expiry <= 0 {
            ExpirationStatus::Expired
        } else if days_until_expiry <= CRITICAL_WINDOW_DAYS {
            ExpirationStatus::Critical
        } else if days_until_expiry <= WARNING_WINDOW_DAYS {
            ExpirationStatus::Warning
        } else {
            ExpirationStatus::Good
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            ExpirationStatus::Expired | ExpirationStatus::Critical => Severity::Critical,
            ExpirationStatus::Warning => Severity::Warning,
            ExpirationStatus::Good => Severity::Good,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpirationStatus::Expired => "Expired",
            ExpirationStatus::Critical => "Critical",
            ExpirationStatus::Warning => "Warning",
            ExpirationStatus::Good => "Good",
        }
    }

    /// Expired or inside the critical window.
    pub fn needs_attention(self) -> bool {
        self.severity() == Severity::Critical
    }

    /// Still usable but inside the 30-day window.
    pub fn is_expiring_soon(self) -> bool {
        matches!(self, ExpirationStatus::Critical | ExpirationStatus::Warning)
    }
}

impl core::fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Instant a calendar expiration date refers to (midnight UTC).
pub fn expiration_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Whole days until `expiration`, rounded up.
///
/// Any positive remainder counts as a full day, so a lot expiring later today
/// is one day out and a lot that expired an hour ago is at zero.
pub fn days_until_expiry(expiration: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (expiration - now).num_milliseconds();
    // Integer division truncates toward zero, which is already the ceiling for
    // negative values.
    let days = millis / MILLIS_PER_DAY;
    if millis % MILLIS_PER_DAY > 0 { days + 1 } else { days }
}

/// Classify an expiration instant relative to `now`.
pub fn classify(expiration: DateTime<Utc>, now: DateTime<Utc>) -> ExpirationStatus {
    ExpirationStatus::from_days(days_until_expiry(expiration, now))
}

/// Classify a calendar expiration date relative to `now`.
pub fn classify_date(expiration: NaiveDate, now: DateTime<Utc>) -> ExpirationStatus {
    classify(expiration_instant(expiration), now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn boundaries_are_exact() {
        assert_eq!(ExpirationStatus::from_days(-3), ExpirationStatus::Expired);
        assert_eq!(ExpirationStatus::from_days(0), ExpirationStatus::Expired);
        assert_eq!(ExpirationStatus::from_days(1), ExpirationStatus::Critical);
        assert_eq!(ExpirationStatus::from_days(7), ExpirationStatus::Critical);
        assert_eq!(ExpirationStatus::from_days(8), ExpirationStatus::Warning);
        assert_eq!(ExpirationStatus::from_days(30), ExpirationStatus::Warning);
        assert_eq!(ExpirationStatus::from_days(31), ExpirationStatus::Good);
    }

    #[test]
    fn partial_days_round_up() {
        let n = now();
        assert_eq!(days_until_expiry(n + Duration::hours(1), n), 1);
        assert_eq!(days_until_expiry(n + Duration::days(7), n), 7);
        assert_eq!(days_until_expiry(n + Duration::days(7) + Duration::milliseconds(1), n), 8);
        assert_eq!(days_until_expiry(n, n), 0);
        assert_eq!(days_until_expiry(n - Duration::hours(23), n), 0);
        assert_eq!(days_until_expiry(n - Duration::hours(25), n), -1);
    }

    #[test]
    fn calendar_dates_are_midnight_utc() {
        let n = now();
        // 2026-03-10T00:00Z is already in the past at 09:30.
        assert_eq!(
            classify_date(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(), n),
            ExpirationStatus::Expired
        );
        // Tomorrow midnight is under one day away -> rounds up to 1.
        assert_eq!(
            classify_date(NaiveDate::from_ymd_opt(2026, 3, 11).unwrap(), n),
            ExpirationStatus::Critical
        );
        assert_eq!(
            classify_date(NaiveDate::from_ymd_opt(2026, 3, 18).unwrap(), n),
            ExpirationStatus::Warning
        );
        assert_eq!(
            classify_date(NaiveDate::from_ymd_opt(2026, 4, 10).unwrap(), n),
            ExpirationStatus::Good
        );
    }

    #[test]
    fn ordering_follows_urgency() {
        let mut statuses = vec![
            ExpirationStatus::Good,
            ExpirationStatus::Expired,
            ExpirationStatus::Warning,
            ExpirationStatus::Critical,
        ];
        statuses.sort();
        assert_eq!(
            statuses,
            vec![
                ExpirationStatus::Expired,
                ExpirationStatus::Critical,
                ExpirationStatus::Warning,
                ExpirationStatus::Good,
            ]
        );
    }

    #[test]
    fn severity_and_windows() {
        assert_eq!(ExpirationStatus::Expired.severity(), Severity::Critical);
        assert!(ExpirationStatus::Critical.needs_attention());
        assert!(!ExpirationStatus::Warning.needs_attention());
        assert!(ExpirationStatus::Warning.is_expiring_soon());
        assert!(!ExpirationStatus::Expired.is_expiring_soon());
        assert!(!ExpirationStatus::Good.is_expiring_soon());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 1000,
                ..ProptestConfig::default()
            })]

            /// Property: classification depends only on the day count and is
            /// repeatable.
            #[test]
            fn classify_is_pure(offset_ms in -10_000_000_000i64..10_000_000_000i64) {
                let n = now();
                let expiration = n + Duration::milliseconds(offset_ms);
                let first = classify(expiration, n);
                let second = classify(expiration, n);
                prop_assert_eq!(first, second);
                prop_assert_eq!(first, ExpirationStatus::from_days(days_until_expiry(expiration, n)));
            }

            /// Property: the day count is the ceiling of the fractional offset.
            #[test]
            fn days_is_ceiling(offset_ms in -10_000_000_000i64..10_000_000_000i64) {
                let n = now();
                let days = days_until_expiry(n + Duration::milliseconds(offset_ms), n);
                let exact = offset_ms as f64 / MILLIS_PER_DAY as f64;
                prop_assert_eq!(days, exact.ceil() as i64);
            }

            /// Property: a later expiration is never more urgent.
            #[test]
            fn later_expiration_is_never_more_urgent(
                a in -100i64..100,
                b in -100i64..100,
            ) {
                let (early, late) = if a <= b { (a, b) } else { (b, a) };
                prop_assert!(ExpirationStatus::from_days(early) <= ExpirationStatus::from_days(late));
            }
        }
    }
}
