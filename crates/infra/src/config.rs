//! Configuration loading and representation.

use std::time::Duration;

use vaxtrack_inventory::DEFAULT_ALERT_THRESHOLD;

pub const LATENCY_ENV: &str = "VAXTRACK_SIMULATED_LATENCY_MS";
pub const ALERT_THRESHOLD_ENV: &str = "VAXTRACK_DEFAULT_ALERT_THRESHOLD";

/// Backend and read-side settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Delay added to every in-memory repository call.
    pub simulated_latency: Duration,
    /// Low-stock threshold for lots whose vaccine is unknown.
    pub default_alert_threshold: i64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            default_alert_threshold: DEFAULT_ALERT_THRESHOLD,
        }
    }
}

impl BackendConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`; unset or invalid values keep their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let simulated_latency = parse_var::<u64>(&lookup, LATENCY_ENV)
            .map(Duration::from_millis)
            .unwrap_or(defaults.simulated_latency);

        let default_alert_threshold = parse_var::<i64>(&lookup, ALERT_THRESHOLD_ENV)
            .filter(|t| {
                if *t < 0 {
                    tracing::warn!(key = ALERT_THRESHOLD_ENV, value = *t, "negative threshold ignored");
                    false
                } else {
                    true
                }
            })
            .unwrap_or(defaults.default_alert_threshold);

        Self {
            simulated_latency,
            default_alert_threshold,
        }
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "invalid configuration value, using default");
            None
        }
    }
}
