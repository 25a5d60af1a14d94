// Merged snapshot model

use serde::Serialize;
use std::collections::BTreeMap;

use super::MetricKind;
use super::metric::FALLBACK_VALUE;

/// The merged result of one aggregation run. The mapping always holds
/// exactly one entry per metric kind; a metric whose query failed or
/// returned no data carries the fallback value, never a missing key.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HealthSnapshot {
    /// Frozen reference timestamp of the run (unix ms); all windows were
    /// computed against this instant.
    pub timestamp: i64,
    /// Wire mapping: `steps`, `heart_rate`, `hrv`, `temperature`, `spo2`,
    /// `sleep_score`.
    pub metrics: BTreeMap<&'static str, f64>,
}

impl HealthSnapshot {
    /// A snapshot pre-populated with the fallback for every metric, each
    /// entry overwritten once by its query's completion.
    pub fn with_fallbacks(timestamp: i64) -> Self {
        let metrics = MetricKind::ALL
            .iter()
            .map(|k| (k.key(), FALLBACK_VALUE))
            .collect();
        Self { timestamp, metrics }
    }

    pub fn set(&mut self, kind: MetricKind, value: f64) {
        self.metrics.insert(kind.key(), value);
    }

    pub fn get(&self, kind: MetricKind) -> f64 {
        // Every key is present from construction.
        self.metrics.get(kind.key()).copied().unwrap_or(FALLBACK_VALUE)
    }
}
