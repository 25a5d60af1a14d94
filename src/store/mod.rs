// Sample store contract and SQLite implementation

mod sqlite;

pub use sqlite::SqliteHealthStore;

use crate::error::AccessError;
use crate::models::{MetricKind, SleepInterval, Window};
use async_trait::async_trait;

/// Read-only access to the underlying health sample source. The three
/// read shapes mirror the queries the aggregator issues: a cumulative
/// statistic, a newest-sample lookup, and an interval scan.
///
/// `request_access` is the authorization gate: it must resolve Ok before
/// any read runs, and a denial means no read is ever attempted.
#[async_trait]
pub trait HealthStore: Send + Sync {
    /// Ask for read access to the given metric scopes. Single-shot per
    /// aggregation run; may suspend until the user/system responds.
    async fn request_access(&self, scopes: &[MetricKind]) -> Result<(), AccessError>;

    /// Sum of all sample values for `kind` within `window`. `None` when
    /// the window holds no samples.
    async fn sum_in_window(&self, kind: MetricKind, window: Window)
    -> anyhow::Result<Option<f64>>;

    /// Value of the newest sample for `kind` within `window`, by start
    /// time descending. `None` when the window holds no samples.
    async fn latest_in_window(
        &self,
        kind: MetricKind,
        window: Window,
    ) -> anyhow::Result<Option<f64>>;

    /// All sleep analysis intervals starting within `window`.
    async fn sleep_samples_in_window(&self, window: Window)
    -> anyhow::Result<Vec<SleepInterval>>;
}
