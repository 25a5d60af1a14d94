// Fan-out/fan-in coordination: gate, spawn one task per metric, join on
// a channel carrying exactly one tagged completion per query.

use crate::error::HealthError;
use crate::executor::{self, QueryOutcome};
use crate::models::{HealthSnapshot, MetricKind, MetricQuery};
use crate::store::HealthStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Sole entry point: one independent aggregation run per call. Resolves
/// only after the authorization gate and every spawned query have
/// settled; per-metric failures are absorbed into fallbacks, so the
/// result is a complete snapshot or one of the two fatal errors.
pub async fn fetch_health_data(
    store: Arc<dyn HealthStore>,
) -> Result<HealthSnapshot, HealthError> {
    fetch_health_data_at(store, Utc::now()).await
}

/// Same as [`fetch_health_data`] with an explicit frozen reference
/// instant. Captured once; every window in the run is derived from it.
pub async fn fetch_health_data_at(
    store: Arc<dyn HealthStore>,
    now: DateTime<Utc>,
) -> Result<HealthSnapshot, HealthError> {
    store.request_access(&MetricKind::ALL).await?;

    let queries = MetricQuery::all();
    let (tx, mut rx) = mpsc::channel::<(MetricKind, QueryOutcome)>(queries.len());
    for query in queries {
        let store = store.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let outcome = executor::run_query(store.as_ref(), query, now).await;
            // Receiver drains the channel until all senders drop.
            let _ = tx.send((query.kind, outcome)).await;
        });
    }
    drop(tx);

    // Pre-populated with fallbacks; each completion overwrites its own
    // key, so the key set is fixed no matter how the tasks interleave.
    let mut snapshot = HealthSnapshot::with_fallbacks(now.timestamp_millis());
    while let Some((kind, outcome)) = rx.recv().await {
        match outcome {
            QueryOutcome::Value(value) => {
                tracing::debug!(metric = %kind, value, "query completed");
                snapshot.set(kind, value);
            }
            QueryOutcome::NoData => {
                tracing::debug!(metric = %kind, "no samples in window, using fallback");
            }
            QueryOutcome::Failed(e) => {
                tracing::warn!(metric = %kind, error = %e, "query failed, using fallback");
            }
        }
    }

    tracing::debug!(timestamp = snapshot.timestamp, "aggregation run complete");
    Ok(snapshot)
}
