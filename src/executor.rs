// Per-metric query execution: window scoping, store call shape, decode

use crate::error::QueryError;
use crate::models::{Aggregation, MetricQuery, SleepStage};
use crate::store::HealthStore;
use chrono::{DateTime, Utc};

/// The single terminal event of one query. `NoData` (ran, empty window)
/// and `Failed` (store error) both fold into the fallback value, but are
/// kept apart so logs can tell them apart.
#[derive(Debug)]
pub enum QueryOutcome {
    Value(f64),
    NoData,
    Failed(QueryError),
}

/// Hours of sleep mapped to a bounded 0-100 score; 8 hours scores 100.
pub fn sleep_score(asleep_hours: f64) -> f64 {
    (asleep_hours * 12.5).min(100.0)
}

/// Runs exactly one metric query against the store and reports exactly
/// one outcome. `now` is the run's frozen reference instant; the window
/// is derived from it here, not from the wall clock.
pub async fn run_query(
    store: &dyn HealthStore,
    query: MetricQuery,
    now: DateTime<Utc>,
) -> QueryOutcome {
    let window = query.window(now);
    tracing::debug!(
        metric = %query.kind,
        unit = ?query.unit,
        window_start_ms = window.start_ms,
        window_end_ms = window.end_ms,
        "running metric query"
    );

    let result = match query.aggregation {
        Aggregation::CumulativeSum => store.sum_in_window(query.kind, window).await,
        Aggregation::MostRecent => store.latest_in_window(query.kind, window).await,
        Aggregation::SleepScore => {
            return match store.sleep_samples_in_window(window).await {
                Ok(intervals) if intervals.is_empty() => QueryOutcome::NoData,
                Ok(intervals) => {
                    let asleep_secs: f64 = intervals
                        .iter()
                        .filter(|i| i.stage == SleepStage::Asleep)
                        .map(|i| i.duration_secs())
                        .sum();
                    QueryOutcome::Value(sleep_score(asleep_secs / 3600.0))
                }
                Err(e) => QueryOutcome::Failed(QueryError {
                    metric: query.kind,
                    cause: e,
                }),
            };
        }
    };

    match result {
        Ok(Some(value)) => QueryOutcome::Value(value),
        Ok(None) => QueryOutcome::NoData,
        Err(e) => QueryOutcome::Failed(QueryError {
            metric: query.kind,
            cause: e,
        }),
    }
}
