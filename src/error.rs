// Error taxonomy: fatal run errors vs per-metric soft failures

use crate::models::MetricKind;
use thiserror::Error;

/// Fatal errors for a whole aggregation run. Either kind means no query
/// was spawned and no snapshot exists.
#[derive(Debug, Error)]
pub enum HealthError {
    /// The sample store cannot be used at all.
    #[error("health data source unavailable: {0}")]
    Unavailable(String),

    /// The authorization gate rejected access.
    #[error("health data access denied{}", .cause.as_deref().map(|c| format!(": {c}")).unwrap_or_default())]
    AccessDenied { cause: Option<String> },
}

/// One query's own failure. Never propagated to the caller; the run
/// absorbs it into the metric's fallback value.
#[derive(Debug, Error)]
#[error("query for {metric} failed: {cause}")]
pub struct QueryError {
    pub metric: MetricKind,
    #[source]
    pub cause: anyhow::Error,
}

/// Outcome of the authorization gate, before any query runs.
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied{}", .cause.as_deref().map(|c| format!(": {c}")).unwrap_or_default())]
    Denied { cause: Option<String> },
}

impl From<AccessError> for HealthError {
    fn from(e: AccessError) -> Self {
        match e {
            AccessError::Unavailable(msg) => HealthError::Unavailable(msg),
            AccessError::Denied { cause } => HealthError::AccessDenied { cause },
        }
    }
}
