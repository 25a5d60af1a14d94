// Shared test helpers: a scripted in-memory health store
// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use healthd::error::AccessError;
use healthd::models::{MetricKind, SleepInterval, Window};
use healthd::store::HealthStore;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::time::Duration;

/// Scripted result for one metric query.
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Value(f64),
    NoData,
    Fail,
}

/// Test double for the sample store: per-metric scripted outcomes,
/// optional per-metric delays (to permute completion order), and call
/// counters for no-query-after-denial assertions.
pub struct MockStore {
    access: Result<(), &'static str>,
    unavailable: bool,
    outcomes: HashMap<MetricKind, Scripted>,
    sleep_intervals: Vec<SleepInterval>,
    sleep_fails: bool,
    delays_ms: HashMap<MetricKind, u64>,
    pub access_calls: AtomicUsize,
    pub query_calls: AtomicUsize,
    pub windows_seen: Mutex<HashMap<MetricKind, Window>>,
}

impl MockStore {
    /// Access granted, every metric reports no data.
    pub fn granting() -> Self {
        Self {
            access: Ok(()),
            unavailable: false,
            outcomes: HashMap::new(),
            sleep_intervals: Vec::new(),
            sleep_fails: false,
            delays_ms: HashMap::new(),
            access_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            windows_seen: Mutex::new(HashMap::new()),
        }
    }

    pub fn denying(cause: &'static str) -> Self {
        Self {
            access: Err(cause),
            ..Self::granting()
        }
    }

    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::granting()
        }
    }

    pub fn value(mut self, kind: MetricKind, v: f64) -> Self {
        self.outcomes.insert(kind, Scripted::Value(v));
        self
    }

    pub fn failing(mut self, kind: MetricKind) -> Self {
        self.outcomes.insert(kind, Scripted::Fail);
        self
    }

    pub fn sleep(mut self, intervals: Vec<SleepInterval>) -> Self {
        self.sleep_intervals = intervals;
        self
    }

    pub fn sleep_failing(mut self) -> Self {
        self.sleep_fails = true;
        self
    }

    pub fn delay(mut self, kind: MetricKind, ms: u64) -> Self {
        self.delays_ms.insert(kind, ms);
        self
    }

    async fn observe(&self, kind: MetricKind, window: Window) {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.windows_seen.lock().unwrap().insert(kind, window);
        if let Some(&ms) = self.delays_ms.get(&kind) {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    fn scripted(&self, kind: MetricKind) -> anyhow::Result<Option<f64>> {
        match self.outcomes.get(&kind).copied().unwrap_or(Scripted::NoData) {
            Scripted::Value(v) => Ok(Some(v)),
            Scripted::NoData => Ok(None),
            Scripted::Fail => Err(anyhow::anyhow!("scripted failure for {kind}")),
        }
    }
}

#[async_trait]
impl HealthStore for MockStore {
    async fn request_access(&self, _scopes: &[MetricKind]) -> Result<(), AccessError> {
        self.access_calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable {
            return Err(AccessError::Unavailable("store offline".into()));
        }
        self.access.map_err(|cause| AccessError::Denied {
            cause: Some(cause.into()),
        })
    }

    async fn sum_in_window(
        &self,
        kind: MetricKind,
        window: Window,
    ) -> anyhow::Result<Option<f64>> {
        self.observe(kind, window).await;
        self.scripted(kind)
    }

    async fn latest_in_window(
        &self,
        kind: MetricKind,
        window: Window,
    ) -> anyhow::Result<Option<f64>> {
        self.observe(kind, window).await;
        self.scripted(kind)
    }

    async fn sleep_samples_in_window(&self, window: Window) -> anyhow::Result<Vec<SleepInterval>> {
        self.observe(MetricKind::SleepScore, window).await;
        if self.sleep_fails {
            return Err(anyhow::anyhow!("scripted sleep failure"));
        }
        Ok(self.sleep_intervals.clone())
    }
}
