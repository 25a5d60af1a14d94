// Metric kinds, query descriptions, time windows, and raw sample shapes

use chrono::{DateTime, Duration, NaiveTime, Utc};

/// The fixed set of metrics one aggregation run queries. The wire key of
/// each (`key()`) is stable and unique across the set; the snapshot map
/// and the sample store both go through `key()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetricKind {
    Steps,
    HeartRate,
    Hrv,
    Temperature,
    Spo2,
    SleepScore,
}

impl MetricKind {
    /// Every metric in declaration order. The snapshot key set is exactly this.
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Steps,
        MetricKind::HeartRate,
        MetricKind::Hrv,
        MetricKind::Temperature,
        MetricKind::Spo2,
        MetricKind::SleepScore,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MetricKind::Steps => "steps",
            MetricKind::HeartRate => "heart_rate",
            MetricKind::Hrv => "hrv",
            MetricKind::Temperature => "temperature",
            MetricKind::Spo2 => "spo2",
            MetricKind::SleepScore => "sleep_score",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// How raw samples reduce to the one number reported for a metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation {
    /// Sum of all sample values in the window (steps).
    CumulativeSum,
    /// Value of the newest sample in the window (vitals).
    MostRecent,
    /// Asleep-interval durations summed and scored 0-100 (sleep).
    SleepScore,
}

/// Unit the decoded value is expressed in. Carried for logging and wire docs;
/// the store returns values already in these units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Count,
    BeatsPerMinute,
    Milliseconds,
    Celsius,
    Percent,
    Score,
}

/// Half-open interval `[start_ms, end_ms)` in unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl Window {
    /// `[start of the UTC calendar day containing now, now)`.
    pub fn day_of(now: DateTime<Utc>) -> Self {
        let midnight = now
            .date_naive()
            .and_time(NaiveTime::MIN)
            .and_utc()
            .timestamp_millis();
        Self {
            start_ms: midnight,
            end_ms: now.timestamp_millis(),
        }
    }

    /// `[now - hours, now)`.
    pub fn last_hours(now: DateTime<Utc>, hours: i64) -> Self {
        Self {
            start_ms: (now - Duration::hours(hours)).timestamp_millis(),
            end_ms: now.timestamp_millis(),
        }
    }

    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }
}

/// One data request: which metric, how its window is scoped relative to the
/// run's frozen "now", how samples reduce, and the unit of the result.
/// The fallback substituted on failure or no-data is `0.0` for every metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricQuery {
    pub kind: MetricKind,
    pub aggregation: Aggregation,
    pub unit: Unit,
}

pub const FALLBACK_VALUE: f64 = 0.0;

impl MetricQuery {
    /// The fixed query set, one per metric. Window policy per metric:
    /// steps over the calendar day, vitals over the last hour, sleep over
    /// the last 24 hours.
    pub fn all() -> [MetricQuery; 6] {
        [
            MetricQuery {
                kind: MetricKind::Steps,
                aggregation: Aggregation::CumulativeSum,
                unit: Unit::Count,
            },
            MetricQuery {
                kind: MetricKind::HeartRate,
                aggregation: Aggregation::MostRecent,
                unit: Unit::BeatsPerMinute,
            },
            MetricQuery {
                kind: MetricKind::Hrv,
                aggregation: Aggregation::MostRecent,
                unit: Unit::Milliseconds,
            },
            MetricQuery {
                kind: MetricKind::Temperature,
                aggregation: Aggregation::MostRecent,
                unit: Unit::Celsius,
            },
            MetricQuery {
                kind: MetricKind::Spo2,
                aggregation: Aggregation::MostRecent,
                unit: Unit::Percent,
            },
            MetricQuery {
                kind: MetricKind::SleepScore,
                aggregation: Aggregation::SleepScore,
                unit: Unit::Score,
            },
        ]
    }

    pub fn window(&self, now: DateTime<Utc>) -> Window {
        match self.kind {
            MetricKind::Steps => Window::day_of(now),
            MetricKind::SleepScore => Window::last_hours(now, 24),
            _ => Window::last_hours(now, 1),
        }
    }
}

/// Sleep analysis stage. Only `Asleep` intervals count toward the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepStage {
    InBed,
    Asleep,
    Awake,
}

impl SleepStage {
    /// Stable integer encoding used by the sample store.
    pub fn code(&self) -> i64 {
        match self {
            SleepStage::InBed => 0,
            SleepStage::Asleep => 1,
            SleepStage::Awake => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(SleepStage::InBed),
            1 => Some(SleepStage::Asleep),
            2 => Some(SleepStage::Awake),
            _ => None,
        }
    }
}

/// One sleep analysis interval from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepInterval {
    pub stage: SleepStage,
    pub start_ms: i64,
    pub end_ms: i64,
}

impl SleepInterval {
    pub fn duration_secs(&self) -> f64 {
        (self.end_ms - self.start_ms).max(0) as f64 / 1000.0
    }
}
