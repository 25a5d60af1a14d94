// Domain models (ported from the Swift HealthKit bridge)

mod metric;
mod snapshot;

pub use metric::{
    Aggregation, FALLBACK_VALUE, MetricKind, MetricQuery, SleepInterval, SleepStage, Unit, Window,
};
pub use snapshot::HealthSnapshot;
