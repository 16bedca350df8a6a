//! Observability infrastructure - Prometheus metrics

mod metrics;

pub use metrics::{CacheKind, KindCounts, MetricsRecorder, MetricsSummary, LATENCY_BUCKETS};
