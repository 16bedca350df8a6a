//! Prometheus metrics for the answer cache

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use metrics::{counter, histogram, with_local_recorder};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use serde::Serialize;

use crate::domain::DomainError;

/// Histogram buckets for request latency, in seconds
pub const LATENCY_BUCKETS: &[f64] = &[0.01, 0.03, 0.1, 0.3, 1.0, 3.0, 10.0];

/// Cache level a hit or miss belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Exact,
    Semantic,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Exact => "exact",
            CacheKind::Semantic => "semantic",
        }
    }
}

/// Counts split by cache level
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KindCounts {
    pub exact: u64,
    pub semantic: u64,
}

/// Snapshot served by `/metrics/json`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub requests: u64,
    pub cache_hits: KindCounts,
    pub cache_miss: KindCounts,
    pub tokens_prompt: u64,
    pub tokens_completion: u64,
    pub cost_usd: f64,
    pub semantic_write_failures: u64,
}

#[derive(Debug, Clone)]
struct MetricNames {
    requests: String,
    latency: String,
    hits: String,
    misses: String,
    tokens_prompt: String,
    tokens_completion: String,
    cost: String,
    semantic_write_failures: String,
}

impl MetricNames {
    fn new(namespace: &str) -> Self {
        Self {
            requests: format!("{}_requests_total", namespace),
            latency: format!("{}_request_latency_seconds", namespace),
            hits: format!("{}_cache_hits_total", namespace),
            misses: format!("{}_cache_miss_total", namespace),
            tokens_prompt: format!("{}_tokens_prompt_total", namespace),
            tokens_completion: format!("{}_tokens_completion_total", namespace),
            cost: format!("{}_cost_usd_micros_total", namespace),
            semantic_write_failures: format!("{}_semantic_write_failures_total", namespace),
        }
    }
}

#[derive(Debug, Default)]
struct Totals {
    requests: AtomicU64,
    exact_hits: AtomicU64,
    semantic_hits: AtomicU64,
    exact_misses: AtomicU64,
    semantic_misses: AtomicU64,
    tokens_prompt: AtomicU64,
    tokens_completion: AtomicU64,
    cost_micros: AtomicU64,
    semantic_write_failures: AtomicU64,
}

/// Process-lifetime counters for requests, cache hits/misses, tokens and cost
///
/// Each instance owns a private Prometheus recorder; instances never share counts.
pub struct MetricsRecorder {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    names: MetricNames,
    totals: Totals,
}

impl fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRecorder")
            .field("names", &self.names)
            .field("totals", &self.totals)
            .field("recorder", &"<PrometheusRecorder>")
            .finish()
    }
}

impl MetricsRecorder {
    /// Creates a recorder whose metric names start with `namespace`
    pub fn new(namespace: &str) -> Result<Self, DomainError> {
        let names = MetricNames::new(namespace);

        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(Matcher::Full(names.latency.clone()), LATENCY_BUCKETS)
            .map_err(|e| {
                DomainError::configuration(format!("Invalid latency histogram buckets: {}", e))
            })?
            .build_recorder();
        let handle = recorder.handle();

        Ok(Self {
            recorder,
            handle,
            names,
            totals: Totals::default(),
        })
    }

    pub fn record_request(&self, route: &str) {
        self.totals.requests.fetch_add(1, Ordering::Relaxed);

        with_local_recorder(&self.recorder, || {
            counter!(self.names.requests.clone(), "route" => route.to_string()).increment(1);
        });
    }

    pub fn record_hit(&self, kind: CacheKind) {
        let total = match kind {
            CacheKind::Exact => &self.totals.exact_hits,
            CacheKind::Semantic => &self.totals.semantic_hits,
        };
        total.fetch_add(1, Ordering::Relaxed);

        with_local_recorder(&self.recorder, || {
            counter!(self.names.hits.clone(), "kind" => kind.as_str()).increment(1);
        });
    }

    pub fn record_miss(&self, kind: CacheKind) {
        let total = match kind {
            CacheKind::Exact => &self.totals.exact_misses,
            CacheKind::Semantic => &self.totals.semantic_misses,
        };
        total.fetch_add(1, Ordering::Relaxed);

        with_local_recorder(&self.recorder, || {
            counter!(self.names.misses.clone(), "kind" => kind.as_str()).increment(1);
        });
    }

    /// Adds the token usage and cost of one model call
    pub fn record_usage(&self, prompt_tokens: u32, completion_tokens: u32, cost_usd: f64) {
        let prompt = u64::from(prompt_tokens);
        let completion = u64::from(completion_tokens);
        let cost_micros = (cost_usd.max(0.0) * 1_000_000.0).round() as u64;

        self.totals.tokens_prompt.fetch_add(prompt, Ordering::Relaxed);
        self.totals
            .tokens_completion
            .fetch_add(completion, Ordering::Relaxed);
        self.totals.cost_micros.fetch_add(cost_micros, Ordering::Relaxed);

        with_local_recorder(&self.recorder, || {
            counter!(self.names.tokens_prompt.clone()).increment(prompt);
            counter!(self.names.tokens_completion.clone()).increment(completion);
            counter!(self.names.cost.clone()).increment(cost_micros);
        });
    }

    /// Counts a model answer that could not be added to the semantic cache
    pub fn record_semantic_write_failure(&self) {
        self.totals
            .semantic_write_failures
            .fetch_add(1, Ordering::Relaxed);

        with_local_recorder(&self.recorder, || {
            counter!(self.names.semantic_write_failures.clone()).increment(1);
        });
    }

    pub fn observe_latency(&self, route: &str, elapsed: Duration) {
        with_local_recorder(&self.recorder, || {
            histogram!(self.names.latency.clone(), "route" => route.to_string())
                .record(elapsed.as_secs_f64());
        });
    }

    /// Prometheus text exposition
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn summary(&self) -> MetricsSummary {
        let load = |counter: &AtomicU64| counter.load(Ordering::Relaxed);

        MetricsSummary {
            requests: load(&self.totals.requests),
            cache_hits: KindCounts {
                exact: load(&self.totals.exact_hits),
                semantic: load(&self.totals.semantic_hits),
            },
            cache_miss: KindCounts {
                exact: load(&self.totals.exact_misses),
                semantic: load(&self.totals.semantic_misses),
            },
            tokens_prompt: load(&self.totals.tokens_prompt),
            tokens_completion: load(&self.totals.tokens_completion),
            cost_usd: load(&self.totals.cost_micros) as f64 / 1_000_000.0,
            semantic_write_failures: load(&self.totals.semantic_write_failures),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_starts_at_zero() {
        let metrics = MetricsRecorder::new("test").unwrap();
        assert_eq!(metrics.summary(), MetricsSummary::default());
    }

    #[test]
    fn test_counters_accumulate() {
        let metrics = MetricsRecorder::new("test").unwrap();

        metrics.record_request("/ask");
        metrics.record_request("/ask");
        metrics.record_hit(CacheKind::Exact);
        metrics.record_miss(CacheKind::Exact);
        metrics.record_miss(CacheKind::Semantic);
        metrics.record_usage(10, 20, 0.00015);
        metrics.record_usage(5, 5, 0.00005);

        let summary = metrics.summary();
        assert_eq!(summary.requests, 2);
        assert_eq!(summary.cache_hits, KindCounts { exact: 1, semantic: 0 });
        assert_eq!(summary.cache_miss, KindCounts { exact: 1, semantic: 1 });
        assert_eq!(summary.tokens_prompt, 15);
        assert_eq!(summary.tokens_completion, 25);
        assert!((summary.cost_usd - 0.0002).abs() < 1e-12);
    }

    #[test]
    fn test_render_uses_namespace_and_labels() {
        let metrics = MetricsRecorder::new("answer_cache").unwrap();

        metrics.record_request("/ask");
        metrics.record_hit(CacheKind::Semantic);
        metrics.observe_latency("/ask", Duration::from_millis(20));

        let text = metrics.render();
        assert!(text.contains("answer_cache_requests_total{route=\"/ask\"} 1"));
        assert!(text.contains("answer_cache_cache_hits_total{kind=\"semantic\"} 1"));
        assert!(text.contains("answer_cache_request_latency_seconds_bucket"));
    }

    #[test]
    fn test_semantic_write_failures_counted() {
        let metrics = MetricsRecorder::new("answer_cache").unwrap();

        metrics.record_semantic_write_failure();

        assert_eq!(metrics.summary().semantic_write_failures, 1);
        assert!(metrics
            .render()
            .contains("answer_cache_semantic_write_failures_total 1"));
    }

    #[test]
    fn test_instances_are_independent() {
        let first = MetricsRecorder::new("ns").unwrap();
        let second = MetricsRecorder::new("ns").unwrap();

        first.record_request("/ask");

        assert_eq!(first.summary().requests, 1);
        assert_eq!(second.summary().requests, 0);
        assert!(!second.render().contains("ns_requests_total{"));
    }

    #[test]
    fn test_summary_json_shape() {
        let metrics = MetricsRecorder::new("test").unwrap();
        metrics.record_hit(CacheKind::Exact);

        let json = serde_json::to_value(metrics.summary()).unwrap();
        assert_eq!(json["cache_hits"]["exact"], 1);
        assert_eq!(json["cache_miss"]["semantic"], 0);
        assert!(json.get("cost_usd").is_some());
    }
}
