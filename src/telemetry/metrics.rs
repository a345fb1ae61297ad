//! Prometheus metrics
//!
//! Process metrics go through the `metrics` facade into the Prometheus
//! recorder installed by [`init_metrics`]. Without a recorder every call here
//! is a no-op, which keeps library use and unit tests free of global setup.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

const UPSTREAM_REQUESTS: &str = "market_stats_upstream_requests_total";
const UPSTREAM_LATENCY: &str = "market_stats_upstream_latency_seconds";
const POLL_CYCLES: &str = "market_stats_poll_cycles_total";
const POLL_CYCLE_DURATION: &str = "market_stats_poll_cycle_seconds";

/// Result of one request against the exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// 2xx with a decodable body
    Success,
    /// Non-2xx answer from the exchange
    Rejected,
    /// 2xx with a body that failed to decode
    Malformed,
    /// Connection, timeout or body read failure
    Failed,
}

impl UpstreamOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamOutcome::Success => "success",
            UpstreamOutcome::Rejected => "rejected",
            UpstreamOutcome::Malformed => "malformed",
            UpstreamOutcome::Failed => "failed",
        }
    }
}

/// Outcome of a poll cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Published,
    Failed,
}

impl CycleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CycleOutcome::Published => "published",
            CycleOutcome::Failed => "failed",
        }
    }
}

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Symbols carried by the latest snapshot
    TrackedSymbols,
    /// Seconds since the latest snapshot was published
    SnapshotAge,
}

impl GaugeMetric {
    fn name(&self) -> &'static str {
        match self {
            GaugeMetric::TrackedSymbols => "market_stats_tracked_symbols",
            GaugeMetric::SnapshotAge => "market_stats_snapshot_age_seconds",
        }
    }
}

/// Install the global Prometheus recorder
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics recorder: {}", e))
}

/// Count one exchange request and record its latency
pub fn record_upstream_request(endpoint: &'static str, outcome: UpstreamOutcome, elapsed: Duration) {
    metrics::counter!(UPSTREAM_REQUESTS, "endpoint" => endpoint, "outcome" => outcome.as_str())
        .increment(1);
    metrics::histogram!(UPSTREAM_LATENCY, "endpoint" => endpoint).record(elapsed.as_secs_f64());

    tracing::trace!(
        endpoint,
        outcome = outcome.as_str(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Recorded upstream request"
    );
}

/// Count one poll cycle and record how long it took
pub fn record_cycle(outcome: CycleOutcome, elapsed: Duration) {
    metrics::counter!(POLL_CYCLES, "outcome" => outcome.as_str()).increment(1);
    metrics::histogram!(POLL_CYCLE_DURATION).record(elapsed.as_secs_f64());
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: f64) {
    metrics::gauge!(metric.name()).set(value);
}
