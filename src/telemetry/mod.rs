//! Telemetry module
//!
//! Logging, process metrics and the snapshot exporter

mod exporter;
mod logging;
mod metrics;

pub use exporter::render_snapshot;
pub use logging::init_logging;
pub use metrics::{
    init_metrics, record_cycle, record_upstream_request, set_gauge, CycleOutcome, GaugeMetric,
    UpstreamOutcome,
};

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusHandle;

/// Handles kept alive for the lifetime of the process
pub struct TelemetryGuard {
    pub metrics: PrometheusHandle,
}

/// Initialize all telemetry subsystems
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;
    let metrics = init_metrics()?;

    tracing::debug!(
        level = %config.log_level,
        format = ?config.log_format,
        "Telemetry initialized"
    );

    Ok(TelemetryGuard { metrics })
}
