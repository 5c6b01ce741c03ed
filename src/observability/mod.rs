//! # Observability Infrastructure
//!
//! Structured logging setup, the [`MetricsSink`] seam the collector reports
//! through, and the Prometheus-backed [`MetricsRecorder`].

pub mod logging;
pub mod metrics;
pub mod sink;

pub use logging::{init_logging, log_config_info};
pub use metrics::{gauge_idle_timeout, init_metrics, MetricsRecorder, GAUGE_RETENTION_TICKS};
pub use sink::{InMemorySink, MetricsSink};

use crate::config::AppConfig;
use crate::errors::Result;
use ::tracing::info;

/// Initialize logging and, when enabled, the Prometheus exporter.
///
/// Returns the recorder to hand to the collector, or `None` when export is
/// disabled.
pub async fn init_observability(config: &AppConfig) -> Result<Option<MetricsRecorder>> {
    init_logging(&config.observability)?;

    let recorder = init_metrics(&config.observability, &config.collector).await?;

    info!(
        service_name = %config.observability.service_name,
        log_level = %config.observability.log_level,
        metrics_enabled = %recorder.is_some(),
        "Observability initialized successfully"
    );

    Ok(recorder)
}
