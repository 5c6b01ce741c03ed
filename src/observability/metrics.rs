//! # Metrics Collection
//!
//! [`MetricsRecorder`] forwards sink calls to the `metrics` crate facade, which
//! [`init_metrics`] backs with a Prometheus exporter.

use super::sink::MetricsSink;
use crate::config::{CollectorConfig, ObservabilityConfig};
use crate::errors::{Error, Result};
use ::tracing::{info, warn};
use metrics::{
    counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram, Label, Unit,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use metrics_util::MetricKindMask;
use std::net::SocketAddr;
use std::time::Duration;

/// Collection intervals a gauge series may go without an update before the
/// exporter drops it
pub const GAUGE_RETENTION_TICKS: u32 = 3;

/// How long the exporter keeps serving a gauge series nobody updates
pub fn gauge_idle_timeout(collector: &CollectorConfig) -> Duration {
    collector.collection_interval() * GAUGE_RETENTION_TICKS
}

fn to_labels(labels: &[(String, String)]) -> Vec<Label> {
    labels.iter().map(|(key, value)| Label::new(key.clone(), value.clone())).collect()
}

/// Sink backed by the process-wide `metrics` recorder
#[derive(Debug, Clone, Default)]
pub struct MetricsRecorder;

impl MetricsRecorder {
    /// Create a new metrics recorder instance
    pub fn new() -> Self {
        Self
    }

    /// Register descriptions so Prometheus exports the series before the first tick
    pub fn register_collector_metrics(&self, config: &CollectorConfig) {
        describe_gauge!(
            config.gauge_name.clone(),
            Unit::Count,
            "Number of stored KV secrets per mount point and namespace"
        );
        describe_counter!(
            config.error_counter_name.clone(),
            Unit::Count,
            "Gauge collection failures, one per failed mount walk"
        );
        describe_histogram!(
            config.duration_histogram_name(),
            Unit::Seconds,
            "Duration of one KV secret gauge collection tick"
        );

        counter!(config.error_counter_name.clone(), "gauge" => config.gauge_name.clone())
            .absolute(0);
    }
}

impl MetricsSink for MetricsRecorder {
    fn increment_counter(&self, name: &str, labels: &[(String, String)], value: u64) {
        counter!(name.to_string(), to_labels(labels)).increment(value);
    }

    fn set_gauge(&self, name: &str, labels: &[(String, String)], value: f64) {
        gauge!(name.to_string(), to_labels(labels)).set(value);
    }

    /// The facade cannot unregister a series: mark it NaN so scrapers see no
    /// current value, and let the exporter's idle timeout drop it.
    fn remove_gauge(&self, name: &str, labels: &[(String, String)]) {
        gauge!(name.to_string(), to_labels(labels)).set(f64::NAN);
    }

    fn record_histogram(&self, name: &str, labels: &[(String, String)], value: f64) {
        histogram!(name.to_string(), to_labels(labels)).record(value);
    }
}

/// Install the Prometheus exporter and describe the collector's metrics.
///
/// Returns `Ok(None)` when metrics are disabled or no port is configured.
pub async fn init_metrics(
    config: &ObservabilityConfig,
    collector: &CollectorConfig,
) -> Result<Option<MetricsRecorder>> {
    if !config.enable_metrics {
        return Ok(None);
    }

    let metrics_addr = match config.metrics_bind_address() {
        Some(addr) => addr,
        None => {
            warn!("Metrics disabled: no bind address configured");
            return Ok(None);
        }
    };

    let socket_addr: SocketAddr = metrics_addr.parse().map_err(|e| {
        Error::config(format!("Invalid metrics bind address '{}': {}", metrics_addr, e))
    })?;

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .add_global_label("service", &config.service_name)
        .idle_timeout(MetricKindMask::GAUGE, Some(gauge_idle_timeout(collector)))
        .install()
        .map_err(|e| Error::config(format!("Failed to initialize metrics exporter: {}", e)))?;

    let recorder = MetricsRecorder::new();
    recorder.register_collector_metrics(collector);

    info!(
        metrics_addr = %metrics_addr,
        service_name = %config.service_name,
        gauge = %collector.gauge_name,
        gauge_idle_timeout_seconds = gauge_idle_timeout(collector).as_secs(),
        "Metrics collection initialized"
    );

    Ok(Some(recorder))
}
