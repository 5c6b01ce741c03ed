//! # Structured Logging
//!
//! Installs the `tracing-subscriber` formatter and provides the span macro
//! used around a single mount walk.

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Create a tracing span for one mount walk
#[macro_export]
macro_rules! mount_span {
    ($mount:expr) => {
        tracing::debug_span!(
            "kv_mount_walk",
            namespace = %$mount.namespace.label_value(),
            mount_point = %$mount.mount_point,
            version = %$mount.version
        )
    };
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. Returns `Ok(false)` when a
/// subscriber was already installed.
pub fn init_logging(config: &ObservabilityConfig) -> Result<bool> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| {
            Error::config(format!("Invalid log level '{}': {}", config.log_level, e))
        })?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed =
        if config.json_logging { builder.json().try_init() } else { builder.try_init() };

    Ok(installed.is_ok())
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        gauge = %config.collector.gauge_name,
        interval_seconds = config.collector.collection_interval_seconds,
        timeout_seconds = config.collector.collection_timeout_seconds,
        max_concurrent_mounts = config.collector.max_concurrent_mounts,
        max_gauge_cardinality = config.collector.max_gauge_cardinality,
        kv_engine_types = ?config.collector.kv_engine_types,
        metrics_enabled = %config.observability.enable_metrics,
        "KV secret gauge configuration"
    );
}
