//! # Configuration Settings
//!
//! Defines the configuration structure for KV secret gauge collection.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Gauge collection configuration
    #[validate(nested)]
    pub collector: CollectorConfig,

    /// Observability configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;

        self.validate_custom()?;

        Ok(())
    }

    /// Checks that span more than one field
    fn validate_custom(&self) -> Result<()> {
        if self.collector.collection_timeout_seconds > self.collector.collection_interval_seconds {
            return Err(Error::validation_field(
                "Collection timeout cannot exceed the collection interval",
                "collector.collection_timeout_seconds",
            ));
        }

        if self.collector.gauge_name == self.collector.error_counter_name {
            return Err(Error::validation_field(
                "Gauge and error counter must have different names",
                "collector.error_counter_name",
            ));
        }

        Ok(())
    }
}

/// KV secret gauge collection configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CollectorConfig {
    /// Name of the per-mount secret count gauge
    #[validate(length(min = 1, message = "Gauge name cannot be empty"))]
    pub gauge_name: String,

    /// Name of the collection error counter
    #[validate(length(min = 1, message = "Error counter name cannot be empty"))]
    pub error_counter_name: String,

    /// Maximum number of mounts walked concurrently within one tick
    #[validate(range(
        min = 1,
        max = 64,
        message = "Max concurrent mounts must be between 1 and 64"
    ))]
    pub max_concurrent_mounts: usize,

    /// Seconds between collection ticks
    #[validate(range(
        min = 1,
        max = 86400,
        message = "Collection interval must be between 1 second and 24 hours"
    ))]
    pub collection_interval_seconds: u64,

    /// Deadline for a single tick in seconds
    #[validate(range(
        min = 1,
        max = 3600,
        message = "Collection timeout must be between 1 and 3600 seconds"
    ))]
    pub collection_timeout_seconds: u64,

    /// Maximum number of gauge samples published per tick
    #[validate(range(min = 1, message = "Max gauge cardinality must be at least 1"))]
    pub max_gauge_cardinality: usize,

    /// Mount types that belong to the key-value engine family
    #[validate(length(min = 1, message = "At least one KV engine type is required"))]
    pub kv_engine_types: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            gauge_name: "secret_kv_count".to_string(),
            error_counter_name: "metrics_collection_error".to_string(),
            max_concurrent_mounts: 4,
            collection_interval_seconds: 600, // 10 minutes
            collection_timeout_seconds: 60,
            max_gauge_cardinality: 500,
            kv_engine_types: vec!["kv".to_string(), "generic".to_string()],
        }
    }
}

impl CollectorConfig {
    /// Get the collection interval as Duration
    pub fn collection_interval(&self) -> Duration {
        Duration::from_secs(self.collection_interval_seconds)
    }

    /// Get the per-tick deadline as Duration
    pub fn collection_timeout(&self) -> Duration {
        Duration::from_secs(self.collection_timeout_seconds)
    }

    /// Histogram name for tick durations
    pub fn duration_histogram_name(&self) -> String {
        format!("{}_collection_duration_seconds", self.gauge_name)
    }
}

/// Observability configuration for logging and metrics export
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus exporter
    pub enable_metrics: bool,

    /// Metrics server port (0 = disabled)
    pub metrics_port: u16,

    /// Service name attached as a global metric label
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,

    /// Log level (trace, debug, info, warn, error)
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
            metrics_port: 9090,
            service_name: "kv-secret-metrics".to_string(),
            log_level: "info".to_string(),
            json_logging: false,
        }
    }
}

impl ObservabilityConfig {
    /// Get metrics bind address (None if disabled)
    pub fn metrics_bind_address(&self) -> Option<String> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(format!("0.0.0.0:{}", self.metrics_port))
        }
    }
}
