//! # Configuration Management
//!
//! Layered configuration: built-in defaults, then an optional file, then
//! `KV_METRICS__*` environment variables. The result is validated before use.

pub mod settings;

pub use settings::{AppConfig, CollectorConfig, ObservabilityConfig};

use crate::errors::Result;
use std::path::Path;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "KV_METRICS";

/// Separator between nested keys in environment variable names
pub const ENV_SEPARATOR: &str = "__";

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// `KV_METRICS__COLLECTOR__MAX_CONCURRENT_MOUNTS=8` overrides
    /// `collector.max_concurrent_mounts`. List values are comma separated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder =
            config::Config::builder().add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator(ENV_SEPARATOR)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("collector.kv_engine_types"),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from defaults and the environment only
    pub fn from_env() -> Result<Self> {
        Self::load(None)
    }
}
