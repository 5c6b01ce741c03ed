//! # kv-secret-metrics
//!
//! Point-in-time gauges counting the secrets stored in every key-value mount
//! of a multi-tenant secrets platform, labeled by namespace and mount point.
//!
//! ## Architecture
//!
//! ```text
//! NamespaceSource → MountTable → StorageView          (platform boundary)
//!        ↓               ↓            ↓
//! NamespaceEnumerator → MountEnumerator → SecretTreeWalker
//!                                  ↓
//!                      KvSecretGaugeCollector → MetricsSink
//!                                  ↑
//!                      GaugeCollectionProcess (interval + deadline)
//! ```
//!
//! The collector only ever lists keys. Each KV mount is walked breadth-first
//! from its layout root (`""` for unversioned mounts, `metadata/` for
//! versioned ones) and every leaf counts as one secret.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use kv_secret_metrics::{
//!     AppConfig, GaugeCollectionProcess, InMemoryPlatform, KvSecretGaugeCollector,
//!     MetricsRecorder, Result,
//! };
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::from_env()?;
//!     let recorder = kv_secret_metrics::observability::init_observability(&config)
//!         .await?
//!         .unwrap_or_default();
//!
//!     let platform = Arc::new(InMemoryPlatform::new());
//!     let collector = KvSecretGaugeCollector::from_platform(
//!         platform,
//!         Arc::new(recorder),
//!         config.collector.clone(),
//!     );
//!
//!     let shutdown = CancellationToken::new();
//!     GaugeCollectionProcess::new(Arc::new(collector)).run(shutdown).await;
//!     Ok(())
//! }
//! ```

pub mod collector;
pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod storage;

// Re-export commonly used types and traits
pub use collector::{GaugeCollectionProcess, KvSecretGaugeCollector, SecretTreeWalker};
pub use config::{AppConfig, CollectorConfig, ObservabilityConfig};
pub use domain::{GaugeSample, KvVersion, MountEntry, Namespace, ResolvedKvMount};
pub use errors::{Error, Result};
pub use observability::{InMemorySink, MetricsRecorder, MetricsSink};
pub use storage::{InMemoryPlatform, MountTable, NamespaceSource, StorageView};

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
