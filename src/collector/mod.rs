//! # KV Secret Gauge Collection
//!
//! The pipeline behind the per-mount secret count gauge:
//!
//! 1. [`NamespaceEnumerator`] lists every namespace, root included.
//! 2. [`MountEnumerator`] keeps the KV mounts of each namespace and resolves
//!    their storage layout.
//! 3. [`SecretTreeWalker`] counts the leaves under each mount's layout root.
//! 4. [`KvSecretGaugeCollector`] runs the walks with bounded concurrency and
//!    folds the outcomes into samples.
//!
//! [`GaugeCollectionProcess`] repeats that on an interval and publishes the
//! samples through a [`MetricsSink`](crate::observability::MetricsSink).

pub mod gauge_collector;
pub mod mounts;
pub mod namespaces;
pub mod outcome;
pub mod process;
pub mod walker;

pub use gauge_collector::{KvSecretGaugeCollector, GAUGE_LABEL};
pub use mounts::{resolve_mount, MountEnumerator, MountListing};
pub use namespaces::{with_root_deduplicated, NamespaceEnumerator};
pub use outcome::{aggregate, MountFailure, MountReport, TickSummary, WalkOutcome};
pub use process::GaugeCollectionProcess;
pub use walker::SecretTreeWalker;
