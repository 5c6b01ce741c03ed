//! KV secret gauge collector
//!
//! One call to [`KvSecretGaugeCollector::collect`] is one tick: enumerate
//! namespaces, resolve their KV mounts, walk each mount with bounded
//! concurrency and turn the results into gauge samples.

use super::mounts::MountEnumerator;
use super::namespaces::NamespaceEnumerator;
use super::outcome::{aggregate, MountFailure, MountReport, TickSummary};
use super::walker::SecretTreeWalker;
use crate::config::CollectorConfig;
use crate::domain::GaugeSample;
use crate::errors::Result;
use crate::observability::MetricsSink;
use crate::storage::{MountTable, NamespaceSource, StorageView};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Label attached to the error counter
pub const GAUGE_LABEL: &str = "gauge";

pub struct KvSecretGaugeCollector {
    namespaces: NamespaceEnumerator,
    mounts: MountEnumerator,
    walker: SecretTreeWalker,
    sink: Arc<dyn MetricsSink>,
    config: CollectorConfig,
}

impl KvSecretGaugeCollector {
    pub fn new(
        namespace_source: Arc<dyn NamespaceSource>,
        mount_table: Arc<dyn MountTable>,
        storage: Arc<dyn StorageView>,
        sink: Arc<dyn MetricsSink>,
        config: CollectorConfig,
    ) -> Self {
        Self {
            namespaces: NamespaceEnumerator::new(namespace_source),
            mounts: MountEnumerator::new(mount_table, config.kv_engine_types.clone()),
            walker: SecretTreeWalker::new(storage),
            sink,
            config,
        }
    }

    /// Build a collector from one value that answers all three boundary traits
    pub fn from_platform<P>(
        platform: Arc<P>,
        sink: Arc<dyn MetricsSink>,
        config: CollectorConfig,
    ) -> Self
    where
        P: NamespaceSource + MountTable + StorageView + 'static,
    {
        Self::new(platform.clone(), platform.clone(), platform, sink, config)
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    pub fn sink(&self) -> &Arc<dyn MetricsSink> {
        &self.sink
    }

    /// Run one tick and return its samples, sorted by (namespace, mount_point).
    ///
    /// Failed mounts are left out and bump the error counter once each.
    /// Mounts cut short by `cancel` are left out without counting as errors.
    ///
    /// # Errors
    ///
    /// Only a namespace source failure aborts the tick.
    pub async fn collect(&self, cancel: &CancellationToken) -> Result<Vec<GaugeSample>> {
        Ok(self.collect_summary(cancel).await?.samples)
    }

    /// Like [`collect`](Self::collect) but also returns failed and cancelled mounts
    pub async fn collect_summary(&self, cancel: &CancellationToken) -> Result<TickSummary> {
        if cancel.is_cancelled() {
            debug!("Collection cancelled before it started");
            return Ok(TickSummary::default());
        }

        let namespaces = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(TickSummary::default()),
            listed = self.namespaces.enumerate() => listed,
        };
        let namespaces = namespaces.map_err(|e| {
            error!(gauge = %self.config.gauge_name, error = %e, "Failed to enumerate namespaces");
            e
        })?;

        let listing = self.mounts.enumerate_all(&namespaces, cancel).await;
        debug!(
            namespaces = namespaces.len(),
            mounts = listing.mounts.len(),
            namespaces_skipped = listing.namespaces_skipped,
            "Walking KV mounts"
        );

        let walker = &self.walker;
        let reports: Vec<MountReport> = stream::iter(listing.mounts)
            .map(|mount| async move {
                let outcome = walker.walk(&mount, cancel).await;
                MountReport::new(mount, outcome)
            })
            .buffer_unordered(self.config.max_concurrent_mounts.max(1))
            .collect()
            .await;

        let mut summary = aggregate(reports);
        summary.namespaces_skipped = listing.namespaces_skipped;
        for failure in &summary.failures {
            self.record_failure(failure);
        }

        info!(
            gauge = %self.config.gauge_name,
            namespaces = namespaces.len(),
            samples = summary.samples.len(),
            failed = summary.failures.len(),
            cancelled = summary.cancelled.len(),
            namespaces_skipped = summary.namespaces_skipped,
            secrets = summary.secrets_total(),
            "KV secret gauge collected"
        );

        Ok(summary)
    }

    fn record_failure(&self, failure: &MountFailure) {
        let namespace = failure.mount.namespace.label_value();
        if failure.error.is_unsupported_path() {
            debug!(
                namespace = %namespace,
                mount_point = %failure.mount.mount_point,
                error = %failure.error,
                "KV mount storage not listable"
            );
        } else {
            error!(
                namespace = %namespace,
                mount_point = %failure.mount.mount_point,
                error = %failure.error,
                error_kind = failure.error.kind(),
                "Failed to perform internal KV list"
            );
        }

        self.sink.increment_counter(
            &self.config.error_counter_name,
            &[(GAUGE_LABEL.to_string(), self.config.gauge_name.clone())],
            1,
        );
    }
}
