//! # Gauge Collection Process
//!
//! Recurring driver for [`KvSecretGaugeCollector`]. Each interval it runs one
//! tick under the configured deadline, caps the sample set and publishes the
//! survivors as gauges. Series published by the previous tick that have no
//! value in this one are retired from the sink.

use super::gauge_collector::KvSecretGaugeCollector;
use crate::domain::{cap_cardinality, GaugeSample};
use crate::errors::Result;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type SeriesLabels = Vec<(String, String)>;

pub struct GaugeCollectionProcess {
    collector: Arc<KvSecretGaugeCollector>,
    /// Label sets the last tick published
    published: Mutex<BTreeSet<SeriesLabels>>,
}

impl GaugeCollectionProcess {
    pub fn new(collector: Arc<KvSecretGaugeCollector>) -> Self {
        Self { collector, published: Mutex::new(BTreeSet::new()) }
    }

    pub fn collector(&self) -> &Arc<KvSecretGaugeCollector> {
        &self.collector
    }

    /// Run ticks on the configured interval until `shutdown` fires.
    ///
    /// The first tick runs immediately. A tick that fails is logged and the
    /// loop carries on with the next interval.
    pub async fn run(&self, shutdown: CancellationToken) {
        let config = self.collector.config();
        info!(
            gauge = %config.gauge_name,
            interval_seconds = config.collection_interval_seconds,
            timeout_seconds = config.collection_timeout_seconds,
            "Starting KV secret gauge collection"
        );

        let mut interval = tokio::time::interval(config.collection_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = interval.tick() => {}
            }

            match self.run_once(&shutdown).await {
                Ok(samples) => debug!(published = samples.len(), "Gauge collection tick finished"),
                Err(e) => error!(
                    gauge = %config.gauge_name,
                    error = %e,
                    "Gauge collection tick failed"
                ),
            }
        }

        info!(gauge = %config.gauge_name, "KV secret gauge collection stopped");
    }

    /// Spawn [`run`](Self::run) onto the runtime
    pub fn spawn(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move { self.run(shutdown).await })
    }

    /// One tick: collect under the deadline, cap, publish, record duration.
    ///
    /// When the deadline passes the tick's token is cancelled and whatever the
    /// walks finished by then is published. A mount without a published sample
    /// loses its series, and a failed tick retires every series. Returns the
    /// published samples.
    pub async fn run_once(&self, shutdown: &CancellationToken) -> Result<Vec<GaugeSample>> {
        let config = self.collector.config();
        let sink = self.collector.sink();
        let tick = shutdown.child_token();
        let started = Instant::now();

        let collection = self.collector.collect(&tick);
        tokio::pin!(collection);

        let deadline = tokio::time::timeout(config.collection_timeout(), &mut collection).await;
        let collected = match deadline {
            Ok(collected) => collected,
            Err(_) => {
                warn!(
                    gauge = %config.gauge_name,
                    timeout_seconds = config.collection_timeout_seconds,
                    "Gauge collection deadline exceeded, publishing partial results"
                );
                tick.cancel();
                collection.await
            }
        };

        sink.record_histogram(
            &config.duration_histogram_name(),
            &[],
            started.elapsed().as_secs_f64(),
        );

        let samples = match collected {
            Ok(samples) => samples,
            Err(e) => {
                self.retire_stale_series(BTreeSet::new()).await;
                return Err(e);
            }
        };
        let collected_count = samples.len();
        let samples = cap_cardinality(samples, config.max_gauge_cardinality);
        if samples.len() < collected_count {
            warn!(
                gauge = %config.gauge_name,
                collected = collected_count,
                published = samples.len(),
                "Gauge cardinality cap reached, dropping lowest-valued samples"
            );
        }

        let mut current = BTreeSet::new();
        for sample in &samples {
            let labels = sample.label_pairs();
            sink.set_gauge(&config.gauge_name, &labels, sample.value as f64);
            current.insert(labels);
        }
        self.retire_stale_series(current).await;

        Ok(samples)
    }

    async fn retire_stale_series(&self, current: BTreeSet<SeriesLabels>) {
        let config = self.collector.config();
        let mut published = self.published.lock().await;

        let mut retired = 0;
        for labels in published.difference(&current) {
            self.collector.sink().remove_gauge(&config.gauge_name, labels);
            retired += 1;
        }
        if retired > 0 {
            debug!(gauge = %config.gauge_name, retired, "Retired gauge series without a current value");
        }

        *published = current;
    }
}
