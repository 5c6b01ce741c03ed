//! Integration tests for tick cancellation
//!
//! A stalled mount must not hold the tick hostage: once the token fires the
//! collector returns promptly with what the other mounts produced.

mod common;

use common::{collector_for, collector_with, counts_by_mount, reference_platform};
use kv_secret_metrics::{CollectorConfig, GaugeCollectionProcess, Namespace};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_cancel_returns_partial_results() {
    let platform = reference_platform();
    platform.stall(&Namespace::root(), "secret3/");

    let (collector, sink) = collector_for(platform);
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = Instant::now();
    let summary = tokio::time::timeout(Duration::from_secs(5), collector.collect_summary(&cancel))
        .await
        .expect("collection did not honor cancellation")
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(summary.samples.len(), 4);
    assert!(!counts_by_mount(&summary.samples).contains_key("secret3/"));
    assert_eq!(summary.cancelled.len(), 1);
    assert_eq!(summary.cancelled[0].mount_point, "secret3/");

    // cut short is not the same as failed
    assert_eq!(sink.counter_total(&collector.config().error_counter_name), 0);
}

#[tokio::test]
async fn test_pre_cancelled_tick_lists_nothing() {
    let platform = reference_platform();
    let (collector, _sink) = collector_for(platform.clone());

    let cancel = CancellationToken::new();
    cancel.cancel();

    let samples = collector.collect(&cancel).await.unwrap();
    assert!(samples.is_empty());
    assert_eq!(platform.list_calls(), 0);
}

#[tokio::test]
async fn test_deadline_publishes_partial_results() {
    let platform = reference_platform();
    platform.stall(&Namespace::root(), "prefix/secret4/");

    let config = CollectorConfig { collection_timeout_seconds: 1, ..Default::default() };
    let (collector, sink) = collector_with(platform, config);
    let process = GaugeCollectionProcess::new(collector.clone());

    let samples = tokio::time::timeout(
        Duration::from_secs(10),
        process.run_once(&CancellationToken::new()),
    )
    .await
    .expect("deadline was not enforced")
    .unwrap();

    let counts = counts_by_mount(&samples);
    assert_eq!(samples.len(), 4);
    assert!(!counts.contains_key("prefix/secret4/"));
    assert_eq!(sink.gauge_series(&collector.config().gauge_name), 4);
    assert_eq!(sink.histogram_count(&collector.config().duration_histogram_name()), 1);
    assert_eq!(sink.counter_total(&collector.config().error_counter_name), 0);
}

#[tokio::test]
async fn test_shutdown_cancels_running_tick() {
    let platform = reference_platform();
    platform.stall(&Namespace::root(), "secret1/");

    let (collector, _sink) = collector_for(platform);
    let process = Arc::new(GaugeCollectionProcess::new(collector));
    let shutdown = CancellationToken::new();

    let handle = process.spawn(shutdown.clone());
    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown.cancel();

    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("process did not stop on shutdown")
        .unwrap();
}
