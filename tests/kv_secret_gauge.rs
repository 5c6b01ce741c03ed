//! Integration tests for KV secret gauge collection
//!
//! Exercise a full tick against an in-memory platform: counting per layout,
//! labels, zero-count mounts, namespaces and repeatability.

mod common;

use common::{
    collector_for, counts_by_mount, counts_by_series, expected_reference_counts,
    reference_platform,
};
use kv_secret_metrics::{InMemoryPlatform, MountEntry, Namespace};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

#[tokio::test]
async fn test_reference_scenario_counts() {
    let (collector, sink) = collector_for(reference_platform());

    let samples = collector.collect(&CancellationToken::new()).await.unwrap();

    assert_eq!(samples.len(), 5);
    assert_eq!(counts_by_mount(&samples), expected_reference_counts());
    assert_eq!(sink.counter_total(&collector.config().error_counter_name), 0);
}

#[tokio::test]
async fn test_every_sample_has_exactly_namespace_and_mount_point() {
    let (collector, _sink) = collector_for(reference_platform());

    let samples = collector.collect(&CancellationToken::new()).await.unwrap();

    for sample in &samples {
        let mut names: Vec<_> = sample.labels.iter().map(|l| l.name.as_str()).collect();
        names.sort();
        assert_eq!(names, vec!["mount_point", "namespace"]);
        assert_eq!(sample.namespace(), Some("root"));
    }
}

#[tokio::test]
async fn test_samples_are_sorted_by_labels() {
    let (collector, _sink) = collector_for(reference_platform());

    let samples = collector.collect(&CancellationToken::new()).await.unwrap();

    let mounts: Vec<_> = samples.iter().filter_map(|s| s.mount_point()).collect();
    assert_eq!(mounts, vec!["prefix/secret4/", "secret/", "secret1/", "secret2/", "secret3/"]);
}

#[tokio::test]
async fn test_two_ticks_are_identical() {
    let (collector, _sink) = collector_for(reference_platform());

    let first = collector.collect(&CancellationToken::new()).await.unwrap();
    let second = collector.collect(&CancellationToken::new()).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_mutations_show_up_on_next_tick() {
    let platform = reference_platform();
    let root = Namespace::root();
    let (collector, _sink) = collector_for(platform.clone());

    let before = counts_by_mount(&collector.collect(&CancellationToken::new()).await.unwrap());

    platform.put(&root, "secret2/", "fresh/key");
    platform.delete(&root, "secret1/", "c/d");
    platform.put(&root, "secret/", "versions/only-history/1");

    let after = counts_by_mount(&collector.collect(&CancellationToken::new()).await.unwrap());

    assert_eq!(before["secret2/"], 0);
    assert_eq!(after["secret2/"], 1);
    assert_eq!(after["secret1/"], before["secret1/"] - 1);
    assert_eq!(after["secret/"], 0);
}

#[tokio::test]
async fn test_child_namespaces_are_labeled_by_path() {
    let platform = Arc::new(InMemoryPlatform::new());
    let root = Namespace::root();
    let team = Namespace::new("nsA1", "team-a/");
    let nested = Namespace::new("nsB2", "team-a/payments/");
    platform.add_namespace(team.clone());
    platform.add_namespace(nested.clone());

    platform.mount(&root, MountEntry::kv("secret/", "2"));
    platform.mount(&team, MountEntry::kv("secret/", "2"));
    platform.mount(&nested, MountEntry::kv("kv/", "1"));
    platform.put_all(&root, "secret/", ["metadata/x"]);
    platform.put_all(&team, "secret/", ["metadata/x", "metadata/y"]);
    platform.put_all(&nested, "kv/", ["a", "b", "c"]);

    let (collector, _sink) = collector_for(platform);
    let samples = collector.collect(&CancellationToken::new()).await.unwrap();

    let by_series = counts_by_series(&samples);
    assert_eq!(by_series.len(), 3);
    assert_eq!(by_series[&("root".to_string(), "secret/".to_string())], 1);
    assert_eq!(by_series[&("team-a/".to_string(), "secret/".to_string())], 2);
    assert_eq!(by_series[&("team-a/payments/".to_string(), "kv/".to_string())], 3);
}

#[tokio::test]
async fn test_non_kv_mounts_are_ignored() {
    let platform = reference_platform();
    let root = Namespace::root();
    platform.mount(&root, MountEntry::new("pki/", "pki"));
    platform.mount(&root, MountEntry::new("transit/", "transit"));
    platform.put(&root, "pki/", "certs/abc");
    platform.mount(&root, MountEntry::new("legacy/", "generic"));
    platform.put(&root, "legacy/", "old");

    let (collector, _sink) = collector_for(platform.clone());
    let samples = collector.collect(&CancellationToken::new()).await.unwrap();

    let counts = counts_by_mount(&samples);
    assert_eq!(samples.len(), 6);
    assert_eq!(counts["legacy/"], 1);
    assert!(!counts.contains_key("pki/"));
    assert_eq!(platform.list_calls_for(&root, "pki/"), 0);
}

#[traced_test]
#[tokio::test]
async fn test_unknown_version_walks_as_unversioned() {
    let platform = Arc::new(InMemoryPlatform::new());
    let root = Namespace::root();
    platform.mount(&root, MountEntry::kv("odd/", "3"));
    platform.put_all(&root, "odd/", ["metadata/a", "b"]);

    let (collector, _sink) = collector_for(platform);
    let samples = collector.collect(&CancellationToken::new()).await.unwrap();

    assert_eq!(counts_by_mount(&samples)["odd/"], 2);
    assert!(logs_contain("Unrecognized KV version option"));
}

#[tokio::test]
async fn test_bounded_concurrency_still_visits_every_mount() {
    let platform = Arc::new(InMemoryPlatform::new());
    let root = Namespace::root();
    for i in 0..20 {
        let mount = format!("kv{i:02}/");
        platform.mount(&root, MountEntry::kv(mount.as_str(), "1"));
        for j in 0..i {
            platform.put(&root, &mount, &format!("dir{}/k{j}", j % 3));
        }
    }

    let config = kv_secret_metrics::CollectorConfig {
        max_concurrent_mounts: 1,
        ..Default::default()
    };
    let (collector, _sink) = common::collector_with(platform, config);
    let samples = collector.collect(&CancellationToken::new()).await.unwrap();

    assert_eq!(samples.len(), 20);
    for (i, sample) in samples.iter().enumerate() {
        assert_eq!(sample.value, i as u64);
    }
}
