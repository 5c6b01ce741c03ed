//! Common test utilities for all integration tests.
//!
//! Provides platform fixtures and helpers for reading collector output.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use kv_secret_metrics::{
    CollectorConfig, GaugeSample, InMemoryPlatform, InMemorySink, KvSecretGaugeCollector,
    MountEntry, Namespace,
};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mounts and keys of the reference scenario
///
/// | mount             | version | secrets |
/// |-------------------|---------|---------|
/// | `secret/`         | 2       | 0       |
/// | `secret1/`        | 1       | 3       |
/// | `secret2/`        | 1       | 0       |
/// | `secret3/`        | 2       | 4       |
/// | `prefix/secret4/` | 2       | 5       |
pub fn reference_platform() -> Arc<InMemoryPlatform> {
    let platform = Arc::new(InMemoryPlatform::new());
    let root = Namespace::root();

    platform.mount(&root, MountEntry::kv("secret/", "2"));
    platform.mount(&root, MountEntry::kv("secret1/", "1"));
    platform.mount(&root, MountEntry::kv("secret2/", "1"));
    platform.mount(&root, MountEntry::kv("secret3/", "2"));
    platform.mount(&root, MountEntry::kv("prefix/secret4/", "2"));

    platform.put_all(&root, "secret1/", ["a", "b", "c/d"]);
    platform.put_all(
        &root,
        "secret3/",
        [
            "metadata/a",
            "metadata/b",
            "metadata/c/d",
            "metadata/c/e",
            // version history lives beside the metadata tree and is never counted
            "versions/a/1",
            "versions/a/2",
            "versions/c/d/1",
        ],
    );
    platform.put_all(
        &root,
        "prefix/secret4/",
        [
            "metadata/a/secret",
            "metadata/a/secret2",
            "metadata/a/b/c/secret",
            "metadata/a/b/c/secret2",
            "metadata/a/b/c/d/secret3",
        ],
    );

    platform
}

pub fn expected_reference_counts() -> BTreeMap<String, u64> {
    [("prefix/secret4/", 5), ("secret/", 0), ("secret1/", 3), ("secret2/", 0), ("secret3/", 4)]
        .into_iter()
        .map(|(mount, count)| (mount.to_string(), count))
        .collect()
}

pub fn collector_with(
    platform: Arc<InMemoryPlatform>,
    config: CollectorConfig,
) -> (Arc<KvSecretGaugeCollector>, Arc<InMemorySink>) {
    let sink = Arc::new(InMemorySink::new());
    let collector = KvSecretGaugeCollector::from_platform(platform, sink.clone(), config);
    (Arc::new(collector), sink)
}

pub fn collector_for(
    platform: Arc<InMemoryPlatform>,
) -> (Arc<KvSecretGaugeCollector>, Arc<InMemorySink>) {
    collector_with(platform, CollectorConfig::default())
}

/// mount_point → value, for samples of a single namespace
pub fn counts_by_mount(samples: &[GaugeSample]) -> BTreeMap<String, u64> {
    samples
        .iter()
        .filter_map(|s| s.mount_point().map(|m| (m.to_string(), s.value)))
        .collect()
}

/// (namespace, mount_point) → value
pub fn counts_by_series(samples: &[GaugeSample]) -> BTreeMap<(String, String), u64> {
    samples
        .iter()
        .filter_map(|s| match (s.namespace(), s.mount_point()) {
            (Some(ns), Some(m)) => Some(((ns.to_string(), m.to_string()), s.value)),
            _ => None,
        })
        .collect()
}

/// Labels the error counter is recorded under
pub fn error_counter_labels(config: &CollectorConfig) -> Vec<(String, String)> {
    vec![("gauge".to_string(), config.gauge_name.clone())]
}

pub fn gauge_labels(namespace: &str, mount_point: &str) -> Vec<(String, String)> {
    vec![
        ("namespace".to_string(), namespace.to_string()),
        ("mount_point".to_string(), mount_point.to_string()),
    ]
}
