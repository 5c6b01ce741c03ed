//! In-memory platform
//!
//! Holds namespaces, mount entries and flat per-mount key sets, and answers
//! the boundary traits from them. Failures can be injected per namespace,
//! per mount or per listed key.

use super::{MountTable, NamespaceSource, StorageView};
use crate::domain::{MountEntry, Namespace, ResolvedKvMount, DIRECTORY_SUFFIX};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeSet;
use std::ops::Bound;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// (namespace id, mount path)
type MountKey = (String, String);

fn mount_key(namespace: &Namespace, mount_path: &str) -> MountKey {
    (namespace.id.clone(), mount_path.to_string())
}

/// Immediate children of `prefix` within a sorted flat key set
fn immediate_children(keys: &BTreeSet<String>, prefix: &str) -> Vec<String> {
    let mut children = BTreeSet::new();
    for stored in keys.range::<str, _>((Bound::Included(prefix), Bound::Unbounded)) {
        let Some(rest) = stored.strip_prefix(prefix) else {
            break;
        };
        if rest.is_empty() {
            continue;
        }
        match rest.find(DIRECTORY_SUFFIX) {
            Some(idx) => children.insert(rest[..=idx].to_string()),
            None => children.insert(rest.to_string()),
        };
    }
    children.into_iter().collect()
}

/// Plain-data implementation of [`NamespaceSource`], [`MountTable`] and [`StorageView`]
#[derive(Debug, Default)]
pub struct InMemoryPlatform {
    namespaces: DashMap<String, Namespace>,
    mounts: DashMap<String, Vec<MountEntry>>,
    keys: DashMap<MountKey, BTreeSet<String>>,

    namespace_source_down: AtomicBool,
    failing_mount_tables: DashSet<String>,
    unreachable_mounts: DashSet<MountKey>,
    failing_keys: DashSet<(MountKey, String)>,
    stalled_mounts: DashSet<MountKey>,

    list_calls: AtomicUsize,
    list_calls_by_mount: DashMap<MountKey, usize>,
}

impl InMemoryPlatform {
    /// Create a platform containing only the root namespace
    pub fn new() -> Self {
        let platform = Self::default();
        platform.add_namespace(Namespace::root());
        platform
    }

    pub fn add_namespace(&self, namespace: Namespace) {
        self.namespaces.insert(namespace.id.clone(), namespace);
    }

    /// Add a mount entry; its storage starts empty
    pub fn mount(&self, namespace: &Namespace, entry: MountEntry) {
        self.keys.entry(mount_key(namespace, &entry.path)).or_default();
        self.mounts.entry(namespace.id.clone()).or_default().push(entry);
    }

    /// Drop a mount's storage while leaving its mount table entry in place
    pub fn remove_storage(&self, namespace: &Namespace, mount_path: &str) {
        self.keys.remove(&mount_key(namespace, mount_path));
    }

    /// Store a key relative to the mount root, e.g. `metadata/a/b`
    pub fn put(&self, namespace: &Namespace, mount_path: &str, key: &str) {
        self.keys.entry(mount_key(namespace, mount_path)).or_default().insert(key.to_string());
    }

    /// Store several keys under one mount
    pub fn put_all<'a>(
        &self,
        namespace: &Namespace,
        mount_path: &str,
        keys: impl IntoIterator<Item = &'a str>,
    ) {
        for key in keys {
            self.put(namespace, mount_path, key);
        }
    }

    pub fn delete(&self, namespace: &Namespace, mount_path: &str, key: &str) {
        if let Some(mut keys) = self.keys.get_mut(&mount_key(namespace, mount_path)) {
            keys.remove(key);
        }
    }

    /// Make `list_namespaces` fail (or recover)
    pub fn set_namespace_source_down(&self, down: bool) {
        self.namespace_source_down.store(down, Ordering::SeqCst);
    }

    /// Make the mount table of one namespace unreadable
    pub fn fail_mount_table(&self, namespace: &Namespace) {
        self.failing_mount_tables.insert(namespace.id.clone());
    }

    /// Make every list call against a mount fail
    pub fn make_unreachable(&self, namespace: &Namespace, mount_path: &str) {
        self.unreachable_mounts.insert(mount_key(namespace, mount_path));
    }

    /// Make list calls for one key of a mount fail
    pub fn fail_list_at(&self, namespace: &Namespace, mount_path: &str, key: &str) {
        self.failing_keys.insert((mount_key(namespace, mount_path), key.to_string()));
    }

    /// Make list calls against a mount hang until the caller gives up
    pub fn stall(&self, namespace: &Namespace, mount_path: &str) {
        self.stalled_mounts.insert(mount_key(namespace, mount_path));
    }

    /// Total list calls served so far
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// List calls served for one mount so far
    pub fn list_calls_for(&self, namespace: &Namespace, mount_path: &str) -> usize {
        self.list_calls_by_mount.get(&mount_key(namespace, mount_path)).map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl NamespaceSource for InMemoryPlatform {
    async fn list_namespaces(&self) -> Result<Vec<Namespace>> {
        if self.namespace_source_down.load(Ordering::SeqCst) {
            return Err(Error::namespace_source("namespace store unavailable"));
        }

        let mut namespaces: Vec<Namespace> =
            self.namespaces.iter().map(|entry| entry.value().clone()).collect();
        namespaces.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(namespaces)
    }
}

#[async_trait]
impl MountTable for InMemoryPlatform {
    async fn list_mounts(&self, namespace: &Namespace) -> Result<Vec<MountEntry>> {
        if self.failing_mount_tables.contains(&namespace.id) {
            return Err(Error::mount_table(namespace.label_value(), "mount table unavailable"));
        }

        Ok(self.mounts.get(&namespace.id).map(|entries| entries.clone()).unwrap_or_default())
    }
}

#[async_trait]
impl StorageView for InMemoryPlatform {
    async fn list_children(&self, mount: &ResolvedKvMount, key: &str) -> Result<Vec<String>> {
        let mount_key = mount_key(&mount.namespace, &mount.mount_point);

        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.list_calls_by_mount.entry(mount_key.clone()).or_insert(0) += 1;

        if self.stalled_mounts.contains(&mount_key) {
            std::future::pending::<()>().await;
        }

        if self.unreachable_mounts.contains(&mount_key) {
            return Err(Error::storage(&mount.mount_point, key, "storage backend unreachable"));
        }

        if self.failing_keys.contains(&(mount_key.clone(), key.to_string())) {
            return Err(Error::storage(&mount.mount_point, key, "list operation failed"));
        }

        let keys = self
            .keys
            .get(&mount_key)
            .ok_or_else(|| Error::unsupported_path(&mount.mount_point, key))?;

        Ok(immediate_children(&keys, key))
    }
}
