//! Mount enumeration and KV layout resolution

use crate::domain::{KvVersion, MountEntry, Namespace, ResolvedKvMount};
use crate::errors::{Error, Result};
use crate::storage::MountTable;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// KV mounts found across a list of namespaces
#[derive(Debug, Default)]
pub struct MountListing {
    pub mounts: Vec<ResolvedKvMount>,
    /// Namespaces never reached because the tick was cancelled
    pub namespaces_skipped: usize,
}

/// Lists the KV mounts of each namespace and resolves their layout
#[derive(Clone)]
pub struct MountEnumerator {
    table: Arc<dyn MountTable>,
    kv_engine_types: Vec<String>,
}

impl MountEnumerator {
    pub fn new(table: Arc<dyn MountTable>, kv_engine_types: Vec<String>) -> Self {
        Self { table, kv_engine_types }
    }

    fn is_kv(&self, entry: &MountEntry) -> bool {
        self.kv_engine_types.iter().any(|t| *t == entry.engine_type)
    }

    /// KV mounts of one namespace as skeleton records, zero-count mounts included.
    ///
    /// # Errors
    ///
    /// A mount table failure is reported as [`Error::MountTable`] and only
    /// concerns this namespace.
    pub async fn enumerate(&self, namespace: &Namespace) -> Result<Vec<ResolvedKvMount>> {
        let entries = self.table.list_mounts(namespace).await.map_err(|e| match e {
            Error::MountTable { .. } => e,
            other => Error::mount_table(namespace.label_value(), other.to_string()),
        })?;

        Ok(entries
            .into_iter()
            .filter(|entry| self.is_kv(entry))
            .map(|entry| resolve_mount(namespace, entry))
            .collect())
    }

    /// KV mounts across all namespaces.
    ///
    /// Namespaces whose mount table is unreadable contribute nothing; the rest
    /// are unaffected. Stops early once `cancel` fires and reports how many
    /// namespaces it never reached.
    pub async fn enumerate_all(
        &self,
        namespaces: &[Namespace],
        cancel: &CancellationToken,
    ) -> MountListing {
        let mut listing = MountListing::default();

        for (index, namespace) in namespaces.iter().enumerate() {
            let listed = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    listing.namespaces_skipped = namespaces.len() - index;
                    debug!(
                        namespace = %namespace.label_value(),
                        skipped = listing.namespaces_skipped,
                        "Mount enumeration cancelled"
                    );
                    break;
                }
                listed = self.enumerate(namespace) => listed,
            };

            match listed {
                Ok(found) => listing.mounts.extend(found),
                Err(error) => warn!(
                    namespace = %namespace.label_value(),
                    error = %error,
                    error_kind = error.kind(),
                    "Skipping namespace, mount table unavailable"
                ),
            }
        }

        listing
    }
}

/// Build the skeleton record for one KV mount entry.
///
/// An unrecognized `version` option falls back to the unversioned layout.
pub fn resolve_mount(namespace: &Namespace, entry: MountEntry) -> ResolvedKvMount {
    let version = KvVersion::from_option(entry.version_option()).unwrap_or_else(|| {
        warn!(
            namespace = %namespace.label_value(),
            mount_point = %entry.path,
            version = ?entry.version_option(),
            "Unrecognized KV version option, walking mount as unversioned"
        );
        KvVersion::Unversioned
    });

    ResolvedKvMount::new(namespace.clone(), entry.path, version)
}
