//! Breadth-first secret tree walk over one mount

use super::outcome::WalkOutcome;
use crate::domain::{ResolvedKvMount, DIRECTORY_SUFFIX};
use crate::storage::StorageView;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, Instrument};

/// Counts the leaves under a mount's layout root
#[derive(Clone)]
pub struct SecretTreeWalker {
    storage: Arc<dyn StorageView>,
}

impl SecretTreeWalker {
    pub fn new(storage: Arc<dyn StorageView>) -> Self {
        Self { storage }
    }

    /// Walk one mount.
    ///
    /// Children ending in `/` are directories and get listed in turn; every
    /// other non-empty child counts as one secret. The first failing list call
    /// ends the walk. Cancellation is checked before every list call.
    pub async fn walk(&self, mount: &ResolvedKvMount, cancel: &CancellationToken) -> WalkOutcome {
        let span = crate::mount_span!(mount);
        self.walk_tree(mount, cancel).instrument(span).await
    }

    async fn walk_tree(&self, mount: &ResolvedKvMount, cancel: &CancellationToken) -> WalkOutcome {
        let mut pending = VecDeque::from([mount.version.root_prefix().to_string()]);
        let mut secrets = 0u64;

        while let Some(directory) = pending.pop_front() {
            let listed = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!(secrets, pending = pending.len() + 1, "Walk cancelled");
                    return WalkOutcome::Cancelled { partial: secrets };
                }
                listed = self.storage.list_children(mount, &directory) => listed,
            };

            let children = match listed {
                Ok(children) => children,
                Err(error) => {
                    debug!(key = %directory, error = %error, "List call failed, abandoning walk");
                    return WalkOutcome::Failed { error };
                }
            };

            for child in children {
                if child.is_empty() {
                    continue;
                }
                if child.ends_with(DIRECTORY_SUFFIX) {
                    pending.push_back(format!("{directory}{child}"));
                } else {
                    secrets += 1;
                }
            }
        }

        debug!(secrets, "Walk complete");
        WalkOutcome::Complete { secrets }
    }
}
