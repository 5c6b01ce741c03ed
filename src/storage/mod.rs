//! # Platform Boundary
//!
//! The secrets platform is an external collaborator. Collection only needs
//! three read-only views of it:
//!
//! - [`NamespaceSource`]: the tenant namespace tree
//! - [`MountTable`]: the mounts configured in one namespace
//! - [`StorageView`]: "list children at key", scoped to one mount
//!
//! [`InMemoryPlatform`] implements all three from plain data for tests and
//! local runs.

pub mod memory;

pub use memory::InMemoryPlatform;

use crate::domain::{MountEntry, Namespace, ResolvedKvMount};
use crate::errors::Result;
use async_trait::async_trait;

/// Source of tenant namespaces
#[async_trait]
pub trait NamespaceSource: Send + Sync {
    /// List every namespace in the tree.
    ///
    /// # Errors
    ///
    /// An error here means the tree itself is inaccessible and aborts the tick.
    async fn list_namespaces(&self) -> Result<Vec<Namespace>>;
}

/// Read access to the mount table
#[async_trait]
pub trait MountTable: Send + Sync {
    /// List all mount entries of one namespace, of any engine type
    async fn list_mounts(&self, namespace: &Namespace) -> Result<Vec<MountEntry>>;
}

/// Logical storage listing scoped to a mount
#[async_trait]
pub trait StorageView: Send + Sync {
    /// List the immediate children of `key` under the mount's root.
    ///
    /// `key` is relative to the mount and is either empty or ends with `/`.
    /// Children that end with `/` are sub-directories; all others are leaf
    /// secrets. A key with nothing under it yields an empty list.
    async fn list_children(&self, mount: &ResolvedKvMount, key: &str) -> Result<Vec<String>>;
}
