//! Tenant namespaces

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the root namespace
pub const ROOT_NAMESPACE_ID: &str = "root";

/// Label value reported for the root namespace
pub const ROOT_NAMESPACE_LABEL: &str = "root";

/// An isolated tenant scope.
///
/// Namespaces form a tree rooted at [`Namespace::root`]; this crate only uses
/// them as scoping keys and never mutates them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Stable identifier, unique across the tree
    pub id: String,
    /// Path from the root, e.g. `team-a/` or `team-a/payments/`; empty for root
    pub path: String,
}

impl Namespace {
    /// Create a namespace from its identifier and path
    pub fn new(id: impl Into<String>, path: impl Into<String>) -> Self {
        Self { id: id.into(), path: path.into() }
    }

    /// The root namespace
    pub fn root() -> Self {
        Self::new(ROOT_NAMESPACE_ID, "")
    }

    pub fn is_root(&self) -> bool {
        self.id == ROOT_NAMESPACE_ID
    }

    /// Value for the `namespace` gauge label
    pub fn label_value(&self) -> &str {
        if self.is_root() {
            ROOT_NAMESPACE_LABEL
        } else {
            &self.path
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label_value())
    }
}
