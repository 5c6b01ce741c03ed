//! Mount table entries and their resolved KV form

use super::namespace::Namespace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Mount option naming the KV storage layout
pub const VERSION_OPTION: &str = "version";

/// Reserved prefix under which a versioned mount keeps live secret metadata
pub const METADATA_PREFIX: &str = "metadata/";

/// Suffix marking a listed child as a sub-directory
pub const DIRECTORY_SUFFIX: char = '/';

/// A configured secret engine attached at a path within a namespace.
///
/// Owned by the external mount table; read-only here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountEntry {
    /// Mount path, unique within its namespace (e.g. `secret/`, `prefix/secret4/`)
    pub path: String,
    /// Secret engine type (e.g. `kv`, `generic`, `pki`)
    pub engine_type: String,
    /// Engine configuration options
    #[serde(default)]
    pub options: HashMap<String, String>,
}

impl MountEntry {
    pub fn new(path: impl Into<String>, engine_type: impl Into<String>) -> Self {
        Self { path: path.into(), engine_type: engine_type.into(), options: HashMap::new() }
    }

    /// Set a configuration option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Shorthand for a KV mount with an explicit `version` option
    pub fn kv(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self::new(path, "kv").with_option(VERSION_OPTION, version)
    }

    /// Raw `version` option, if present
    pub fn version_option(&self) -> Option<&str> {
        self.options.get(VERSION_OPTION).map(String::as_str)
    }
}

/// Storage layout of a KV mount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KvVersion {
    /// Version 1: secrets live directly under the mount root
    Unversioned,
    /// Version 2: live secrets are virtualized under `metadata/`
    Versioned,
}

impl KvVersion {
    /// Interpret a mount's `version` option.
    ///
    /// Missing, empty and `"1"` mean [`KvVersion::Unversioned`], `"2"` means
    /// [`KvVersion::Versioned`]. Any other value returns `None`; the caller
    /// decides the fallback.
    pub fn from_option(value: Option<&str>) -> Option<Self> {
        match value {
            None | Some("") | Some("1") => Some(Self::Unversioned),
            Some("2") => Some(Self::Versioned),
            Some(_) => None,
        }
    }

    /// Key at which a walk of this layout starts, relative to the mount root
    pub fn root_prefix(&self) -> &'static str {
        match self {
            Self::Unversioned => "",
            Self::Versioned => METADATA_PREFIX,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unversioned => "1",
            Self::Versioned => "2",
        }
    }
}

impl fmt::Display for KvVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A KV mount resolved for one collection tick.
///
/// Built fresh every tick and discarded once its gauge sample is emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKvMount {
    pub namespace: Namespace,
    pub mount_point: String,
    pub version: KvVersion,
    /// Leaf secrets found by the walk; zero until the walk completes
    pub num_secrets: u64,
}

impl ResolvedKvMount {
    /// Skeleton record with no count computed yet
    pub fn new(namespace: Namespace, mount_point: impl Into<String>, version: KvVersion) -> Self {
        Self { namespace, mount_point: mount_point.into(), version, num_secrets: 0 }
    }

    /// Same mount with its secret count filled in
    pub fn with_count(mut self, num_secrets: u64) -> Self {
        self.num_secrets = num_secrets;
        self
    }
}
