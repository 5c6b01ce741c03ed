//! Domain layer
//!
//! Plain data types for KV secret gauge collection with no infrastructure
//! dependencies: namespaces, mount entries, resolved KV mounts and the gauge
//! samples produced from them.

pub mod gauge;
pub mod mount;
pub mod namespace;

pub use gauge::{
    cap_cardinality, sort_samples, GaugeLabel, GaugeSample, MOUNT_POINT_LABEL, NAMESPACE_LABEL,
};
pub use mount::{
    KvVersion, MountEntry, ResolvedKvMount, DIRECTORY_SUFFIX, METADATA_PREFIX, VERSION_OPTION,
};
pub use namespace::{Namespace, ROOT_NAMESPACE_ID, ROOT_NAMESPACE_LABEL};
