//! Labeled gauge samples

use super::mount::ResolvedKvMount;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Label carrying the mount path
pub const MOUNT_POINT_LABEL: &str = "mount_point";

/// Label carrying the namespace path (`root` for the root namespace)
pub const NAMESPACE_LABEL: &str = "namespace";

/// A single (name, value) label pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GaugeLabel {
    pub name: String,
    pub value: String,
}

impl GaugeLabel {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }
}

/// A labeled point-in-time secret count.
///
/// Samples built through [`GaugeSample::for_mount`] carry exactly the
/// `namespace` and `mount_point` labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GaugeSample {
    pub labels: Vec<GaugeLabel>,
    pub value: u64,
}

impl GaugeSample {
    /// Sample for a mount whose walk completed
    pub fn for_mount(mount: &ResolvedKvMount) -> Self {
        Self {
            labels: vec![
                GaugeLabel::new(NAMESPACE_LABEL, mount.namespace.label_value()),
                GaugeLabel::new(MOUNT_POINT_LABEL, mount.mount_point.clone()),
            ],
            value: mount.num_secrets,
        }
    }

    /// Look up a label value by name
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.iter().find(|l| l.name == name).map(|l| l.value.as_str())
    }

    pub fn mount_point(&self) -> Option<&str> {
        self.label(MOUNT_POINT_LABEL)
    }

    pub fn namespace(&self) -> Option<&str> {
        self.label(NAMESPACE_LABEL)
    }

    /// Labels as owned pairs, for handing to a metrics sink
    pub fn label_pairs(&self) -> Vec<(String, String)> {
        self.labels.iter().map(|l| (l.name.clone(), l.value.clone())).collect()
    }

    /// Ordering by (namespace, mount_point) labels
    pub fn cmp_by_labels(&self, other: &Self) -> Ordering {
        (self.namespace(), self.mount_point()).cmp(&(other.namespace(), other.mount_point()))
    }
}

/// Sort samples by (namespace, mount_point) so repeated ticks line up
pub fn sort_samples(samples: &mut [GaugeSample]) {
    samples.sort_by(GaugeSample::cmp_by_labels);
}

/// Keep at most `max` samples, preferring the largest values.
///
/// Ties are broken by label order so the same input always keeps the same
/// samples. The returned set is sorted by labels.
pub fn cap_cardinality(mut samples: Vec<GaugeSample>, max: usize) -> Vec<GaugeSample> {
    if samples.len() > max {
        samples.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.cmp_by_labels(b)));
        samples.truncate(max);
    }
    sort_samples(&mut samples);
    samples
}
