//! Per-mount walk results and their aggregation into a tick summary

use crate::domain::{sort_samples, GaugeSample, ResolvedKvMount};
use crate::errors::Error;

/// How the walk of one mount ended
#[derive(Debug)]
pub enum WalkOutcome {
    /// Every directory was listed
    Complete { secrets: u64 },
    /// A list call failed; the walk stopped there
    Failed { error: Error },
    /// The tick was cancelled before the walk finished
    Cancelled { partial: u64 },
}

/// A mount paired with the outcome of its walk
#[derive(Debug)]
pub struct MountReport {
    pub mount: ResolvedKvMount,
    pub outcome: WalkOutcome,
}

impl MountReport {
    pub fn new(mount: ResolvedKvMount, outcome: WalkOutcome) -> Self {
        Self { mount, outcome }
    }
}

/// A mount whose walk failed
#[derive(Debug)]
pub struct MountFailure {
    pub mount: ResolvedKvMount,
    pub error: Error,
}

/// Everything one tick produced
#[derive(Debug, Default)]
pub struct TickSummary {
    /// One sample per completed mount, sorted by labels
    pub samples: Vec<GaugeSample>,
    pub failures: Vec<MountFailure>,
    /// Mounts whose walk was cut short; neither sampled nor counted as errors
    pub cancelled: Vec<ResolvedKvMount>,
    /// Namespaces whose mounts were never listed because the tick was cancelled
    pub namespaces_skipped: usize,
}

impl TickSummary {
    pub fn mounts_seen(&self) -> usize {
        self.samples.len() + self.failures.len() + self.cancelled.len()
    }

    pub fn secrets_total(&self) -> u64 {
        self.samples.iter().map(|s| s.value).sum()
    }
}

/// Fold walk reports into a summary.
///
/// Completed mounts become samples, failed ones become failures and
/// cancelled ones are set aside. Report order does not matter.
pub fn aggregate(reports: impl IntoIterator<Item = MountReport>) -> TickSummary {
    let mut summary =
        reports.into_iter().fold(TickSummary::default(), |mut summary, report| {
            match report.outcome {
                WalkOutcome::Complete { secrets } => summary
                    .samples
                    .push(GaugeSample::for_mount(&report.mount.with_count(secrets))),
                WalkOutcome::Failed { error } => {
                    summary.failures.push(MountFailure { mount: report.mount, error })
                }
                WalkOutcome::Cancelled { .. } => summary.cancelled.push(report.mount),
            }
            summary
        });

    sort_samples(&mut summary.samples);
    summary
}
