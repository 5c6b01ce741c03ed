//! # Metrics Sink
//!
//! The collector never touches a process-wide recorder directly. It is handed
//! a [`MetricsSink`] at construction, so tests can substitute [`InMemorySink`].

use dashmap::DashMap;

/// Destination for counters, gauges and histograms
pub trait MetricsSink: Send + Sync {
    /// Add `value` to a monotonically increasing counter
    fn increment_counter(&self, name: &str, labels: &[(String, String)], value: u64);

    /// Set a gauge to `value`
    fn set_gauge(&self, name: &str, labels: &[(String, String)], value: f64);

    /// Stop reporting a gauge series whose last value is no longer current
    fn remove_gauge(&self, name: &str, labels: &[(String, String)]);

    /// Record one histogram observation
    fn record_histogram(&self, name: &str, labels: &[(String, String)], value: f64);
}

/// (metric name, labels sorted by name)
type SeriesKey = (String, Vec<(String, String)>);

fn series_key(name: &str, labels: &[(String, String)]) -> SeriesKey {
    let mut labels = labels.to_vec();
    labels.sort();
    (name.to_string(), labels)
}

#[derive(Debug, Default, Clone, Copy)]
struct CounterState {
    total: u64,
    increments: usize,
}

/// Thread-safe sink that keeps everything in memory
#[derive(Debug, Default)]
pub struct InMemorySink {
    counters: DashMap<SeriesKey, CounterState>,
    gauges: DashMap<SeriesKey, f64>,
    histograms: DashMap<SeriesKey, Vec<f64>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter total summed over all label sets
    pub fn counter_total(&self, name: &str) -> u64 {
        self.counters.iter().filter(|e| e.key().0 == name).map(|e| e.value().total).sum()
    }

    /// Number of increment calls summed over all label sets
    pub fn counter_increments(&self, name: &str) -> usize {
        self.counters.iter().filter(|e| e.key().0 == name).map(|e| e.value().increments).sum()
    }

    /// Counter total for one exact label set
    pub fn counter_with_labels(&self, name: &str, labels: &[(String, String)]) -> u64 {
        self.counters.get(&series_key(name, labels)).map(|c| c.total).unwrap_or(0)
    }

    /// Last value set on a gauge series
    pub fn gauge(&self, name: &str, labels: &[(String, String)]) -> Option<f64> {
        self.gauges.get(&series_key(name, labels)).map(|g| *g)
    }

    /// Number of distinct series recorded for a gauge
    pub fn gauge_series(&self, name: &str) -> usize {
        self.gauges.iter().filter(|e| e.key().0 == name).count()
    }

    /// Observations recorded for a histogram over all label sets
    pub fn histogram_count(&self, name: &str) -> usize {
        self.histograms.iter().filter(|e| e.key().0 == name).map(|e| e.value().len()).sum()
    }

    /// Forget everything recorded so far
    pub fn clear(&self) {
        self.counters.clear();
        self.gauges.clear();
        self.histograms.clear();
    }
}

impl MetricsSink for InMemorySink {
    fn increment_counter(&self, name: &str, labels: &[(String, String)], value: u64) {
        let mut state = self.counters.entry(series_key(name, labels)).or_default();
        state.total += value;
        state.increments += 1;
    }

    fn set_gauge(&self, name: &str, labels: &[(String, String)], value: f64) {
        self.gauges.insert(series_key(name, labels), value);
    }

    fn remove_gauge(&self, name: &str, labels: &[(String, String)]) {
        self.gauges.remove(&series_key(name, labels));
    }

    fn record_histogram(&self, name: &str, labels: &[(String, String)], value: f64) {
        self.histograms.entry(series_key(name, labels)).or_default().push(value);
    }
}
