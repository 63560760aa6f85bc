//! Rolling sample storage and the raw-line log buffer
//!
//! # Main Types
//!
//! - [`SampleStore`] - Bounded per-series history sharing one time axis
//! - [`Series`] - One placeholder's rolling value history
//! - [`LogBuffer`] / [`LogEntry`] - Bounded ring of timestamped raw lines
//!
//! # Memory Management
//!
//! The store is a fixed-capacity FIFO keyed by sample count on the time axis.
//! When a new sample pushes the axis past capacity, the oldest sample is
//! evicted from the axis and from every series in lockstep, so axis and
//! series lengths always stay equal. Lines that fail to match the template
//! are recorded as a NaN gap on every series to preserve that alignment.

use chrono::Local;
use std::collections::VecDeque;

/// One placeholder's rolling value history
#[derive(Debug, Clone)]
pub struct Series {
    name: String,
    values: VecDeque<f64>,
}

impl Series {
    fn new(name: &str, capacity: usize) -> Self {
        Self {
            name: name.to_string(),
            values: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// The placeholder name this series plots.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stored values, oldest first.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bounded rolling history for all series of the current template.
///
/// Owned exclusively by the ingestion side; the reader thread never touches
/// it.
#[derive(Debug, Clone)]
pub struct SampleStore {
    capacity: usize,
    timestamps: VecDeque<f64>,
    series: Vec<Series>,
}

impl SampleStore {
    /// Create an empty store with one series per placeholder name.
    pub fn new(names: &[String], capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            timestamps: VecDeque::with_capacity(capacity + 1),
            series: names.iter().map(|n| Series::new(n, capacity)).collect(),
        }
    }

    /// Append one matched sample: a timestamp plus one value per series.
    ///
    /// `values` must be in series order and of series length; extra or
    /// missing values would break axis alignment, so mismatched rows are
    /// recorded as a gap instead.
    pub fn push_values(&mut self, timestamp: f64, values: &[f64]) {
        if values.len() != self.series.len() {
            tracing::warn!(
                expected = self.series.len(),
                got = values.len(),
                "value row length mismatch, recording gap"
            );
            self.push_gap(timestamp);
            return;
        }
        self.timestamps.push_back(timestamp);
        for (series, value) in self.series.iter_mut().zip(values) {
            series.values.push_back(*value);
        }
        self.evict();
    }

    /// Append a not-a-number sentinel to every series at `timestamp`.
    ///
    /// Used for lines that do not match the template, keeping all series
    /// time-synchronized.
    pub fn push_gap(&mut self, timestamp: f64) {
        self.timestamps.push_back(timestamp);
        for series in &mut self.series {
            series.values.push_back(f64::NAN);
        }
        self.evict();
    }

    /// Drop oldest samples until the time axis is within capacity.
    fn evict(&mut self) {
        while self.timestamps.len() > self.capacity {
            self.timestamps.pop_front();
            for series in &mut self.series {
                series.values.pop_front();
            }
        }
    }

    /// Empty all series and the time axis. Capacity and series names are
    /// kept, so the compiled template stays usable.
    pub fn clear(&mut self) {
        self.timestamps.clear();
        for series in &mut self.series {
            series.values.clear();
        }
    }

    /// Number of samples on the shared time axis.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn series(&self) -> &[Series] {
        &self.series
    }

    /// Timestamps on the shared axis, oldest first.
    pub fn timestamps(&self) -> impl Iterator<Item = f64> + '_ {
        self.timestamps.iter().copied()
    }

    /// `[time, value]` pairs for one series, ready for plotting.
    pub fn plot_points(&self, series_index: usize) -> Vec<[f64; 2]> {
        let Some(series) = self.series.get(series_index) else {
            return Vec::new();
        };
        self.timestamps
            .iter()
            .zip(&series.values)
            .map(|(&t, &v)| [t, v])
            .collect()
    }
}

/// A timestamped raw line from the source
#[derive(Debug, Clone)]
pub struct LogEntry {
    timestamp: String,
    line: String,
}

impl LogEntry {
    fn now(line: &str) -> Self {
        Self {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            line: line.to_string(),
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}> {}", self.timestamp, self.line)
    }
}

/// Bounded ring buffer of raw lines, independent of the sample store
#[derive(Debug, Clone)]
pub struct LogBuffer {
    capacity: usize,
    entries: VecDeque<LogEntry>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append a raw line, timestamped now, evicting the oldest entry when
    /// full.
    pub fn push(&mut self, line: &str) {
        self.entries.push_back(LogEntry::now(line));
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
