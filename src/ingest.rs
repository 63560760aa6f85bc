//! Per-frame ingestion of queued lines
//!
//! The [`IngestPipeline`] runs cooperatively on the UI thread, once per
//! frame, and never blocks. Each call to [`IngestPipeline::drain`] takes the
//! queue length at entry and processes exactly that many events, so a
//! producer that outpaces the UI defers its excess to the next frame instead
//! of stretching this one.
//!
//! Per line, the pipeline appends a log entry, matches the line against the
//! compiled template and updates the rolling sample store:
//!
//! - a match appends every placeholder's value at a fresh timestamp,
//! - a mismatch appends the NaN sentinel to every series,
//! - a line whose captured text fails numeric parsing is logged and recorded
//!   as a sentinel row; no partial values are ever appended.

use crate::config::AppConfig;
use crate::reader::ReaderEvent;
use crate::store::{LogBuffer, SampleStore};
use crate::template::{MatchOutcome, Template};
use crossbeam_channel::Receiver;
use std::time::Instant;

/// UI-thread pipeline from raw lines to plot buffers.
///
/// Created per connection attempt; the previous pipeline's series are
/// discarded with it.
pub struct IngestPipeline {
    template: Template,
    store: SampleStore,
    log: LogBuffer,
    started: Instant,
    scroll_pending: bool,
}

impl IngestPipeline {
    pub fn new(template: Template, config: &AppConfig) -> Self {
        let store = SampleStore::new(template.placeholders(), config.max_points);
        Self {
            template,
            store,
            log: LogBuffer::new(config.max_log_lines),
            started: Instant::now(),
            scroll_pending: false,
        }
    }

    /// Seconds on the plot's time axis: elapsed since this pipeline was
    /// created.
    fn now(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    /// Drain the queue for this frame.
    ///
    /// Processes at most as many events as were queued at entry. Returns the
    /// reader's failure message if the worker reported a terminal error; the
    /// caller is expected to tear the connection down in response.
    pub fn drain(&mut self, events: &Receiver<ReaderEvent>) -> Option<String> {
        let pending = events.len();
        for _ in 0..pending {
            match events.try_recv() {
                Ok(ReaderEvent::Line(line)) => self.ingest_line(&line, self.now()),
                Ok(ReaderEvent::Failed(msg)) => return Some(msg),
                Err(_) => break,
            }
        }
        None
    }

    /// Ingest one raw line at the given timestamp.
    pub fn ingest_line(&mut self, line: &str, timestamp: f64) {
        self.log.push(line);
        self.scroll_pending = true;

        match self.template.match_line(line) {
            MatchOutcome::Values(values) => self.store.push_values(timestamp, &values),
            MatchOutcome::NoMatch => self.store.push_gap(timestamp),
            MatchOutcome::Invalid(e) => {
                tracing::warn!("could not parse line {line:?}: {e}");
                self.store.push_gap(timestamp);
            }
        }
    }

    /// True once per batch of new log lines; consuming it resets the signal.
    /// The log view uses this to scroll to the bottom.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }

    /// Empty the plot and log buffers. The compiled template is untouched,
    /// so ingestion continues to work without recompilation.
    pub fn clear(&mut self) {
        self.store.clear();
        self.log.clear();
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    pub fn log(&self) -> &LogBuffer {
        &self.log
    }
}
