//! Mock line source for testing without hardware
//!
//! Plays back a canned sequence of lines, then either idles (like a quiet
//! serial port) or fails (like a mid-stream decode error), depending on how
//! it was built. Shared open/closed flags let tests observe the source's
//! lifecycle after it has been moved into the reader worker.

use crate::error::{PlotterError, Result};
use crate::source::LineSource;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What the mock does once its canned lines run out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnExhausted {
    /// Keep returning `Ok(None)`, like an idle serial port.
    Idle,
    /// Return one terminal read error.
    Fail,
}

/// Canned-line source for tests
pub struct MockSource {
    lines: VecDeque<String>,
    on_exhausted: OnExhausted,
    opened: Arc<AtomicBool>,
    closed: Arc<AtomicBool>,
}

impl MockSource {
    /// A source that plays `lines` and then idles.
    pub fn new(lines: &[&str]) -> Self {
        Self {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            on_exhausted: OnExhausted::Idle,
            opened: Arc::new(AtomicBool::new(false)),
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A source that plays `lines` and then fails with a read error.
    pub fn failing(lines: &[&str]) -> Self {
        Self {
            on_exhausted: OnExhausted::Fail,
            ..Self::new(lines)
        }
    }

    /// Flag set once `open` has been called.
    pub fn opened_flag(&self) -> Arc<AtomicBool> {
        self.opened.clone()
    }

    /// Flag set once `close` has been called.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        self.closed.clone()
    }
}

impl LineSource for MockSource {
    fn open(&mut self) -> Result<()> {
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        match self.lines.pop_front() {
            Some(line) => Ok(Some(line)),
            None => match self.on_exhausted {
                OnExhausted::Idle => Ok(None),
                OnExhausted::Fail => Err(PlotterError::SourceRead("mock stream failed".into())),
            },
        }
    }

    fn close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}
