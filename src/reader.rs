//! Background reader worker
//!
//! This module contains the worker loop that runs in a separate thread and
//! pulls lines from a [`LineSource`]. It communicates with the UI thread
//! through a crossbeam channel; the channel is the only structure shared
//! across the thread boundary.
//!
//! # Lifecycle
//!
//! The worker is spawned when a connection is established and joined when it
//! is torn down. Shutdown is cooperative: the connection layer sets the stop
//! flag and the worker observes it within one read-timeout-plus-poll
//! interval. The worker owns the boxed source while running and hands it
//! back through its `JoinHandle`, so the source handle is only closed once
//! no read can be in flight.
//!
//! # Failure
//!
//! Any read or decode error is logged once, translated into a single
//! [`ReaderEvent::Failed`] and terminates the worker. The worker never
//! closes the source itself; ownership of that step stays with the
//! connection layer.

use crate::source::LineSource;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Events the reader worker emits toward the UI thread
#[derive(Debug, Clone)]
pub enum ReaderEvent {
    /// One decoded, newline-stripped line of input.
    Line(String),
    /// The worker hit a terminal read/decode error and has exited.
    Failed(String),
}

/// Handle to a running reader worker
pub struct ReaderHandle {
    stop: Arc<AtomicBool>,
    worker: JoinHandle<Box<dyn LineSource>>,
}

impl ReaderHandle {
    /// Request a cooperative stop without waiting for the worker.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Stop the worker and block until it exits, recovering the source so
    /// the caller can close it.
    ///
    /// Returns `None` if the worker panicked; the source is lost with it.
    pub fn join(self) -> Option<Box<dyn LineSource>> {
        self.request_stop();
        match self.worker.join() {
            Ok(source) => Some(source),
            Err(_) => {
                tracing::error!("reader worker panicked");
                None
            }
        }
    }
}

/// Spawn a reader worker over an already-opened source.
///
/// Returns the handle used for teardown and the receiving end of the line
/// queue. `poll_interval` bounds the delay between read attempts when the
/// source has no data pending.
pub fn spawn(
    source: Box<dyn LineSource>,
    poll_interval: Duration,
) -> (ReaderHandle, Receiver<ReaderEvent>) {
    let stop = Arc::new(AtomicBool::new(false));
    let (event_tx, event_rx) = unbounded();

    let flag = stop.clone();
    let worker = std::thread::spawn(move || {
        let mut source = source;
        read_loop(source.as_mut(), &flag, &event_tx, poll_interval);
        source
    });

    (ReaderHandle { stop, worker }, event_rx)
}

fn read_loop(
    source: &mut dyn LineSource,
    stop: &AtomicBool,
    events: &Sender<ReaderEvent>,
    poll_interval: Duration,
) {
    tracing::info!(source = %source.describe(), "reader worker started");

    while !stop.load(Ordering::SeqCst) {
        match source.read_line() {
            Ok(Some(line)) => {
                // A dropped receiver means the UI side is gone; nothing left
                // to read for.
                if events.send(ReaderEvent::Line(line)).is_err() {
                    break;
                }
            }
            Ok(None) => std::thread::sleep(poll_interval),
            Err(e) => {
                tracing::warn!("reader worker terminating: {e}");
                let _ = events.send(ReaderEvent::Failed(e.to_string()));
                break;
            }
        }
    }

    tracing::info!("reader worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;
    use std::time::Instant;

    const TICK: Duration = Duration::from_millis(1);

    fn recv_line(rx: &Receiver<ReaderEvent>) -> String {
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            ReaderEvent::Line(line) => line,
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[test]
    fn test_lines_flow_through_queue() {
        let source = MockSource::new(&["Temp: 1.0", "Temp: 2.0"]);
        let (handle, rx) = spawn(Box::new(source), TICK);

        assert_eq!(recv_line(&rx), "Temp: 1.0");
        assert_eq!(recv_line(&rx), "Temp: 2.0");

        let source = handle.join().expect("worker exited cleanly");
        drop(source);
    }

    #[test]
    fn test_failure_emits_one_terminal_event() {
        let source = MockSource::failing(&["ok"]);
        let (handle, rx) = spawn(Box::new(source), TICK);

        assert_eq!(recv_line(&rx), "ok");
        match rx.recv_timeout(Duration::from_secs(2)).unwrap() {
            ReaderEvent::Failed(msg) => assert!(!msg.is_empty()),
            other => panic!("expected failure, got {:?}", other),
        }

        // The worker exited on its own; join must not hang and the queue
        // must be closed with no further events.
        let _ = handle.join();
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_stop_observed_within_poll_interval() {
        let source = MockSource::new(&[]);
        let (handle, _rx) = spawn(Box::new(source), TICK);

        let start = Instant::now();
        let source = handle.join();
        assert!(source.is_some());
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_join_returns_source_unclosed() {
        let source = MockSource::new(&[]);
        let closed = source.closed_flag();
        let (handle, _rx) = spawn(Box::new(source), TICK);

        let mut source = handle.join().expect("worker exited cleanly");
        // Closing is the connection layer's job, after the join.
        assert!(!closed.load(Ordering::SeqCst));
        source.close();
        assert!(closed.load(Ordering::SeqCst));
    }
}
