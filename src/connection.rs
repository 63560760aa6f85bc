//! Connection state machine
//!
//! Governs the `Disconnected → Connecting → Connected → Disconnected` cycle
//! and owns the line source and reader worker lifecycle.
//!
//! # Invariants
//!
//! - Compile-before-connect: the format string is compiled first, and a
//!   failed compile aborts the attempt with the state back at Disconnected.
//! - At most one source and one worker are active at a time.
//! - Teardown order: signal stop, join the worker (bounded by the source's
//!   read timeout plus the poll interval), then close the recovered source.
//!   The source handle is never closed while a read may be in flight.

use crate::config::AppConfig;
use crate::error::Result;
use crate::ingest::IngestPipeline;
use crate::reader::{self, ReaderEvent, ReaderHandle};
use crate::source::LineSource;
use crate::template::Template;
use crossbeam_channel::Receiver;

/// Connection lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
        }
    }
}

/// Reader worker plus its event queue, alive only while connected.
struct Link {
    handle: ReaderHandle,
    events: Receiver<ReaderEvent>,
}

/// Owner of the active line source and reader worker
#[derive(Default)]
pub struct Connection {
    state: ConnectionState,
    link: Option<Link>,
}

impl Connection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// The reader's event queue, present while connected.
    pub fn events(&self) -> Option<&Receiver<ReaderEvent>> {
        self.link.as_ref().map(|link| &link.events)
    }

    /// Establish a connection: compile the template, open the source, start
    /// the reader worker.
    ///
    /// Returns the fresh ingestion pipeline for this connection; its series
    /// are created empty from the template's placeholders, replacing any
    /// previous pipeline the caller held. On any failure the state is
    /// Disconnected and nothing is left running.
    pub fn connect(
        &mut self,
        format: &str,
        mut source: Box<dyn LineSource>,
        config: &AppConfig,
    ) -> Result<IngestPipeline> {
        // Never mutate the matcher or source under a running worker.
        self.disconnect();

        let template = Template::compile(format)?;

        self.state = ConnectionState::Connecting;
        if let Err(e) = source.open() {
            self.state = ConnectionState::Disconnected;
            return Err(e);
        }

        let description = source.describe();
        let (handle, events) = reader::spawn(source, config.poll_interval());
        self.link = Some(Link { handle, events });
        self.state = ConnectionState::Connected;
        tracing::info!(source = %description, "connected");

        Ok(IngestPipeline::new(template, config))
    }

    /// Tear down the active connection, if any. Blocks until the reader
    /// worker has exited, then closes the source. Safe to call in any state.
    pub fn disconnect(&mut self) {
        if let Some(link) = self.link.take() {
            link.handle.request_stop();
            if let Some(mut source) = link.handle.join() {
                source.close();
            }
            tracing::info!("disconnected");
        }
        self.state = ConnectionState::Disconnected;
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.disconnect();
    }
}
