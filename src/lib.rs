//! # SerialVis-RS: live line plotter
//!
//! A desktop utility that connects to a serial device or a locally launched
//! subprocess, parses each incoming line against a user-defined
//! `${name}`-placeholder template, and plots the extracted numeric values as
//! live time series alongside a scrollable raw-data log.
//!
//! ## Architecture
//!
//! - **Template** (`template`): compiles the format string into a regex
//!   matcher with one named capture slot per placeholder
//! - **Line sources** (`source`): serial device and subprocess stdout behind
//!   one blocking-readline trait
//! - **Reader** (`reader`): background worker pulling lines from the source
//!   into a crossbeam channel, the only state shared across threads
//! - **Ingestion** (`ingest`): per-frame, non-blocking drain of the queue
//!   into the rolling buffers and the log
//! - **Store** (`store`): bounded per-series history with lockstep FIFO
//!   eviction on a shared time axis
//! - **Connection** (`connection`): the Disconnected/Connecting/Connected
//!   state machine owning source and worker lifecycle
//! - **Frontend** (`frontend`): eframe/egui rendering with egui_plot
//!
//! ## Example
//!
//! ```
//! use serialvis_rs::{config::AppConfig, ingest::IngestPipeline, template::Template};
//!
//! let template = Template::compile("Temp: ${temp}, Hum: ${humidity}").unwrap();
//! let mut pipeline = IngestPipeline::new(template, &AppConfig::default());
//! pipeline.ingest_line("Temp: 23.50, Hum: 61.10", 0.1);
//! assert_eq!(pipeline.store().len(), 1);
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod frontend;
pub mod ingest;
pub mod reader;
pub mod source;
pub mod store;
pub mod template;

// Re-export commonly used types
pub use config::AppConfig;
pub use connection::{Connection, ConnectionState};
pub use error::{PlotterError, Result};
pub use frontend::PlotterApp;
pub use ingest::IngestPipeline;
pub use reader::{ReaderEvent, ReaderHandle};
pub use source::{LineSource, ProcessSource, SerialSource};
pub use store::{LogBuffer, LogEntry, SampleStore, Series};
pub use template::{MatchOutcome, Template};
