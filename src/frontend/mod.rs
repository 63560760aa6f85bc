//! eframe frontend for the live plotter
//!
//! The frontend owns the connection state machine and the active ingestion
//! pipeline. Every frame runs the ingestion step first (drain the reader
//! queue, update buffers) and then renders the panels; nothing here ever
//! blocks on I/O.
//!
//! Presentation is split out into [`panels`]: connection controls at the
//! top, the live plot in the center, the raw-data log in a toggleable
//! window, and a one-line status bar at the bottom.

pub mod panels;

use crate::config::AppConfig;
use crate::connection::Connection;
use crate::ingest::IngestPipeline;
use crate::source::{self, LineSource, ProcessSource, SerialSource, NO_PORTS_FOUND};
use std::time::Duration;

/// Which kind of source the active connection was started from.
///
/// Dispatch at teardown happens on this closed set, not on runtime type
/// inspection of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Serial,
    Script,
}

/// Main application state
pub struct PlotterApp {
    config: AppConfig,
    connection: Connection,
    pipeline: Option<IngestPipeline>,
    active_source: Option<SourceKind>,

    // UI state
    ports: Vec<String>,
    selected_port: usize,
    baud: u32,
    script_path: String,
    format_input: String,
    status: String,
    show_log: bool,
    autoscroll: bool,
    scroll_log_to_bottom: bool,
}

impl PlotterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let mut app = Self {
            baud: config.default_baud,
            format_input: config.format.clone(),
            config,
            connection: Connection::new(),
            pipeline: None,
            active_source: None,
            ports: Vec::new(),
            selected_port: 0,
            script_path: String::new(),
            status: "Status: Disconnected".to_string(),
            show_log: false,
            autoscroll: true,
            scroll_log_to_bottom: false,
        };
        app.refresh_ports();
        app
    }

    /// Re-enumerate serial ports. No-op while connected; the port list is
    /// locked under an active connection.
    pub fn refresh_ports(&mut self) {
        if self.connection.is_connected() {
            return;
        }
        self.ports = source::available_ports();
        if self.ports.is_empty() {
            self.ports.push(NO_PORTS_FOUND.to_string());
        }
        self.selected_port = self.selected_port.min(self.ports.len() - 1);
    }

    /// Connect is allowed only with a real port selected.
    fn can_connect(&self) -> bool {
        self.ports
            .get(self.selected_port)
            .is_some_and(|p| p.as_str() != NO_PORTS_FOUND)
    }

    fn can_run(&self) -> bool {
        !self.script_path.trim().is_empty()
    }

    fn connect_serial(&mut self) {
        let Some(entry) = self.ports.get(self.selected_port) else {
            return;
        };
        let device = source::device_of_entry(entry).to_string();
        let serial = SerialSource::new(device.clone(), self.baud, self.config.serial_timeout());

        match self
            .connection
            .connect(&self.format_input, Box::new(serial), &self.config)
        {
            Ok(pipeline) => {
                self.pipeline = Some(pipeline);
                self.active_source = Some(SourceKind::Serial);
                self.status = format!("Status: Connected to {device}");
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    fn run_script(&mut self) {
        let process = ProcessSource::new(self.config.interpreter.clone(), self.script_path.trim());
        let name = process.describe();

        match self
            .connection
            .connect(&self.format_input, Box::new(process), &self.config)
        {
            Ok(pipeline) => {
                self.pipeline = Some(pipeline);
                self.active_source = Some(SourceKind::Script);
                self.status = format!("Status: Running {name}");
            }
            Err(e) => self.status = format!("Error: {e}"),
        }
    }

    fn stop(&mut self, status: &str) {
        self.connection.disconnect();
        self.active_source = None;
        self.status = status.to_string();
    }

    fn clear_plot(&mut self) {
        if let Some(pipeline) = &mut self.pipeline {
            pipeline.clear();
        }
    }

    /// The per-frame ingestion step: drain the reader queue into the
    /// buffers, and tear the connection down if the reader reported a
    /// terminal failure.
    fn process_frame(&mut self) {
        let Some(events) = self.connection.events().cloned() else {
            return;
        };
        let Some(pipeline) = self.pipeline.as_mut() else {
            return;
        };

        if let Some(failure) = pipeline.drain(&events) {
            self.connection.disconnect();
            self.active_source = None;
            self.status = format!("Error: {failure}");
        }

        if let Some(pipeline) = self.pipeline.as_mut() {
            if pipeline.take_scroll_request() && self.autoscroll {
                self.scroll_log_to_bottom = true;
            }
        }
    }
}

impl eframe::App for PlotterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_frame();
        panels::render(self, ctx);

        // Keep frames coming while data may arrive.
        if self.connection.is_connected() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.config.format = self.format_input.clone();
        self.config.default_baud = self.baud;
        if let Err(e) = self.config.save() {
            tracing::warn!("could not save config: {e}");
        }
    }
}
