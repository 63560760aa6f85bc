//! Serial port line source
//!
//! Wraps the `serialport` crate behind the [`LineSource`] interface. Reads
//! are bounded by a configurable timeout; a timeout surfaces as `Ok(None)`
//! so the reader worker retries instead of treating it as end of stream.
//! The timeout also bounds how stale the worker's view of the stop flag can
//! get while no data arrives.

use crate::error::{PlotterError, Result};
use crate::source::LineSource;
use serialport::SerialPort;
use std::io::Read;
use std::time::Duration;

/// Line source reading from a named serial device
pub struct SerialSource {
    port_name: String,
    baud_rate: u32,
    timeout: Duration,
    port: Option<Box<dyn SerialPort>>,
    /// Bytes received but not yet terminated by a newline.
    pending: Vec<u8>,
}

impl SerialSource {
    pub fn new(port_name: impl Into<String>, baud_rate: u32, timeout: Duration) -> Self {
        Self {
            port_name: port_name.into(),
            baud_rate,
            timeout,
            port: None,
            pending: Vec::new(),
        }
    }

    /// Pop one complete line off the pending buffer, if present.
    fn take_pending_line(&mut self) -> Result<Option<String>> {
        let Some(newline) = self.pending.iter().position(|&b| b == b'\n') else {
            return Ok(None);
        };
        let raw: Vec<u8> = self.pending.drain(..=newline).collect();
        let text = std::str::from_utf8(&raw)
            .map_err(|e| PlotterError::SourceRead(format!("invalid UTF-8 from serial port: {e}")))?;
        Ok(Some(text.trim_end().to_string()))
    }
}

impl LineSource for SerialSource {
    fn open(&mut self) -> Result<()> {
        let port = serialport::new(&self.port_name, self.baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|e| {
                PlotterError::Connection(format!("cannot open {}: {e}", self.port_name))
            })?;
        tracing::info!(port = %self.port_name, baud = self.baud_rate, "serial port opened");
        self.pending.clear();
        self.port = Some(port);
        Ok(())
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        if let Some(line) = self.take_pending_line()? {
            return Ok(Some(line));
        }

        let mut chunk = [0u8; 256];
        loop {
            let read = {
                let Some(port) = self.port.as_mut() else {
                    return Err(PlotterError::SourceRead("serial port is not open".into()));
                };
                port.read(&mut chunk)
            };
            match read {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    if let Some(line) = self.take_pending_line()? {
                        return Ok(Some(line));
                    }
                }
                // A timeout is not end of stream; the partial line stays
                // pending until more bytes arrive.
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => return Ok(None),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(PlotterError::SourceRead(format!(
                        "serial read on {} failed: {e}",
                        self.port_name
                    )))
                }
            }
        }
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            tracing::info!(port = %self.port_name, "serial port closed");
        }
        self.pending.clear();
    }

    fn describe(&self) -> String {
        format!("{} @ {}", self.port_name, self.baud_rate)
    }
}
