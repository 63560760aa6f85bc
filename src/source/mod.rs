//! Line sources: where raw text lines come from
//!
//! This module abstracts "serial device" and "child process stdout" behind
//! one blocking-readline interface, [`LineSource`]. The reader worker owns a
//! boxed source for the lifetime of a connection; the connection layer opens
//! it before handing it over and closes it after the worker has been joined.
//!
//! # Variants
//!
//! - [`SerialSource`] - A named serial device at a configured baud rate with
//!   a bounded read timeout
//! - [`ProcessSource`] - A locally launched interpreter subprocess, reading
//!   its standard output line by line
//! - [`MockSource`] - Canned lines for tests (feature `mock-source`)

pub mod process;
pub mod serial;

#[cfg(any(test, feature = "mock-source"))]
pub mod mock;

pub use process::ProcessSource;
pub use serial::SerialSource;

#[cfg(any(test, feature = "mock-source"))]
pub use mock::MockSource;

use crate::error::Result;

/// Listbox entry shown when port enumeration finds nothing. Selecting it
/// must keep the connect action disabled.
pub const NO_PORTS_FOUND: &str = "No Ports Found";

/// Unified interface over serial devices and subprocess stdout.
///
/// Implementations must be `Send`: a source is moved into the reader worker
/// thread on connect and handed back when the worker is joined.
pub trait LineSource: Send {
    /// Open the underlying device or launch the subprocess.
    fn open(&mut self) -> Result<()>;

    /// Read one line of UTF-8 text, trailing whitespace stripped.
    ///
    /// Returns `Ok(None)` when no line arrived within the source's timeout;
    /// the caller retries. Errors are terminal for the stream: end of a
    /// subprocess's output, an I/O failure, or bytes that do not decode as
    /// UTF-8.
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Release the underlying handle. Idempotent.
    fn close(&mut self);

    /// Human-readable description for status messages.
    fn describe(&self) -> String;
}

/// Enumerate available serial ports as `"<device> - <description>"` strings.
///
/// Returns an empty vector when none exist or enumeration fails; the
/// frontend substitutes [`NO_PORTS_FOUND`].
pub fn available_ports() -> Vec<String> {
    let ports = match serialport::available_ports() {
        Ok(ports) => ports,
        Err(e) => {
            tracing::warn!("serial port enumeration failed: {e}");
            return Vec::new();
        }
    };

    ports
        .into_iter()
        .map(|info| {
            let description = match &info.port_type {
                serialport::SerialPortType::UsbPort(usb) => usb
                    .product
                    .clone()
                    .unwrap_or_else(|| "USB Serial Device".to_string()),
                serialport::SerialPortType::PciPort => "PCI Serial Device".to_string(),
                serialport::SerialPortType::BluetoothPort => "Bluetooth Serial Device".to_string(),
                serialport::SerialPortType::Unknown => "Serial Device".to_string(),
            };
            format!("{} - {}", info.port_name, description)
        })
        .collect()
}

/// Extract the device path from a `"<device> - <description>"` entry.
pub fn device_of_entry(entry: &str) -> &str {
    entry.split_whitespace().next().unwrap_or(entry)
}
