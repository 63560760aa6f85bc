//! Application configuration
//!
//! Persistent settings for the plotter: buffer capacities, serial defaults
//! and the interpreter used for script sources. Stored as TOML in the
//! platform config directory under `serialvis-rs/config.toml`; missing or
//! unreadable files fall back to defaults.

use crate::error::{PlotterError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Baud rates offered in the connection controls
pub const BAUD_RATES: &[u32] = &[9600, 19200, 38400, 57600, 115200];

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Rolling window size of the plot, in samples per series
    pub max_points: usize,

    /// Capacity of the raw-line log ring buffer
    pub max_log_lines: usize,

    /// Default baud rate preselected in the UI
    pub default_baud: u32,

    /// Serial read timeout in milliseconds
    pub serial_timeout_ms: u64,

    /// Reader worker delay between empty read attempts, in milliseconds
    pub poll_interval_ms: u64,

    /// Interpreter used to launch script sources
    pub interpreter: String,

    /// Format string restored into the template input on startup
    pub format: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_points: 500,
            max_log_lines: 200,
            default_baud: 115_200,
            serial_timeout_ms: 1000,
            poll_interval_ms: 10,
            interpreter: "python3".to_string(),
            format: "Temp: ${temp}, Hum: ${humidity}".to_string(),
        }
    }
}

impl AppConfig {
    pub fn serial_timeout(&self) -> Duration {
        Duration::from_millis(self.serial_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        // Bounded so a bad config cannot turn the worker into a busy spin
        // or freeze teardown.
        Duration::from_millis(self.poll_interval_ms.clamp(1, 10))
    }

    fn config_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("serialvis-rs").join("config.toml"))
    }

    /// Load the saved configuration, falling back to defaults on any error.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(text) => match toml::from_str(&text) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("ignoring malformed config {}: {e}", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Persist the configuration to the platform config directory.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| PlotterError::Config("no config directory on this platform".into()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let text =
            toml::to_string_pretty(self).map_err(|e| PlotterError::Config(e.to_string()))?;
        std::fs::write(&path, text)?;
        Ok(())
    }
}
