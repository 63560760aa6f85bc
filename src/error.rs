//! Error handling for the SerialVis-RS application
//!
//! This module defines custom error types and a Result alias for use
//! throughout the application.

use thiserror::Error;

/// Main error type for SerialVis-RS operations
#[derive(Error, Debug)]
pub enum PlotterError {
    /// The format string contains no `${name}` placeholders
    #[error("no placeholders `${{name}}` found in format")]
    EmptyTemplate,

    /// The format string could not be compiled into a matcher
    #[error("invalid format template: {0}")]
    InvalidTemplate(String),

    /// Port open or subprocess spawn failure
    #[error("connection failed: {0}")]
    Connection(String),

    /// I/O or decode failure while reading from an open source
    #[error("source read failed: {0}")]
    SourceRead(String),

    /// A captured placeholder's text is not a valid number
    #[error("value for `{name}` is not a number: {text:?}")]
    ValueParse { name: String, text: String },

    /// Errors from the serial port layer
    #[error("serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors related to configuration loading/saving
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for SerialVis-RS operations
pub type Result<T> = std::result::Result<T, PlotterError>;
