//! Error types for the fallible surfaces around the station model.
//!
//! The station's own update and query operations never fail; these types
//! cover explicit device lookups, configuration loading, and trace parsing.

use std::error::Error;
use std::fmt;

/// Error returned by the explicit-lookup station operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StationError {
    /// No connected device carries the requested identifier.
    DeviceNotFound {
        /// Identifier that was looked up.
        device_id: String,
    },
}

impl fmt::Display for StationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeviceNotFound { device_id } => {
                write!(f, "no connected device with id \"{device_id}\"")
            }
        }
    }
}

impl Error for StationError {}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"station.battery_capacity"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl Error for ConfigError {}

/// Measurement trace could not be read or parsed.
#[derive(Debug, Clone)]
pub struct TraceError {
    /// 1-based line number of the offending record, when known.
    pub line: Option<u64>,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "trace error at line {line}: {}", self.message),
            None => write!(f, "trace error: {}", self.message),
        }
    }
}

impl Error for TraceError {}

impl From<csv::Error> for TraceError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(csv::Position::line);
        Self {
            line,
            message: err.to_string(),
        }
    }
}
