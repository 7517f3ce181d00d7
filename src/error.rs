//! Error types for NicTune
//!
//! This module defines all error types used throughout the application,
//! providing enough context (interface name, attempted values) to diagnose
//! a failed run without re-running at higher verbosity.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for NicTune operations
#[derive(Error, Debug)]
pub enum TuneError {
    /// Interface enumeration failed outright; aborts the whole pass
    #[error("cannot enumerate network interfaces at '{path}': {source}")]
    Enumeration {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sysfs attribute read failed
    #[error("sysfs read failed at '{path}': {source}")]
    Sysfs {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The hardware query tool could not be run or exited non-zero
    #[error("hardware query failed for '{interface}': {detail}")]
    Tool { interface: String, detail: String },

    /// Tool output was missing or malformed for an expected field
    #[error("cannot parse {what} for '{interface}': {detail}")]
    Parse {
        interface: String,
        what: &'static str,
        detail: String,
    },

    /// An otherwise-eligible interface reported unusable ring maxima
    #[error("invalid ring maxima for '{interface}': rx_max={rx_max}, tx_max={tx_max}")]
    ConfigDefect {
        interface: String,
        rx_max: u32,
        tx_max: u32,
    },

    /// The ring set/verify round trip failed or did not converge
    #[error("ring update failed for '{interface}': {detail}")]
    Mutation { interface: String, detail: String },

    /// Report serialization error
    #[error("report serialization error: {0}")]
    Report(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

impl TuneError {
    /// Create an enumeration error with the directory that failed to list
    pub fn enumeration(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Enumeration {
            path: path.into(),
            source,
        }
    }

    /// Create a sysfs read error with path context
    pub fn sysfs(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Sysfs {
            path: path.into(),
            source,
        }
    }

    /// Create a tool invocation error
    pub fn tool(interface: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Tool {
            interface: interface.into(),
            detail: detail.into(),
        }
    }

    /// Create a parse error for a named output field
    pub fn parse(
        interface: impl Into<String>,
        what: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self::Parse {
            interface: interface.into(),
            what,
            detail: detail.into(),
        }
    }

    /// Create a ring mutation error
    pub fn mutation(interface: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Mutation {
            interface: interface.into(),
            detail: detail.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Get the interface associated with this error, if any
    pub fn interface(&self) -> Option<&str> {
        match self {
            Self::Tool { interface, .. }
            | Self::Parse { interface, .. }
            | Self::ConfigDefect { interface, .. }
            | Self::Mutation { interface, .. } => Some(interface),
            _ => None,
        }
    }
}

/// Result type alias for NicTune operations
pub type Result<T> = std::result::Result<T, TuneError>;

impl From<serde_json::Error> for TuneError {
    fn from(err: serde_json::Error) -> Self {
        TuneError::Report(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait SysfsResultExt<T> {
    /// Add sysfs path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> SysfsResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| TuneError::sysfs(path, e))
    }
}
