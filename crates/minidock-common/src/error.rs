//! Unified error types for the minidock workspace.
//!
//! Library crates return [`Result`]; the CLI boundary converts to
//! `anyhow::Result` for display.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum MinidockError {
    /// An I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path where the I/O error occurred.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A configuration or input value is invalid.
    #[error("invalid configuration: {message}")]
    Config {
        /// Description of the invalid value.
        message: String,
    },

    /// A required resource was not found.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Type of the missing resource.
        kind: &'static str,
        /// Identifier of the missing resource.
        id: String,
    },

    /// A mount, unmount, or bind operation failed.
    #[error("mount operation failed: {message}")]
    Mount {
        /// Description of the failed operation.
        message: String,
    },

    /// A cgroup controller operation failed.
    #[error("cgroup {subsystem}: {message}")]
    Cgroup {
        /// Controller the operation targeted ("memory", "cpu", ...).
        subsystem: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// Spawning or controlling the container process failed.
    #[error("process error: {message}")]
    Process {
        /// Description of the failure.
        message: String,
    },

    /// Serialization or deserialization failed.
    #[error("serialization error: {source}")]
    Serialization {
        /// Underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, MinidockError>;
