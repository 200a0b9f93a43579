//! Error types for flowcheck

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while checking Flow status.
///
/// A non-zero Flow exit status is not an error; it becomes a diagnostic.
#[derive(Error, Debug)]
pub enum FlowError {
    /// No flags were configured for the Flow invocation
    #[error("Flow invocation requires at least one flag")]
    EmptyFlags,

    /// The Flow process could not be started at all
    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// An ignore-line prefix could not be compiled
    #[error("Invalid ignore line {prefix:?}: {source}")]
    InvalidIgnorePattern {
        prefix: String,
        #[source]
        source: regex::Error,
    },

    /// Options file could not be read
    #[error("Failed to read options file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Options file is not valid JSON for [`FlowOptions`](crate::FlowOptions)
    #[error("Invalid options file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Project tree could not be scanned for changes
    #[error("Failed to scan {path}: {message}")]
    Watch { path: PathBuf, message: String },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, FlowError>;
