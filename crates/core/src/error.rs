//! Error types for the viewer host.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the viewer host.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file could not be parsed
    #[error("Config error in '{path}': {message}")]
    Config {
        /// Path of the offending file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the core Error type.
pub type Result<T> = std::result::Result<T, Error>;
