//! # Preference Store Errors

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing preferences.
#[derive(Error, Debug)]
pub enum PrefsError {
    /// Keys must be non-empty.
    #[error("preference key must not be empty")]
    EmptyKey,

    /// The preference file could not be read or written.
    #[error("preference file {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The preference file is not valid TOML.
    #[error("malformed preference file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values could not be encoded.
    #[error("failed to encode preferences: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Result type for preference operations.
pub type PrefsResult<T> = Result<T, PrefsError>;
