//! # Engine Error Types
//!
//! All errors that can occur while injecting settings controls.

use std::path::PathBuf;

use graft_prefs::PrefsError;
use thiserror::Error;

/// Errors that can occur in the injection engine.
#[derive(Error, Debug)]
pub enum GraftError {
    /// A required template node is missing from the host panel.
    ///
    /// Non-fatal: the affected panel is skipped for this pass.
    #[error("template not found: {missing}")]
    Discovery {
        /// Path or name of the missing reference.
        missing: String,
    },

    /// A control's template lacks the widget the control binds to.
    #[error("control {control} has no {expected} to bind")]
    Binding {
        /// Request id of the control.
        control: String,
        /// Widget that was expected.
        expected: &'static str,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("failed to read configuration {path}: {source}")]
    ConfigIo {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Preference store failure.
    #[error(transparent)]
    Prefs(#[from] PrefsError),
}

impl GraftError {
    /// Shorthand for a discovery failure.
    pub(crate) fn missing(what: impl Into<String>) -> Self {
        Self::Discovery {
            missing: what.into(),
        }
    }

    /// Shorthand for a binding failure.
    pub(crate) fn binding(control: &str, expected: &'static str) -> Self {
        Self::Binding {
            control: control.to_string(),
            expected,
        }
    }

    /// Returns true for failures that only skip one panel.
    #[must_use]
    pub const fn is_discovery(&self) -> bool {
        matches!(self, Self::Discovery { .. })
    }
}

/// Result type for engine operations.
pub type GraftResult<T> = Result<T, GraftError>;
