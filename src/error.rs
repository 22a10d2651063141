//! Error types for trueno-transect operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating and materializing transects.
///
/// Every variant renders a message suitable for showing to the user as-is.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad caller input: unknown direction, non-positive line count, malformed ring.
    #[error("{0}")]
    InvalidArgument(String),

    /// The requested rectangle (or the layer holding it) does not exist.
    #[error("No rectangle found with ID {id} in layer '{layer}'.")]
    NotFound {
        /// Layer that was searched.
        layer: String,
        /// Requested object identifier.
        id: i64,
    },

    /// The output layer cannot be registered into the visual workspace.
    #[error("{0}")]
    OutputUnavailable(String),

    /// The output layer already exists and overwriting is disabled.
    #[error("Output layer '{0}' already exists and overwrite is disabled.")]
    LayerExists(String),

    /// I/O error (layer, project or config files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A layer file could not be parsed or serialized.
    #[error("Invalid GeoJSON in '{path}': {message}")]
    GeoJson {
        /// Path of the offending file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// Configuration or project document parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed, 0 if unknown).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),
}

impl Error {
    /// Shorthand for [`Error::InvalidArgument`].
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Build a [`Error::ConfigParse`] from a YAML parser error.
    pub(crate) fn from_yaml(e: &serde_yaml_ng::Error) -> Self {
        let line = e.location().map(|l| l.line()).unwrap_or(0);
        Self::ConfigParse {
            line,
            message: e.to_string(),
        }
    }
}
