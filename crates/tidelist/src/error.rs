//! Error types for tidelist.
//!
//! List operations never fail: absent items and out-of-range positions are
//! reported through `Option`. Errors only arise when loading configuration.

use std::path::PathBuf;

/// Result type alias for tidelist operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error.
    #[error("Failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error.
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A setting parsed but holds an unusable value.
    #[error("Invalid value for setting '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl Error {
    /// Create an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a value error.
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}
