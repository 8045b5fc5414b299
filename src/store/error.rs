//! Error types for the canonical and working cookie stores.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An existing canonical file could not be parsed. The file is left as-is.
    #[error("canonical cookie file {path} is corrupt: {source}")]
    Corrupt {
        /// File that failed to parse.
        path: PathBuf,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem error.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The key is not a plain file name.
    #[error("invalid cookie set key '{key}': must be a plain file name")]
    InvalidKey {
        /// The rejected key.
        key: String,
    },

    /// Records could not be serialized.
    #[error("failed to serialize cookie records: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl StoreError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a corrupt-state error for `path`.
    pub fn corrupt(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Corrupt {
            path: path.into(),
            source,
        }
    }
}
