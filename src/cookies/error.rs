//! Error types for cookie file detection and normalization.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort normalization of a single cookie file.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Content matched neither the structured nor the legacy tabular encoding.
    #[error("unrecognized cookie file format")]
    Unrecognized,

    /// Content is well-formed JSON but not a record or a sequence of records.
    #[error("structured cookie data has an unexpected shape: {source}")]
    InvalidStructure {
        /// The underlying deserialization error.
        #[source]
        source: serde_json::Error,
    },

    /// The cookie file could not be read.
    #[error("failed to read cookie file {path}: {source}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl FormatError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
