//! Error types for the batch driver.

use std::path::PathBuf;

use thiserror::Error;

use super::check::{MAX_CONCURRENCY, MIN_CONCURRENCY};
use crate::cookies::FormatError;
use crate::store::StoreError;

/// Failure processing a single cookie set. Never aborts the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input file could not be normalized.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The canonical or working store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No canonical set is stored under the key.
    #[error("no cookie set stored under '{key}'")]
    MissingSet {
        /// The missing key.
        key: String,
    },

    /// The task checking this set panicked or was cancelled.
    #[error("check of '{key}' did not complete: {reason}")]
    TaskFailed {
        /// Key of the set whose task failed.
        key: String,
        /// Join error reported by the runtime.
        reason: String,
    },

    /// The input path has no usable file name to key the set by.
    #[error("cannot derive a cookie set key from {path}")]
    NoKey {
        /// The offending path.
        path: PathBuf,
    },
}

/// Errors that stop a whole batch run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The directory to process could not be listed.
    #[error("cannot list {path}: {source}")]
    Listing {
        /// Directory that failed to list.
        path: PathBuf,
        /// The underlying store error.
        #[source]
        source: StoreError,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}
