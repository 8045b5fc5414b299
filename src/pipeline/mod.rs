//! Batch driver for the convert and check stages.
//!
//! Run counts are returned to the caller ([`ConvertReport`],
//! [`CheckSummary`]); one failing cookie set never stops the batch.

mod check;
mod convert;
mod error;

pub use check::{CheckEngine, CheckResult, CheckSummary, CheckedSet, DEFAULT_CONCURRENCY, check_one};
pub use convert::{ConvertReport, ConvertedFile, convert_file, convert_folder};
pub use error::{EngineError, PipelineError};
