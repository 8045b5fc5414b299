//! Cookie Checker Core Library
//!
//! Normalizes browser cookie exports and classifies each cookie set by the
//! subscription tier the remote account page reports for it.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`cookies`] - Format detection and normalization into canonical records
//! - [`store`] - Canonical store with record merging, and the working store
//! - [`validator`] - Account page request and tier classification
//! - [`pipeline`] - Batch convert/check driver

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cookies;
pub mod pipeline;
pub mod store;
pub mod validator;

// Re-export commonly used types
pub use cookies::{CookieFormat, CookieLookup, CookieRecord, FormatError, detect, normalize};
pub use pipeline::{
    CheckEngine, CheckSummary, ConvertReport, DEFAULT_CONCURRENCY, EngineError, PipelineError,
    convert_folder,
};
pub use store::{CookieStore, StoreError, WorkingStore, merge};
pub use validator::{Outcome, Tier, Validator, ValidatorError, classify};
