//! Check stage: validate canonical cookie sets and persist live ones.
//!
//! The [`CheckEngine`] validates every set in a [`CookieStore`] and writes
//! live sets to a [`WorkingStore`]. With the default concurrency of one,
//! sets are validated strictly one after another.
//!
//! # Example
//!
//! ```no_run
//! use cookie_checker_core::pipeline::CheckEngine;
//! use cookie_checker_core::store::{CookieStore, WorkingStore};
//! use cookie_checker_core::validator::Validator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = CheckEngine::new(1)?;
//! let summary = engine
//!     .check_store(
//!         &CookieStore::new("json__spotify_cookies"),
//!         &Validator::new()?,
//!         &WorkingStore::new("working_cookies"),
//!     )
//!     .await?;
//! println!("{}/{} cookie sets are live", summary.live(), summary.total());
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use super::error::{EngineError, PipelineError};
use crate::store::{CookieStore, WorkingStore};
use crate::validator::{Outcome, Tier, Validator};

/// Minimum allowed concurrency value.
pub(crate) const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub(crate) const MAX_CONCURRENCY: usize = 100;

/// Default concurrency: one cookie set at a time.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// A validated cookie set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckedSet {
    /// Classification outcome.
    pub outcome: Outcome,
    /// Working-store file written for live sets.
    pub working_file: Option<PathBuf>,
}

/// Per-key result of a check run.
#[derive(Debug)]
pub struct CheckResult {
    /// Cookie set key.
    pub key: String,
    /// Outcome, or the error that prevented validation.
    pub result: Result<CheckedSet, PipelineError>,
}

impl CheckResult {
    /// Outcome when validation ran.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.result.as_ref().ok().map(|checked| checked.outcome)
    }
}

/// Results of a check run, sorted by key.
#[derive(Debug, Default)]
pub struct CheckSummary {
    results: Vec<CheckResult>,
}

impl CheckSummary {
    fn from_results(mut results: Vec<CheckResult>) -> Self {
        results.sort_by(|a, b| a.key.cmp(&b.key));
        Self { results }
    }

    /// Per-key results.
    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    fn count(&self, predicate: impl Fn(Outcome) -> bool) -> usize {
        self.results
            .iter()
            .filter_map(CheckResult::outcome)
            .filter(|&outcome| predicate(outcome))
            .count()
    }

    /// Sets confirmed live (any tier).
    #[must_use]
    pub fn live(&self) -> usize {
        self.count(Outcome::is_live)
    }

    /// Sets the endpoint did not accept.
    #[must_use]
    pub fn invalid(&self) -> usize {
        self.count(|outcome| outcome == Outcome::Invalid)
    }

    /// Sets whose request failed.
    #[must_use]
    pub fn unreachable(&self) -> usize {
        self.count(|outcome| outcome == Outcome::Unreachable)
    }

    /// Sets that could not be validated (corrupt store file, write failure).
    #[must_use]
    pub fn errored(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_err()).count()
    }

    /// Total sets processed.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Live sets per tier; tiers with no sets are omitted.
    #[must_use]
    pub fn by_tier(&self) -> BTreeMap<Tier, usize> {
        let mut counts = BTreeMap::new();
        for tier in self
            .results
            .iter()
            .filter_map(CheckResult::outcome)
            .filter_map(Outcome::tier)
        {
            *counts.entry(tier).or_insert(0) += 1;
        }
        counts
    }
}

/// Validates one stored cookie set and saves it to the working store when live.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] when the set cannot be loaded or the
/// working file cannot be written, and [`PipelineError::MissingSet`] when no
/// set is stored under `key`. Transport failures are not errors; they yield
/// [`Outcome::Unreachable`].
#[instrument(level = "debug", skip(store, validator, working))]
pub async fn check_one(
    key: &str,
    store: &CookieStore,
    validator: &Validator,
    working: &WorkingStore,
) -> Result<CheckedSet, PipelineError> {
    let records = store.load(key)?.ok_or_else(|| PipelineError::MissingSet {
        key: key.to_string(),
    })?;

    let outcome = validator.validate(&records).await;
    let working_file = match outcome {
        Outcome::Live(tier) => Some(working.save(key, tier, &records)?),
        Outcome::Invalid | Outcome::Unreachable => None,
    };

    info!(key, outcome = %outcome, "checked cookie set");
    Ok(CheckedSet {
        outcome,
        working_file,
    })
}

/// Runs the check stage over a whole store.
///
/// Each key is owned by exactly one task for its whole load, validate, and
/// save sequence, so no two tasks touch the same key.
#[derive(Debug)]
pub struct CheckEngine {
    semaphore: Arc<Semaphore>,
    concurrency: usize,
}

impl CheckEngine {
    /// Creates an engine that validates up to `concurrency` sets at once.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    pub fn new(concurrency: usize) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        debug!(concurrency, "creating check engine");
        Ok(Self {
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Validates every set in `store`.
    ///
    /// Individual failures are recorded in the summary; they never stop the
    /// batch.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Listing`] if the store cannot be listed and
    /// [`EngineError::SemaphoreClosed`] if the semaphore is closed.
    #[instrument(skip_all, fields(store = %store.root().display()))]
    pub async fn check_store(
        &self,
        store: &CookieStore,
        validator: &Validator,
        working: &WorkingStore,
    ) -> Result<CheckSummary, EngineError> {
        let keys = store.keys().map_err(|source| EngineError::Listing {
            path: store.root().to_path_buf(),
            source,
        })?;
        info!(sets = keys.len(), concurrency = self.concurrency, "checking cookie sets");

        let mut handles = Vec::with_capacity(keys.len());
        for key in keys {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| EngineError::SemaphoreClosed)?;

            let store = store.clone();
            let validator = validator.clone();
            let working = working.clone();

            let task_key = key.clone();
            handles.push((
                task_key,
                tokio::spawn(async move {
                    let _permit = permit;
                    let result = check_one(&key, &store, &validator, &working).await;
                    if let Err(error) = &result {
                        warn!(key = %key, error = %error, "failed to check cookie set");
                    }
                    CheckResult { key, result }
                }),
            ));
        }

        let summary = CheckSummary::from_results(join_results(handles).await);
        info!(
            live = summary.live(),
            invalid = summary.invalid(),
            unreachable = summary.unreachable(),
            errored = summary.errored(),
            total = summary.total(),
            "check finished"
        );
        Ok(summary)
    }
}

/// Awaits every task. A task that panicked or was cancelled still yields a
/// failed result for its key.
async fn join_results(handles: Vec<(String, JoinHandle<CheckResult>)>) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(handles.len());
    for (key, handle) in handles {
        match handle.await {
            Ok(result) => results.push(result),
            Err(e) => {
                warn!(key = %key, error = %e, "check task panicked");
                results.push(CheckResult {
                    key: key.clone(),
                    result: Err(PipelineError::TaskFailed {
                        key,
                        reason: e.to_string(),
                    }),
                });
            }
        }
    }
    results
}
