//! On-disk canonical cookie store.
//!
//! One pretty-printed JSON array per cookie set, named after the input file
//! it was normalized from (`<root>/<key>`).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::merge::{MergeKind, merge};
use super::{StoreError, validate_key, write_records};
use crate::cookies::CookieRecord;

/// What [`CookieStore::prepare`] did to the store directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preparation {
    /// The directory did not exist and was created.
    Created,
    /// The directory existed and was wiped.
    Cleaned,
    /// The directory existed; new records will be appended to it.
    Reused,
}

/// Result of merging records into a stored cookie set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Path of the canonical file that was written.
    pub path: PathBuf,
    /// Whether the set was created or appended to.
    pub kind: MergeKind,
    /// Total records in the set after the merge.
    pub total_records: usize,
}

/// Directory of canonical cookie sets keyed by file name.
#[derive(Debug, Clone)]
pub struct CookieStore {
    root: PathBuf,
}

impl CookieStore {
    /// Creates a store rooted at `root`. Nothing is touched on disk.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the canonical file path for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] when `key` is not a plain file name.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    /// Ensures the store directory exists, wiping it first when `clean` is set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be removed or created.
    #[instrument(level = "debug", skip(self), fields(root = %self.root.display()))]
    pub fn prepare(&self, clean: bool) -> Result<Preparation, StoreError> {
        let preparation = if self.root.is_dir() {
            if clean {
                self.clear()?;
                Preparation::Cleaned
            } else {
                Preparation::Reused
            }
        } else {
            Preparation::Created
        };

        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        info!(root = %self.root.display(), ?preparation, "cookie store ready");
        Ok(preparation)
    }

    /// Removes the store directory and every cookie set in it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when removal fails.
    pub fn clear(&self) -> Result<(), StoreError> {
        if self.root.exists() {
            fs::remove_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;
        }
        Ok(())
    }

    /// Loads the cookie set stored under `key`, if any.
    ///
    /// A file holding a single record rather than a list is read as a
    /// one-element set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] when the file is not a valid record
    /// list, and [`StoreError::Io`] when it cannot be read.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, key: &str) -> Result<Option<Vec<CookieRecord>>, StoreError> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }

        let raw = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        let value: Value =
            serde_json::from_str(&raw).map_err(|e| StoreError::corrupt(&path, e))?;
        let value = match value {
            Value::Array(_) => value,
            single => Value::Array(vec![single]),
        };
        let records: Vec<CookieRecord> =
            serde_json::from_value(value).map_err(|e| StoreError::corrupt(&path, e))?;

        debug!(key, records = records.len(), "loaded canonical cookie set");
        Ok(Some(records))
    }

    /// Merges `records` into the set stored under `key` and writes it back.
    ///
    /// The existing file is parsed before anything is written, so a corrupt
    /// file is reported and left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Corrupt`] when the existing set cannot be parsed,
    /// or [`StoreError::Io`] when reading or writing fails.
    #[instrument(level = "debug", skip(self, records), fields(new_records = records.len()))]
    pub fn merge_into(
        &self,
        key: &str,
        records: Vec<CookieRecord>,
    ) -> Result<MergeOutcome, StoreError> {
        let existing = self.load(key)?;
        let (merged, kind) = merge(existing, records);
        let path = self.path_for(key)?;
        write_records(&path, &merged)?;

        debug!(key, ?kind, total = merged.len(), "merged cookie set");
        Ok(MergeOutcome {
            path,
            kind,
            total_records: merged.len(),
        })
    }

    /// Lists stored keys in sorted order.
    ///
    /// Only regular, non-hidden files count; in-progress writes are hidden.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be listed.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        list_file_names(&self.root)
    }
}

/// Sorted names of regular, non-hidden files directly under `dir`.
pub(crate) fn list_file_names(dir: &Path) -> Result<Vec<String>, StoreError> {
    let entries = fs::read_dir(dir).map_err(|e| StoreError::io(dir, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StoreError::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| StoreError::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    names.sort();
    Ok(names)
}
