//! Working-cookie store for cookie sets confirmed live.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use super::{StoreError, validate_key, write_records};
use crate::cookies::CookieRecord;
use crate::validator::Tier;

/// File name for a live set: `<key>_<tier with spaces replaced by underscores>`.
#[must_use]
pub fn working_file_name(key: &str, tier: Tier) -> String {
    format!("{key}_{}", tier.file_suffix())
}

/// Directory holding live cookie sets, one file per key and tier.
#[derive(Debug, Clone)]
pub struct WorkingStore {
    root: PathBuf,
}

impl WorkingStore {
    /// Creates a working store rooted at `root`. The directory is created
    /// lazily on first save.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes a live cookie set, replacing any earlier file for the same key
    /// and tier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidKey`] for keys that are not plain file
    /// names, or [`StoreError::Io`] when the directory or file cannot be written.
    #[instrument(level = "debug", skip(self, records), fields(tier = %tier))]
    pub fn save(
        &self,
        key: &str,
        tier: Tier,
        records: &[CookieRecord],
    ) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        fs::create_dir_all(&self.root).map_err(|e| StoreError::io(&self.root, e))?;

        let path = self.root.join(working_file_name(key, tier));
        write_records(&path, records)?;
        info!(key, tier = %tier, path = %path.display(), "saved working cookie set");
        Ok(path)
    }
}
