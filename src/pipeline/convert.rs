//! Convert stage: normalize input files into the canonical store.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use super::error::{EngineError, PipelineError};
use crate::cookies::{CookieFormat, load_cookie_file};
use crate::store::{CookieStore, MergeKind, StoreError, list_file_names};

/// One input file written to the canonical store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    /// Cookie set key (the input file name).
    pub key: String,
    /// Detected input encoding.
    pub format: CookieFormat,
    /// Records normalized from this file.
    pub records: usize,
    /// Whether the set was created or appended to.
    pub merge: MergeKind,
}

/// Result of converting a directory of cookie files.
#[derive(Debug, Default)]
pub struct ConvertReport {
    /// Files converted successfully, in processing order.
    pub converted: Vec<ConvertedFile>,
    /// Files that failed, with the reason. Other files were still processed.
    pub failures: Vec<(String, PipelineError)>,
}

impl ConvertReport {
    /// Number of files converted.
    #[must_use]
    pub fn converted_count(&self) -> usize {
        self.converted.len()
    }

    /// Number of files that failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    /// Total files seen.
    #[must_use]
    pub fn total(&self) -> usize {
        self.converted_count() + self.failed_count()
    }
}

/// Normalizes one cookie file and merges it into the store under its file name.
///
/// # Errors
///
/// Returns [`PipelineError::Format`] when the file cannot be read or
/// normalized, [`PipelineError::Store`] when the existing set is corrupt or
/// cannot be written, and [`PipelineError::NoKey`] for paths without a file name.
#[instrument(level = "debug", skip(store), fields(path = %path.display()))]
pub fn convert_file(path: &Path, store: &CookieStore) -> Result<ConvertedFile, PipelineError> {
    let key = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PipelineError::NoKey {
            path: path.to_path_buf(),
        })?;

    let (format, records) = load_cookie_file(path)?;
    let record_count = records.len();
    let outcome = store.merge_into(&key, records)?;

    info!(
        key = %key,
        format = %format,
        records = record_count,
        merge = ?outcome.kind,
        "converted cookie file"
    );
    Ok(ConvertedFile {
        key,
        format,
        records: record_count,
        merge: outcome.kind,
    })
}

/// Converts every regular file in `input_dir` into the store.
///
/// Files are processed one at a time in name order; a failing file is
/// recorded in the report and does not stop the others.
///
/// # Errors
///
/// Returns [`EngineError::Listing`] when `input_dir` cannot be listed.
#[instrument(skip(store), fields(input = %input_dir.display(), store = %store.root().display()))]
pub fn convert_folder(input_dir: &Path, store: &CookieStore) -> Result<ConvertReport, EngineError> {
    let names = list_file_names(input_dir).map_err(|source| listing(input_dir, source))?;
    info!(files = names.len(), "converting cookie files");

    let mut report = ConvertReport::default();
    for name in names {
        let path: PathBuf = input_dir.join(&name);
        match convert_file(&path, store) {
            Ok(converted) => report.converted.push(converted),
            Err(error) => {
                warn!(file = %name, error = %error, "failed to convert cookie file");
                report.failures.push((name, error));
            }
        }
    }

    info!(
        converted = report.converted_count(),
        failed = report.failed_count(),
        "conversion finished"
    );
    Ok(report)
}

fn listing(path: &Path, source: StoreError) -> EngineError {
    EngineError::Listing {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup() -> (TempDir, PathBuf, CookieStore) {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("cookies");
        fs::create_dir(&input).unwrap();
        let store = CookieStore::new(dir.path().join("json_cookies"));
        store.prepare(false).unwrap();
        (dir, input, store)
    }

    #[test]
    fn test_convert_file_structured() {
        let (_dir, input, store) = setup();
        let path = input.join("acct1.json");
        fs::write(&path, r#"[{"name":"sid","value":"v1"}]"#).unwrap();

        let converted = convert_file(&path, &store).unwrap();
        assert_eq!(converted.key, "acct1.json");
        assert_eq!(converted.format, CookieFormat::Structured);
        assert_eq!(converted.records, 1);
        assert_eq!(converted.merge, MergeKind::Created);
        assert_eq!(store.load("acct1.json").unwrap().unwrap().len(), 1);
    }

    #[test]
    fn test_convert_file_twice_appends() {
        let (_dir, input, store) = setup();
        let path = input.join("acct.txt");
        fs::write(&path, ".spotify.com\tTRUE\t/\tTRUE\t0\tsp_dc\tabc\n").unwrap();

        convert_file(&path, &store).unwrap();
        let second = convert_file(&path, &store).unwrap();
        assert_eq!(second.merge, MergeKind::Appended);
        assert_eq!(store.load("acct.txt").unwrap().unwrap().len(), 2);
    }

    #[test]
    fn test_convert_folder_isolates_failures() {
        let (_dir, input, store) = setup();
        fs::write(input.join("a.json"), r#"[{"name":"sid","value":"v1"}]"#).unwrap();
        fs::write(input.join("b.bin"), [0xff_u8, 0xfe, 0x81]).unwrap();
        fs::write(
            input.join("c.txt"),
            "# Netscape HTTP Cookie File\n.spotify.com\tTRUE\t/\tTRUE\t0\tsp_dc\tabc\n",
        )
        .unwrap();

        let report = convert_folder(&input, &store).unwrap();
        assert_eq!(report.converted_count(), 2);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.total(), 3);
        assert_eq!(report.failures[0].0, "b.bin");
        assert_eq!(store.keys().unwrap(), vec!["a.json", "c.txt"]);
    }

    #[test]
    fn test_convert_folder_corrupt_existing_set_is_per_file_failure() {
        let (_dir, input, store) = setup();
        fs::write(input.join("a.json"), r#"[{"name":"sid","value":"v1"}]"#).unwrap();
        fs::write(input.join("b.json"), r#"[{"name":"sid","value":"v2"}]"#).unwrap();
        fs::write(store.root().join("a.json"), "garbage").unwrap();

        let report = convert_folder(&input, &store).unwrap();
        assert_eq!(report.converted_count(), 1);
        assert!(matches!(
            report.failures[0].1,
            PipelineError::Store(StoreError::Corrupt { .. })
        ));
        assert_eq!(fs::read_to_string(store.root().join("a.json")).unwrap(), "garbage");
    }

    #[test]
    fn test_convert_folder_missing_input_dir_errors() {
        let (dir, _input, store) = setup();
        let err = convert_folder(&dir.path().join("absent"), &store).unwrap_err();
        assert!(matches!(err, EngineError::Listing { .. }));
    }
}
