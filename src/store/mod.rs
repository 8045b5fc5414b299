//! Canonical and working cookie stores.
//!
//! The canonical store holds one normalized cookie set per input file and is
//! where same-keyed inputs are merged. The working store receives sets the
//! validator confirmed live, named after their tier.

mod canonical;
mod error;
mod merge;
mod working;

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::cookies::CookieRecord;

pub(crate) use canonical::list_file_names;
pub use canonical::{CookieStore, MergeOutcome, Preparation};
pub use error::StoreError;
pub use merge::{MergeKind, merge};
pub use working::{WorkingStore, working_file_name};

/// Rejects keys that could escape the store directory or collide with
/// in-progress writes.
fn validate_key(key: &str) -> Result<(), StoreError> {
    let invalid = key.is_empty()
        || key.starts_with('.')
        || key.contains('/')
        || key.contains('\\')
        || key.contains('\0');
    if invalid {
        return Err(StoreError::InvalidKey {
            key: key.to_string(),
        });
    }
    Ok(())
}

/// Serializes records as a 4-space indented JSON array.
fn to_pretty_json(records: &[CookieRecord]) -> Result<Vec<u8>, StoreError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    records
        .serialize(&mut serializer)
        .map_err(StoreError::Serialize)?;
    Ok(buffer)
}

/// Writes records to `path` through a hidden sibling file and a rename, so
/// readers never observe a half-written set.
fn write_records(path: &Path, records: &[CookieRecord]) -> Result<(), StoreError> {
    let json = to_pretty_json(records)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let partial = path.with_file_name(format!(".{file_name}.partial"));

    {
        let mut file = fs::File::create(&partial).map_err(|e| StoreError::io(&partial, e))?;
        file.write_all(&json)
            .and_then(|()| file.sync_all())
            .map_err(|e| StoreError::io(&partial, e))?;
    }

    fs::rename(&partial, path).map_err(|e| StoreError::io(path, e))
}
