//! Conversion of supported cookie encodings into canonical records.

use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument, warn};

use super::format::{decode_text, detect};
use super::{CookieFormat, CookieRecord, FormatError};

/// Minimum TAB-separated columns for a legacy line to qualify.
const LEGACY_COLUMNS: usize = 7;

/// Structured payloads may be a list of records or one bare record.
#[derive(Deserialize)]
#[serde(untagged)]
enum StructuredPayload {
    Many(Vec<CookieRecord>),
    One(Box<CookieRecord>),
}

/// Normalizes cookie file text in the given encoding.
///
/// # Errors
///
/// Returns [`FormatError::Unrecognized`] for [`CookieFormat::Unrecognized`]
/// and [`FormatError::InvalidStructure`] when structured content is not a
/// record or a list of records. Legacy lines that do not qualify are dropped
/// without error.
#[instrument(level = "debug", skip(content))]
pub fn normalize(content: &str, format: CookieFormat) -> Result<Vec<CookieRecord>, FormatError> {
    let records = match format {
        CookieFormat::Structured => normalize_structured(content)?,
        CookieFormat::LegacyTabular => normalize_legacy(content),
        CookieFormat::Unrecognized => return Err(FormatError::Unrecognized),
    };
    debug!(records = records.len(), "normalized cookie content");
    Ok(records)
}

/// Reads, detects, and normalizes a cookie file in one step.
///
/// # Errors
///
/// Returns [`FormatError::Io`] when the file cannot be read, otherwise the
/// errors of [`normalize`].
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn load_cookie_file(path: &Path) -> Result<(CookieFormat, Vec<CookieRecord>), FormatError> {
    let content = std::fs::read(path).map_err(|source| FormatError::io(path, source))?;
    let format = detect(&content);
    let text = decode_text(&content).ok_or(FormatError::Unrecognized)?;
    let records = normalize(text, format)?;
    Ok((format, records))
}

fn normalize_structured(content: &str) -> Result<Vec<CookieRecord>, FormatError> {
    let text = content.strip_prefix('\u{feff}').unwrap_or(content);
    let payload: StructuredPayload = serde_json::from_str(text)
        .map_err(|source| FormatError::InvalidStructure { source })?;
    let records = match payload {
        StructuredPayload::Many(records) => records,
        StructuredPayload::One(record) => vec![*record],
    };

    Ok(records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if record.name.is_empty() {
                warn!(entry = index + 1, "dropping structured cookie with empty name");
                None
            } else {
                Some(record)
            }
        })
        .collect())
}

fn normalize_legacy(content: &str) -> Vec<CookieRecord> {
    let mut records = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim();
        if raw_line.starts_with('#') || line.is_empty() {
            continue;
        }

        match parse_legacy_line(line) {
            Some(record) if record.name.is_empty() => {
                warn!(line = line_number, "dropping cookie line with empty name");
            }
            Some(record) => records.push(record),
            None => debug!(line = line_number, "dropping line with too few columns"),
        }
    }

    records
}

/// Maps the first seven columns of a legacy line; extra columns are ignored.
fn parse_legacy_line(line: &str) -> Option<CookieRecord> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < LEGACY_COLUMNS {
        return None;
    }

    Some(CookieRecord::from_columns(
        strip_www(fields[0]),
        fields[1].to_string(),
        fields[2].to_string(),
        fields[3] == "TRUE",
        fields[4].to_string(),
        fields[5].to_string(),
        fields[6].to_string(),
    ))
}

/// Removes every `www` occurrence so `www.`-prefixed and bare domains
/// compare equal. Domains containing `www` elsewhere are altered too.
fn strip_www(domain: &str) -> String {
    domain.replace("www", "")
}
