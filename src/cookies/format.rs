//! Cookie file format detection.
//!
//! Neither supported encoding carries a format tag, so detection probes the
//! structured (JSON) encoding first and infers the legacy Netscape encoding
//! by elimination when that probe fails on syntax.

use std::fmt;
use std::path::Path;

use serde::de::IgnoredAny;
use tracing::{debug, instrument, warn};

const UTF8_BOM: &str = "\u{feff}";

/// Encoding of a cookie file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieFormat {
    /// JSON array of records (or a single record).
    Structured,
    /// Netscape HTTP Cookie File: `#` comments, TAB-separated columns.
    LegacyTabular,
    /// Content could not be decoded at all.
    Unrecognized,
}

impl CookieFormat {
    /// Returns the stable string label for logs and reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::LegacyTabular => "legacy-tabular",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for CookieFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decodes raw file bytes as UTF-8 text, dropping a leading byte order mark.
pub(crate) fn decode_text(content: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(content).ok()?;
    Some(text.strip_prefix(UTF8_BOM).unwrap_or(text))
}

/// Classifies raw cookie file content.
///
/// Any well-formed JSON document is [`CookieFormat::Structured`]. A JSON
/// syntax error (including truncated input) means the content is assumed to
/// be [`CookieFormat::LegacyTabular`]; the legacy format is never positively
/// validated. Content that is not valid UTF-8 is
/// [`CookieFormat::Unrecognized`].
#[must_use]
pub fn detect(content: &[u8]) -> CookieFormat {
    let Some(text) = decode_text(content) else {
        debug!("cookie content is not valid UTF-8");
        return CookieFormat::Unrecognized;
    };

    match serde_json::from_str::<IgnoredAny>(text) {
        Ok(_) => CookieFormat::Structured,
        Err(error) if error.is_syntax() || error.is_eof() => CookieFormat::LegacyTabular,
        Err(error) => {
            debug!(error = %error, "JSON probe failed outside syntax checks");
            CookieFormat::Unrecognized
        }
    }
}

/// Reads and classifies a cookie file. Read failures yield
/// [`CookieFormat::Unrecognized`].
#[must_use]
#[instrument(level = "debug", fields(path = %path.display()))]
pub fn detect_file(path: &Path) -> CookieFormat {
    match std::fs::read(path) {
        Ok(content) => detect(&content),
        Err(error) => {
            warn!(path = %path.display(), error = %error, "cannot read cookie file");
            CookieFormat::Unrecognized
        }
    }
}
