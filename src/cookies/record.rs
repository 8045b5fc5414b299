//! Canonical cookie record shared by every supported input encoding.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Expiration as it appeared in the source file.
///
/// Structured exports carry numbers (often fractional Unix timestamps),
/// legacy tabular files carry the raw text field. Both are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Expiration {
    /// Numeric timestamp from a structured export.
    Number(serde_json::Number),
    /// Raw text field (legacy tabular exports, or quoted numbers).
    Text(String),
}

impl fmt::Display for Expiration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => write!(f, "{number}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// A single cookie in canonical form.
///
/// Only `name` and `value` take part in validation; the remaining fields are
/// metadata carried through so the canonical file stays faithful to its
/// source. Fields of structured exports that have no canonical slot (for
/// example `hostOnly` or `sameSite`) are kept in [`extra`](Self::extra).
///
/// The value field is redacted in Debug output.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CookieRecord {
    /// Cookie domain.
    #[serde(default)]
    pub domain: String,
    /// Legacy tail-match flag column, when the source had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// URL path scope.
    #[serde(default)]
    pub path: String,
    /// Whether the cookie is HTTPS-only.
    #[serde(default)]
    pub secure: bool,
    /// Expiration, if the source carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<Expiration>,
    /// Cookie name; the lookup key when building the request header.
    pub name: String,
    /// Cookie value. Sensitive, never logged.
    value: String,
    /// Unrecognized fields from structured exports, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CookieRecord {
    /// Creates a record with only a name and value set.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            domain: String::new(),
            flag: None,
            path: String::new(),
            secure: false,
            expiration: None,
            name: name.into(),
            value: value.into(),
            extra: Map::new(),
        }
    }

    /// Creates a record from the seven positional columns of a legacy line.
    #[must_use]
    pub(crate) fn from_columns(
        domain: String,
        flag: String,
        path: String,
        secure: bool,
        expiration: String,
        name: String,
        value: String,
    ) -> Self {
        Self {
            domain,
            flag: Some(flag),
            path,
            secure,
            expiration: Some(Expiration::Text(expiration)),
            name,
            value,
            extra: Map::new(),
        }
    }

    /// Returns the cookie value.
    ///
    /// Cookie values are sensitive; avoid logging the return value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for CookieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieRecord")
            .field("domain", &self.domain)
            .field("flag", &self.flag)
            .field("path", &self.path)
            .field("secure", &self.secure)
            .field("expiration", &self.expiration)
            .field("name", &self.name)
            .field("value", &"[REDACTED]")
            .field("extra", &self.extra.keys().collect::<Vec<_>>())
            .finish()
    }
}
