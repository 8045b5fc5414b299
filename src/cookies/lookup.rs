//! Name→value reduction of a cookie set.

use std::collections::HashMap;
use std::fmt;

use super::CookieRecord;

/// Ordered name→value view of a cookie set.
///
/// Names keep the position of their first occurrence while the value of the
/// last occurrence wins, so a set produced by appending newer records onto
/// older ones resolves to the newer values.
#[derive(Clone, Default)]
pub struct CookieLookup {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl CookieLookup {
    /// Builds the lookup from an ordered record sequence.
    #[must_use]
    pub fn from_records(records: &[CookieRecord]) -> Self {
        let mut lookup = Self::default();
        for record in records {
            lookup.insert(&record.name, record.value());
        }
        lookup
    }

    fn insert(&mut self, name: &str, value: &str) {
        if let Some(&position) = self.index.get(name) {
            self.entries[position].1 = value.to_string();
        } else {
            self.index.insert(name.to_string(), self.entries.len());
            self.entries.push((name.to_string(), value.to_string()));
        }
    }

    /// Returns the authoritative value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&position| self.entries[position].1.as_str())
    }

    /// Number of distinct cookie names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the set had no cookies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over cookie names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Renders the lookup as a `Cookie` request header value
    /// (`name=value; other=value`).
    ///
    /// The result contains every cookie value. Never log it.
    #[must_use]
    pub fn to_header_value(&self) -> String {
        self.entries
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Debug for CookieLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieLookup")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
