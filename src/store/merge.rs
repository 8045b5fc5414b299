//! Record merging for same-keyed cookie sets.

use crate::cookies::CookieRecord;

/// How a merge combined its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    /// No set existed for the key; the new records became the set.
    Created,
    /// New records were appended after an existing set.
    Appended,
}

/// Merges `new_records` onto an optional existing set.
///
/// This is concatenation, not de-duplication: a name present in both inputs
/// appears twice, and the later record is the one a
/// [`CookieLookup`](crate::cookies::CookieLookup) resolves to.
#[must_use]
pub fn merge(
    existing: Option<Vec<CookieRecord>>,
    new_records: Vec<CookieRecord>,
) -> (Vec<CookieRecord>, MergeKind) {
    match existing {
        None => (new_records, MergeKind::Created),
        Some(mut records) => {
            records.extend(new_records);
            (records, MergeKind::Appended)
        }
    }
}
