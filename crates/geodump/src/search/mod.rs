//! Country search over the [`CountryIndex`].
//!
//! Two scopes exist: an exact ISO code match, where the query is uppercased,
//! and a literal case-sensitive name prefix match. [`search`] tries the first
//! and falls back to the second only when it comes back empty.

use std::fmt;

use tracing::trace;

use crate::index::CountryIndex;

/// Which scope produced a [`search`] result.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchKind {
    /// `iso` or `iso3` equals the uppercased query
    Iso,
    /// `name` starts with the query as given
    Name,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iso => f.write_str("iso"),
            Self::Name => f.write_str("name"),
        }
    }
}

/// Positions of countries whose 2- or 3-letter code equals `query` uppercased.
pub(crate) fn iso_positions(index: &CountryIndex, query: &str) -> Vec<usize> {
    index.by_code(&query.to_uppercase()).to_vec()
}

/// Positions of countries whose name starts with `query`. No case folding.
pub(crate) fn name_positions(index: &CountryIndex, query: &str) -> Vec<usize> {
    index.by_name_prefix(query)
}

/// ISO match set if non-empty, otherwise the name prefix set. Never a union.
pub(crate) fn search_positions(index: &CountryIndex, query: &str) -> (MatchKind, Vec<usize>) {
    let iso = iso_positions(index, query);
    if !iso.is_empty() {
        trace!(query, matches = iso.len(), "Matched on ISO code");
        return (MatchKind::Iso, iso);
    }

    let name = name_positions(index, query);
    trace!(query, matches = name.len(), "Fell back to name prefix");
    (MatchKind::Name, name)
}
