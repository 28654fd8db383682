//! VTRAC cross-referencing
//!
//! Builds the code → VTRAC index from rows that already carry a VTRAC, fills
//! the rows that do not, and resolves several matches through their common
//! prefix.

pub mod fill;
pub mod index;
pub mod prefix;

use std::collections::BTreeSet;

pub use fill::{FillOutcome, FillReport, FillSettings, fill_missing, fill_vtrac, resolve_record};
pub use index::{VtracIndex, VtracIndexBuilder};
pub use prefix::common_prefix;

/// VTRAC codes matched for one record, sorted and deduplicated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    codes: BTreeSet<String>,
}

impl MatchResult {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every code of an index entry
    pub fn extend_from(&mut self, codes: &BTreeSet<String>) {
        self.codes.extend(codes.iter().cloned());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.codes.iter()
    }

    /// Longest prefix shared by all matched codes, `None` when nothing matched
    #[must_use]
    pub fn common_prefix(&self) -> Option<String> {
        (!self.is_empty()).then(|| common_prefix(&self.codes))
    }
}

impl<S: Into<String>> FromIterator<S> for MatchResult {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}
