//! Ordered sets of variant codes

use smallvec::SmallVec;

use crate::models::code::NormalizedCode;

/// Distinct candidate codes for one record, in extraction order
///
/// Sets are small (a handful of codes per row), so membership is a linear
/// scan over inline storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantSet {
    codes: SmallVec<[NormalizedCode; 4]>,
}

impl VariantSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `code` unless it is already present; returns whether it was added
    pub fn insert(&mut self, code: NormalizedCode) -> bool {
        if self.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    #[must_use]
    pub fn contains(&self, code: &NormalizedCode) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Codes in extraction order
    pub fn iter(&self) -> impl Iterator<Item = &NormalizedCode> {
        self.codes.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[NormalizedCode] {
        &self.codes
    }

    /// Plain strings in extraction order
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.codes.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a NormalizedCode;
    type IntoIter = std::slice::Iter<'a, NormalizedCode>;

    fn into_iter(self) -> Self::IntoIter {
        self.codes.iter()
    }
}
