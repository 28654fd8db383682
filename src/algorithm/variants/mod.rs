//! Variant extraction
//!
//! Derives alternate article codes for a record from its own article code
//! and from its description. Every candidate is normalized, filtered by
//! length and deduplicated; the record's primary code is never a variant.

pub mod code;
pub mod nomenclature;

use crate::algorithm::normalize::canonical_key;
use crate::config::{DEFAULT_MIN_VARIANT_LEN, PipelineConfig};
use crate::models::{NormalizedCode, Record, VariantSet};

pub use code::code_candidates;
pub use nomenclature::nomenclature_candidates;

/// A record whose text cannot be scanned for variants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed {field} text")]
pub struct MalformedRecord {
    /// Which text field is broken
    pub field: &'static str,
}

/// Extracts variant codes from records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantExtractor {
    min_len: usize,
    fold_case: bool,
}

impl Default for VariantExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_VARIANT_LEN, false)
    }
}

impl VariantExtractor {
    /// Create an extractor keeping variants of at least `min_len` characters
    #[must_use]
    pub const fn new(min_len: usize, fold_case: bool) -> Self {
        Self { min_len, fold_case }
    }

    #[must_use]
    pub const fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.min_variant_len, config.fold_case)
    }

    /// The record's own normalized article code
    #[must_use]
    pub fn primary_code(&self, record: &Record) -> NormalizedCode {
        record
            .article
            .as_deref()
            .map(|raw| canonical_key(raw, self.fold_case))
            .unwrap_or_default()
    }

    /// Normalize `raw` the same way variants are normalized
    #[must_use]
    pub fn key(&self, raw: &str) -> NormalizedCode {
        canonical_key(raw, self.fold_case)
    }

    /// Extract the variant set, reporting records with broken text
    pub fn try_extract(&self, record: &Record) -> Result<VariantSet, MalformedRecord> {
        if let Some(field) = record.malformed_field() {
            return Err(MalformedRecord { field });
        }

        let primary = self.primary_code(record);
        let mut variants = VariantSet::new();

        let from_code = record.article.as_deref().map(code_candidates).unwrap_or_default();
        let from_text = record
            .nomenclature
            .as_deref()
            .map(nomenclature_candidates)
            .unwrap_or_default();

        for raw in from_code.iter().chain(&from_text) {
            let candidate = self.key(raw);
            if candidate.char_len() >= self.min_len && candidate != primary {
                variants.insert(candidate);
            }
        }

        Ok(variants)
    }

    /// Extract the variant set; broken records yield an empty set
    #[must_use]
    pub fn extract(&self, record: &Record) -> VariantSet {
        self.try_extract(record).unwrap_or_else(|e| {
            log::debug!("Skipping variant extraction: {e}");
            VariantSet::new()
        })
    }
}

/// Extract variants with the default settings
#[must_use]
pub fn extract_variants(record: &Record) -> VariantSet {
    VariantExtractor::default().extract(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variants_from_description() {
        let record = Record::new("AB-12 3", "widget XY-9876 spare (QW12/ER34)");
        let variants = extract_variants(&record);
        assert_eq!(variants.to_strings(), vec!["QW12", "ER34", "XY9876", "QW12ER34"]);
    }

    #[test]
    fn test_primary_code_is_not_a_variant() {
        let record = Record::new("AB-12 3", "widget AB123 spare");
        assert!(extract_variants(&record).is_empty());
        assert_eq!(VariantExtractor::default().primary_code(&record), "AB123");
    }

    #[test]
    fn test_short_candidates_are_dropped() {
        let record = Record::new("AB-CD-EF", "");
        let variants = extract_variants(&record);
        assert_eq!(variants.to_strings(), vec!["ABCD"]);
    }

    #[test]
    fn test_duplicates_suppressed_after_normalization() {
        let record = Record::new("12345/67890", "see 12345 and 67-890");
        let variants = extract_variants(&record);
        assert_eq!(variants.to_strings(), vec!["12345", "67890"]);
    }

    #[test]
    fn test_empty_record() {
        assert!(extract_variants(&Record::default()).is_empty());
    }

    #[test]
    fn test_malformed_record_yields_empty_set() {
        let record = Record::new("AB-1234-5", "bad \u{FFFD} text (CD5678)");
        let extractor = VariantExtractor::default();
        assert_eq!(
            extractor.try_extract(&record),
            Err(MalformedRecord { field: "nomenclature" })
        );
        assert!(extractor.extract(&record).is_empty());
    }

    #[test]
    fn test_fold_case() {
        let record = Record::new("ab-12", "spare (ab12x)");
        let variants = VariantExtractor::new(4, true).extract(&record);
        assert_eq!(variants.to_strings(), vec!["AB12X"]);
    }
}
