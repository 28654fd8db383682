//! VTRAC lookup index
//!
//! A multimap from normalized article code to every VTRAC code seen for it.
//! Noisy source data can tie one code to several VTRAC values; the set is
//! kept whole and resolved later by prefix aggregation.
//!
//! Catalog codes can optionally be matched by prefix as well: a probe then
//! also hits every catalog code that starts with it. Those keys are kept in
//! a sorted map so the hits form one contiguous range.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use arrow::record_batch::RecordBatch;
use log::{debug, info};
use rustc_hash::FxHashMap;

use crate::algorithm::normalize::canonical_key;
use crate::config::CatalogColumns;
use crate::error::{PipelineError, Result};
use crate::models::{NormalizedCode, Record};
use crate::utils::arrow::{cell_text, get_string_column};

/// Read-only map from normalized article code to VTRAC codes
#[derive(Debug, Clone, Default)]
pub struct VtracIndex {
    entries: FxHashMap<NormalizedCode, BTreeSet<String>>,
    catalog_keys: BTreeMap<NormalizedCode, BTreeSet<String>>,
    fold_case: bool,
    catalog_prefix_match: bool,
}

impl VtracIndex {
    /// Build an index from the records that already carry a VTRAC
    #[must_use]
    pub fn build(records: &[Record], fold_case: bool, include_known_variants: bool) -> Self {
        let mut builder = VtracIndexBuilder::new(fold_case);
        builder.add_records(records, include_known_variants);
        builder.finish()
    }

    /// Start an empty builder
    #[must_use]
    pub fn builder(fold_case: bool) -> VtracIndexBuilder {
        VtracIndexBuilder::new(fold_case)
    }

    /// VTRAC codes for an already normalized key
    #[must_use]
    pub fn lookup(&self, code: &NormalizedCode) -> Option<&BTreeSet<String>> {
        self.entries.get(code)
    }

    /// Every VTRAC set matched by `code`
    ///
    /// Yields the exact entry first, then, with catalog prefix matching on,
    /// the entries of all catalog codes starting with `code`.
    pub fn matching<'a>(&'a self, code: &'a NormalizedCode) -> impl Iterator<Item = &'a BTreeSet<String>> + 'a {
        let prefixed = (self.catalog_prefix_match && !code.is_empty()).then(|| {
            self.catalog_keys
                .range::<str, _>((Bound::Included(code.as_str()), Bound::Unbounded))
                .take_while(move |(key, _)| key.as_str().starts_with(code.as_str()))
                .map(|(_, vtracs)| vtracs)
        });
        self.lookup(code).into_iter().chain(prefixed.into_iter().flatten())
    }

    /// VTRAC codes for a raw article code
    #[must_use]
    pub fn get(&self, raw: &str) -> Option<&BTreeSet<String>> {
        let key = canonical_key(raw, self.fold_case);
        self.entries.get(key.as_str())
    }

    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.get(raw).is_some()
    }

    /// Number of distinct article codes
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Codes tied to more than one VTRAC value
    #[must_use]
    pub fn ambiguous_keys(&self) -> usize {
        self.entries.values().filter(|v| v.len() > 1).count()
    }

    /// Whether keys were upper-cased on insertion
    #[must_use]
    pub const fn fold_case(&self) -> bool {
        self.fold_case
    }

    /// Whether probes also match catalog codes by prefix
    #[must_use]
    pub const fn catalog_prefix_match(&self) -> bool {
        self.catalog_prefix_match
    }
}

/// Accumulates associations before freezing them into a [`VtracIndex`]
#[derive(Debug, Default)]
pub struct VtracIndexBuilder {
    entries: FxHashMap<NormalizedCode, BTreeSet<String>>,
    catalog_keys: BTreeMap<NormalizedCode, BTreeSet<String>>,
    fold_case: bool,
    catalog_prefix_match: bool,
}

impl VtracIndexBuilder {
    #[must_use]
    pub fn new(fold_case: bool) -> Self {
        Self {
            entries: FxHashMap::default(),
            catalog_keys: BTreeMap::new(),
            fold_case,
            catalog_prefix_match: false,
        }
    }

    /// Let probes match catalog codes they are a prefix of
    #[must_use]
    pub fn with_catalog_prefix_match(mut self, enabled: bool) -> Self {
        self.catalog_prefix_match = enabled;
        self
    }

    /// Associate `raw_code` with `vtrac`; blank codes or values are ignored
    ///
    /// Returns whether a new association was recorded.
    pub fn insert(&mut self, raw_code: &str, vtrac: &str) -> bool {
        let vtrac = vtrac.trim();
        let key = canonical_key(raw_code, self.fold_case);
        if key.is_empty() || vtrac.is_empty() {
            return false;
        }
        self.entries.entry(key).or_default().insert(vtrac.to_string())
    }

    /// Index every record with a VTRAC by its article code
    ///
    /// With `include_known_variants`, the record's existing variant column
    /// values are indexed as well. Returns the number of records used.
    pub fn add_records(&mut self, records: &[Record], include_known_variants: bool) -> usize {
        let mut used = 0;
        for record in records {
            let Some(vtrac) = record.vtrac_value() else {
                continue;
            };
            used += 1;

            if let Some(article) = record.article.as_deref() {
                self.insert(article, vtrac);
            }
            if include_known_variants {
                for variant in &record.known_variants {
                    self.insert(variant, vtrac);
                }
            }
        }
        debug!("Indexed {used} of {} records carrying a VTRAC", records.len());
        used
    }

    /// Index an external catalog by both its article and analog columns
    ///
    /// # Errors
    /// `MalformedSchema` when neither code column or the VTRAC column is present
    pub fn add_catalog(&mut self, catalog: &RecordBatch, columns: &CatalogColumns) -> Result<usize> {
        let schema = catalog.schema();
        if schema.index_of(&columns.vtrac).is_err() {
            return Err(PipelineError::missing_column(&columns.vtrac));
        }
        if schema.index_of(&columns.article).is_err() && schema.index_of(&columns.analog).is_err() {
            return Err(PipelineError::MalformedSchema(format!(
                "catalog has neither '{}' nor '{}' column",
                columns.article, columns.analog
            )));
        }

        let articles = get_string_column(catalog, &columns.article)?;
        let analogs = get_string_column(catalog, &columns.analog)?;
        let vtracs = get_string_column(catalog, &columns.vtrac)?;

        let mut added = 0;
        for row in 0..catalog.num_rows() {
            let Some(vtrac) = cell_text(&vtracs, row) else {
                continue;
            };
            for code in [cell_text(&articles, row), cell_text(&analogs, row)].into_iter().flatten() {
                if self.insert(code, vtrac) {
                    added += 1;
                }
                if self.catalog_prefix_match {
                    let key = canonical_key(code, self.fold_case);
                    if !key.is_empty() {
                        self.catalog_keys.entry(key).or_default().insert(vtrac.to_string());
                    }
                }
            }
        }
        info!("Added {added} catalog associations to the VTRAC index");
        Ok(added)
    }

    /// Freeze the builder
    #[must_use]
    pub fn finish(self) -> VtracIndex {
        let index = VtracIndex {
            entries: self.entries,
            catalog_keys: self.catalog_keys,
            fold_case: self.fold_case,
            catalog_prefix_match: self.catalog_prefix_match,
        };
        info!(
            "VTRAC index holds {} article codes ({} with several VTRAC values)",
            index.len(),
            index.ambiguous_keys()
        );
        index
    }
}
