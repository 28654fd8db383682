//! Variant column expansion
//!
//! Widens a table with one `Доп. Артикул N` column per variant. The width is
//! fixed up front from the largest variant set so every row is written in a
//! single pass.

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;
use log::info;
use serde::Serialize;

use crate::algorithm::variants::VariantExtractor;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::models::{Record, VariantSet};
use crate::utils::arrow::{drop_columns_where, string_array, upsert_columns};

/// Fixed-width variant cells, stored column by column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantColumns {
    columns: Vec<Vec<Option<String>>>,
    rows: usize,
}

impl VariantColumns {
    /// Lay out variant sets into `max |set|` columns, optionally capped
    ///
    /// Rows with fewer variants get empty trailing cells; with a cap, the
    /// variants beyond it are dropped.
    #[must_use]
    pub fn from_sets(sets: &[VariantSet], cap: Option<usize>) -> Self {
        let widest = sets.iter().map(VariantSet::len).max().unwrap_or(0);
        let width = cap.map_or(widest, |cap| widest.min(cap));

        let mut columns = vec![vec![None; sets.len()]; width];
        for (row, set) in sets.iter().enumerate() {
            for (column, code) in columns.iter_mut().zip(set.iter()) {
                column[row] = Some(code.as_str().to_string());
            }
        }

        Self {
            columns,
            rows: sets.len(),
        }
    }

    /// Number of variant columns
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Cell at `row` of the 0-based variant column `column`
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.columns.get(column)?.get(row)?.as_deref()
    }

    /// Arrow arrays named with `name_for(n)` for the 1-based column number `n`
    pub fn into_arrays<F>(self, name_for: F) -> Vec<(String, ArrayRef)>
    where
        F: Fn(usize) -> String,
    {
        self.columns
            .into_iter()
            .enumerate()
            .map(|(i, values)| (name_for(i + 1), string_array(values)))
            .collect()
    }
}

/// Counters for the expansion stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpandReport {
    /// Rows processed
    pub rows: usize,
    /// Variant columns written
    pub variant_columns: usize,
    /// Rows with at least one variant
    pub rows_with_variants: usize,
    /// Rows whose text could not be scanned
    pub malformed: usize,
}

/// Compute the variant set of every record, counting malformed ones
#[must_use]
pub fn extract_all(records: &[Record], extractor: &VariantExtractor) -> (Vec<VariantSet>, usize) {
    let mut malformed = 0;
    let sets = records
        .iter()
        .enumerate()
        .map(|(row, record)| {
            extractor.try_extract(record).unwrap_or_else(|e| {
                log::debug!("Row {row}: {e}, no variants extracted");
                malformed += 1;
                VariantSet::new()
            })
        })
        .collect();
    (sets, malformed)
}

/// Append `Доп. Артикул 1..n` columns to `batch`
///
/// Variant columns already present in the input are replaced.
pub fn expand_variants(batch: &RecordBatch, config: &PipelineConfig) -> Result<(RecordBatch, ExpandReport)> {
    let columns = &config.columns;
    let records = Record::from_batch(batch, columns)?;
    let extractor = VariantExtractor::from_config(config);

    let (sets, malformed) = extract_all(&records, &extractor);
    let variant_columns = VariantColumns::from_sets(&sets, config.max_variant_columns);

    let report = ExpandReport {
        rows: records.len(),
        variant_columns: variant_columns.width(),
        rows_with_variants: sets.iter().filter(|s| !s.is_empty()).count(),
        malformed,
    };
    info!(
        "Extracted variants for {} of {} rows into {} columns ({} malformed rows)",
        report.rows_with_variants, report.rows, report.variant_columns, report.malformed
    );

    let base = drop_columns_where(batch, |name| columns.is_variant_column(name))?;
    let expanded = upsert_columns(&base, variant_columns.into_arrays(|n| columns.variant_column(n)))?;

    Ok((expanded, report))
}
