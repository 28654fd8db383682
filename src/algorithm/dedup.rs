//! Exact-duplicate row removal

use arrow::array::UInt32Array;
use arrow::compute::take_record_batch;
use arrow::record_batch::RecordBatch;
use arrow::row::{RowConverter, SortField};
use log::info;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Counters for the dedup stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupReport {
    /// Rows read
    pub rows_in: usize,
    /// Rows kept
    pub rows_out: usize,
    /// Rows dropped as duplicates
    pub duplicates: usize,
}

/// Drop rows equal to an earlier row in every column, keeping the first
pub fn dedup_rows(batch: &RecordBatch) -> Result<(RecordBatch, DedupReport)> {
    let rows_in = batch.num_rows();
    if batch.num_columns() == 0 || rows_in == 0 {
        return Ok((batch.clone(), DedupReport { rows_in, rows_out: rows_in, duplicates: 0 }));
    }

    let fields = batch
        .schema()
        .fields()
        .iter()
        .map(|f| SortField::new(f.data_type().clone()))
        .collect();
    let converter = RowConverter::new(fields)?;
    let rows = converter.convert_columns(batch.columns())?;

    let mut seen = FxHashSet::default();
    let mut keep = Vec::with_capacity(rows_in);
    for (idx, row) in rows.iter().enumerate() {
        if seen.insert(row) {
            let idx = u32::try_from(idx)
                .map_err(|_| PipelineError::MalformedSchema(format!("table has too many rows: {rows_in}")))?;
            keep.push(idx);
        }
    }

    let report = DedupReport {
        rows_in,
        rows_out: keep.len(),
        duplicates: rows_in - keep.len(),
    };
    info!("Removed {} duplicate rows, {} remain", report.duplicates, report.rows_out);

    if report.duplicates == 0 {
        return Ok((batch.clone(), report));
    }
    let deduped = take_record_batch(batch, &UInt32Array::from(keep))?;
    Ok((deduped, report))
}
