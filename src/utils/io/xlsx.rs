//! Excel workbook operations
//!
//! Only the first worksheet is read. Its first row holds the headers and
//! every cell is turned into text, numbers through their display form.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use calamine::{Data, Reader, open_workbook_auto};
use rust_xlsxwriter::Workbook;

use crate::error::util::ensure_input_file;
use crate::error::{PipelineError, Result};
use crate::utils::arrow::{string_array, to_utf8};

fn cell_value(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Read the first worksheet of a workbook into a single record batch
pub fn read_xlsx(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    ensure_input_file(path)?;
    let mut workbook = open_workbook_auto(path).map_err(|e| PipelineError::Spreadsheet(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::MalformedSchema("workbook has no worksheets".to_string()))?
        .map_err(|e| PipelineError::Spreadsheet(e.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| PipelineError::MalformedSchema("worksheet has no header row".to_string()))?;
    let fields = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell_value(cell).map(|n| n.trim().to_string()).unwrap_or_default();
            let name = if name.is_empty() { format!("Column {}", i + 1) } else { name };
            Field::new(name, DataType::Utf8, true)
        })
        .collect::<Vec<_>>();

    let mut columns: Vec<Vec<Option<String>>> = vec![Vec::new(); fields.len()];
    for row in rows {
        for (idx, column) in columns.iter_mut().enumerate() {
            column.push(row.get(idx).and_then(cell_value));
        }
    }

    let num_rows = columns.first().map_or(0, Vec::len);
    let arrays: Vec<ArrayRef> = columns.into_iter().map(string_array).collect();
    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new_with_options(
        Arc::clone(&schema),
        arrays,
        &RecordBatchOptions::new().with_row_count(Some(num_rows)),
    )?;
    Ok((schema, vec![batch]))
}

/// Write a record batch as a single worksheet to an already created file
pub fn write_xlsx(file: File, batch: &RecordBatch) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let schema = batch.schema();

    for (idx, (field, column)) in schema.fields().iter().zip(batch.columns()).enumerate() {
        let col = u16::try_from(idx)
            .map_err(|_| PipelineError::Spreadsheet(format!("too many columns for a worksheet: {idx}")))?;
        worksheet
            .write_string(0, col, field.name().as_str())
            .map_err(|e| PipelineError::Spreadsheet(e.to_string()))?;

        let text = to_utf8(column)?;
        let values = text.as_string::<i32>();
        for row in 0..values.len() {
            if values.is_null(row) {
                continue;
            }
            let excel_row = u32::try_from(row + 1)
                .map_err(|_| PipelineError::Spreadsheet(format!("too many rows for a worksheet: {row}")))?;
            worksheet
                .write_string(excel_row, col, values.value(row))
                .map_err(|e| PipelineError::Spreadsheet(e.to_string()))?;
        }
    }

    workbook
        .save_to_writer(file)
        .map_err(|e| PipelineError::Spreadsheet(e.to_string()))?;
    Ok(())
}
