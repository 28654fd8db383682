//! CSV file operations
//!
//! CSV tables are read with a header row and every column typed as nullable
//! text; empty cells come back as nulls. Bytes that are not valid UTF-8 are
//! replaced with U+FFFD so a single badly encoded row cannot fail the load.

use std::borrow::Cow;
use std::fs::File;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use arrow::csv::reader::Format;
use arrow::csv::{ReaderBuilder, WriterBuilder};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::error::{PipelineError, Result};
use crate::error::util::safe_open_file;
use crate::utils::logging::log_warning;

/// Read the header row and build an all-text schema from it
fn header_schema(text: &str) -> Result<SchemaRef> {
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(Cursor::new(text.as_bytes()), Some(0))?;

    let fields = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name().trim_start_matches('\u{feff}'), DataType::Utf8, true))
        .collect::<Vec<_>>();
    if fields.is_empty() {
        return Err(PipelineError::MalformedSchema("CSV file has no header row".to_string()));
    }

    Ok(Arc::new(Schema::new(fields)))
}

/// Read a CSV file into Arrow record batches
pub fn read_csv(path: &Path, batch_size: usize) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let mut bytes = Vec::new();
    safe_open_file(path)?.read_to_end(&mut bytes)?;

    let text = String::from_utf8_lossy(&bytes);
    if let Cow::Owned(ref decoded) = text {
        let replaced = decoded.matches('\u{FFFD}').count();
        log_warning(
            &format!("Replaced {replaced} invalid UTF-8 sequences while reading"),
            Some(path),
        );
    }

    let schema = header_schema(&text)?;
    let reader = ReaderBuilder::new(Arc::clone(&schema))
        .with_header(true)
        .with_truncated_rows(true)
        .with_batch_size(batch_size)
        .build(Cursor::new(text.as_bytes()))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

/// Write a record batch as CSV with a header row to an already created file
pub fn write_csv(file: File, batch: &RecordBatch) -> Result<()> {
    let mut writer = WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;
    Ok(())
}
