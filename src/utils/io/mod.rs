//! IO utilities for table files
//!
//! Tables are loaded wholesale into a single Arrow record batch with every
//! column coerced to text, and saved through a sibling `.partial` file that
//! is renamed over the target only once the write has succeeded.

pub mod csv;
pub mod parquet;
pub mod xlsx;

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::compute::concat_batches;
use arrow::record_batch::RecordBatch;

use crate::error::util::{ensure_input_file, ensure_parent_dir};
use crate::error::{PipelineError, Result};
use crate::utils::arrow::stringify_batch;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Supported table file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Comma separated values with a header row
    Csv,
    /// Apache Parquet
    Parquet,
    /// Excel workbook, first worksheet only
    Xlsx,
}

impl TableFormat {
    /// Detect the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("parquet" | "pq") => Ok(Self::Parquet),
            Some("xlsx" | "xlsm") => Ok(Self::Xlsx),
            _ => Err(PipelineError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Load a table file into one record batch with all columns as text
///
/// # Errors
/// `InputNotFound` when the file is missing, `UnsupportedFormat` for an
/// unknown extension, and format errors for unreadable content
pub fn read_table(path: &Path, batch_size: usize) -> Result<RecordBatch> {
    ensure_input_file(path)?;
    let format = TableFormat::from_path(path)?;

    let start = Instant::now();
    log_operation_start("Reading table", path);

    let (schema, batches) = match format {
        TableFormat::Csv => csv::read_csv(path, batch_size)?,
        TableFormat::Parquet => parquet::read_parquet(path, batch_size)?,
        TableFormat::Xlsx => xlsx::read_xlsx(path)?,
    };
    let batch = concat_batches(&schema, &batches)?;
    let batch = stringify_batch(&batch)?;

    log_operation_complete("Read", "from", path, batch.num_rows(), Some(start.elapsed()));
    Ok(batch)
}

/// Save a record batch, replacing `path` only if the whole write succeeds
///
/// # Errors
/// Any failure is reported as `WriteFailure`; no partial file is left behind
pub fn write_table(path: &Path, batch: &RecordBatch) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    ensure_parent_dir(path)?;

    let start = Instant::now();
    log_operation_start("Writing table", path);

    let partial = partial_path(path);
    let written = File::create(&partial)
        .map_err(PipelineError::from)
        .and_then(|file| match format {
            TableFormat::Csv => csv::write_csv(file, batch),
            TableFormat::Parquet => parquet::write_parquet(file, batch),
            TableFormat::Xlsx => xlsx::write_xlsx(file, batch),
        })
        .and_then(|()| fs::rename(&partial, path).map_err(PipelineError::from));

    if let Err(e) = written {
        if partial.exists() {
            let _ = fs::remove_file(&partial);
        }
        return Err(match e {
            PipelineError::WriteFailure { .. } => e,
            other => PipelineError::write_failure(path, other),
        });
    }

    log_operation_complete("Wrote", "to", path, batch.num_rows(), Some(start.elapsed()));
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}
