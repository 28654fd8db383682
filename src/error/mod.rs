//! Error handling for the catalog pipeline.
//!
//! File-level problems abort a run and surface as [`PipelineError`].
//! Per-record problems (malformed text, no VTRAC match) are never errors;
//! they are counted in the stage reports instead.

pub mod util;

use std::io;
use std::path::PathBuf;

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

/// Errors that abort a pipeline run
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The expected input file does not exist
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// A required column is missing from the loaded table
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    /// The output file could not be saved
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The file extension is not one of the supported table formats
    #[error("Unsupported table format: {} (expected .csv, .parquet or .xlsx)", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// An Excel workbook could not be read or written
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Invalid settings
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),
}

impl PipelineError {
    /// Create a `MalformedSchema` error for a missing column
    pub fn missing_column(name: &str) -> Self {
        Self::MalformedSchema(format!("required column '{name}' not found"))
    }

    /// Wrap any error raised while saving `path`
    pub fn write_failure<E>(path: impl Into<PathBuf>, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::WriteFailure {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Whether this error was raised before any transform could run
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InputNotFound { .. } | Self::MalformedSchema(_) | Self::UnsupportedFormat { .. }
        )
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
