//! Catalog cleaning and enrichment for flat product tables.
//!
//! Removes duplicate rows, expands article codes into numbered variant
//! columns and fills missing VTRAC codes from rows that already carry one.

pub mod algorithm;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod utils;

// Core types
pub use config::{CatalogColumns, ColumnNames, PipelineConfig};
pub use error::{PipelineError, Result};
pub use models::{NormalizedCode, Record, VariantSet};

// Stage operations
pub use algorithm::{
    DedupReport, ExpandReport, FillOutcome, FillReport, FillSettings, MatchResult, VariantColumns,
    VariantExtractor, VtracIndex, common_prefix, dedup_rows, expand_variants, extract_variants,
    fill_missing, fill_vtrac, normalize,
};
pub use pipeline::{RunReport, Stage, run_all, run_dedup, run_expand, run_fill};

// Arrow types
pub use arrow::record_batch::RecordBatch;

// Table files
pub use utils::{TableFormat, read_table, write_table};
