//! Configuration for the catalog pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::error::util::safe_open_file;

/// Default batch size for reading table files
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Default minimum length of an extracted variant code
pub const DEFAULT_MIN_VARIANT_LEN: usize = 4;

/// Environment variable overriding the number of fill workers
pub const WORKERS_ENV: &str = "CATALOG_WORKERS";

/// Environment variable overriding the read batch size
pub const BATCH_SIZE_ENV: &str = "CATALOG_BATCH_SIZE";

/// Header names of the columns the pipeline reads and writes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    /// Primary article code
    pub article: String,
    /// Free-text product description
    pub nomenclature: String,
    /// VTRAC code
    pub vtrac: String,
    /// Prefix of the generated variant columns, numbered from 1
    pub variant_prefix: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            article: "Артикул".to_string(),
            nomenclature: "Номенклатура".to_string(),
            vtrac: "VTRAC".to_string(),
            variant_prefix: "Доп. Артикул".to_string(),
        }
    }
}

impl ColumnNames {
    /// Name of the variant column at 1-based position `n`
    #[must_use]
    pub fn variant_column(&self, n: usize) -> String {
        format!("{} {n}", self.variant_prefix)
    }

    /// Whether `name` is one of the generated variant columns
    #[must_use]
    pub fn is_variant_column(&self, name: &str) -> bool {
        name.strip_prefix(self.variant_prefix.as_str())
            .and_then(|rest| rest.strip_prefix(' '))
            .is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit()))
    }
}

/// Header names of an external VTRAC catalog table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogColumns {
    /// Catalog article code
    pub article: String,
    /// Analog article code
    pub analog: String,
    /// VTRAC code
    pub vtrac: String,
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            article: "Артикул".to_string(),
            analog: "Артикул аналога".to_string(),
            vtrac: "VTRAC".to_string(),
        }
    }
}

/// Configuration for a pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Column names of the catalog table
    pub columns: ColumnNames,
    /// Column names of the optional external VTRAC catalog
    pub catalog_columns: CatalogColumns,
    /// Number of fill workers; `None` uses every logical CPU
    pub workers: Option<usize>,
    /// Rows per record batch when reading files
    pub batch_size: usize,
    /// Shortest normalized code accepted as a variant
    pub min_variant_len: usize,
    /// Upper bound on generated variant columns
    pub max_variant_columns: Option<usize>,
    /// Shortest common prefix written as a VTRAC value
    pub min_prefix_len: usize,
    /// Also index the existing variant columns of rows that carry a VTRAC
    pub index_variant_columns: bool,
    /// Also match external catalog codes that start with a probed code
    pub catalog_prefix_match: bool,
    /// Compare codes case-insensitively
    pub fold_case: bool,
    /// Show progress bars
    pub show_progress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            catalog_columns: CatalogColumns::default(),
            workers: None,
            batch_size: DEFAULT_BATCH_SIZE,
            min_variant_len: DEFAULT_MIN_VARIANT_LEN,
            max_variant_columns: None,
            min_prefix_len: 0,
            index_variant_columns: false,
            catalog_prefix_match: false,
            fold_case: false,
            show_progress: false,
        }
    }
}

impl PipelineConfig {
    /// Load settings from a JSON file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = safe_open_file(path)?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| {
            PipelineError::Config(format!("invalid settings file {}: {e}", path.display()))
        })
    }

    /// Apply `CATALOG_WORKERS` and `CATALOG_BATCH_SIZE` when they are set
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(workers) = env_usize(WORKERS_ENV) {
            self.workers = Some(workers);
        }
        if let Some(batch_size) = env_usize(BATCH_SIZE_ENV) {
            self.batch_size = batch_size;
        }
        self
    }

    /// Number of worker threads for the fill step
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }

    /// Reject settings that cannot produce a meaningful run
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(PipelineError::Config("workers must be at least 1".to_string()));
        }
        if self.batch_size == 0 {
            return Err(PipelineError::Config("batch_size must be at least 1".to_string()));
        }
        if self.min_variant_len == 0 {
            return Err(PipelineError::Config(
                "min_variant_len must be at least 1".to_string(),
            ));
        }
        if self.columns.article.trim().is_empty() {
            return Err(PipelineError::Config("article column name is empty".to_string()));
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|s| s.trim().parse::<usize>().ok())
}
