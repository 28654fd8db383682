use std::fs;
use std::path::{Path, PathBuf};

use arrow::array::{Array, StringArray};
use catalog_enrich::{PipelineConfig, RecordBatch, read_table};
use tempfile::TempDir;

/// Scratch directory removed when dropped
#[must_use]
pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create scratch directory")
}

/// Write `content` to `name` inside `dir`
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Settings used by the tests: two workers, no progress bars
#[must_use]
pub fn test_config() -> PipelineConfig {
    PipelineConfig {
        workers: Some(2),
        show_progress: false,
        ..PipelineConfig::default()
    }
}

/// Load a table written by the pipeline
#[must_use]
pub fn load(path: &Path) -> RecordBatch {
    read_table(path, 1024).expect("Failed to read output table")
}

/// Header names of a table
#[must_use]
pub fn headers(batch: &RecordBatch) -> Vec<String> {
    batch.schema().fields().iter().map(|f| f.name().clone()).collect()
}

/// Cells of a text column, `None` for empty cells
#[must_use]
pub fn column(batch: &RecordBatch, name: &str) -> Vec<Option<String>> {
    let idx = batch
        .schema()
        .index_of(name)
        .unwrap_or_else(|_| panic!("column '{name}' missing"));
    let array = batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .expect("text column");
    (0..array.len())
        .map(|i| (!array.is_null(i)).then(|| array.value(i).to_string()))
        .collect()
}

/// Shorthand for an expected column
#[must_use]
pub fn cells(values: &[Option<&str>]) -> Vec<Option<String>> {
    values.iter().map(|v| v.map(str::to_string)).collect()
}
