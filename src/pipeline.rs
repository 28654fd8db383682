//! File-to-file pipeline stages
//!
//! Every stage reads a whole table, transforms it in memory and writes the
//! result atomically. All inputs are loaded before any transformation runs,
//! so a missing file fails the run before work is done.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use chrono::{DateTime, Local};
use log::info;
use serde::Serialize;

use crate::algorithm::{DedupReport, ExpandReport, FillReport, dedup_rows, expand_variants, fill_vtrac};
use crate::config::PipelineConfig;
use crate::error::util::ensure_parent_dir;
use crate::error::{PipelineError, Result};
use crate::utils::{read_table, write_table};

/// Pipeline stage selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Dedup,
    Expand,
    Fill,
    Run,
}

/// Summary of one pipeline invocation
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub stage: Stage,
    pub input: PathBuf,
    pub output: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,
    pub started_at: DateTime<Local>,
    pub elapsed_ms: u128,
    pub rows_in: usize,
    pub rows_out: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dedup: Option<DedupReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand: Option<ExpandReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillReport>,
}

impl RunReport {
    fn new(stage: Stage, input: &Path, output: &Path) -> Self {
        Self {
            stage,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            catalog: None,
            started_at: Local::now(),
            elapsed_ms: 0,
            rows_in: 0,
            rows_out: 0,
            dedup: None,
            expand: None,
            fill: None,
        }
    }

    /// Save the summary as pretty-printed JSON
    pub fn write(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let file = File::create(path).map_err(|e| PipelineError::write_failure(path, e))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .map_err(|e| PipelineError::write_failure(path, e))?;
        info!("Run summary written to {}", path.display());
        Ok(())
    }

    fn log_summary(&self) {
        info!(
            "{:?} finished: {} rows in, {} rows out, {} ms",
            self.stage, self.rows_in, self.rows_out, self.elapsed_ms
        );
    }
}

/// Remove duplicate rows from `input` and save them to `output`
pub fn run_dedup(input: &Path, output: &Path, config: &PipelineConfig) -> Result<RunReport> {
    run_stage(Stage::Dedup, input, None, output, config)
}

/// Add variant columns to `input` and save it to `output`
pub fn run_expand(input: &Path, output: &Path, config: &PipelineConfig) -> Result<RunReport> {
    run_stage(Stage::Expand, input, None, output, config)
}

/// Fill missing VTRAC values of `input`, optionally using an external catalog
pub fn run_fill(
    input: &Path,
    catalog: Option<&Path>,
    output: &Path,
    config: &PipelineConfig,
) -> Result<RunReport> {
    run_stage(Stage::Fill, input, catalog, output, config)
}

/// Dedup, expand and fill in one pass without intermediate files
pub fn run_all(
    input: &Path,
    catalog: Option<&Path>,
    output: &Path,
    config: &PipelineConfig,
) -> Result<RunReport> {
    run_stage(Stage::Run, input, catalog, output, config)
}

fn run_stage(
    stage: Stage,
    input: &Path,
    catalog: Option<&Path>,
    output: &Path,
    config: &PipelineConfig,
) -> Result<RunReport> {
    config.validate()?;
    let start = Instant::now();
    let mut report = RunReport::new(stage, input, output);
    report.catalog = catalog.map(Path::to_path_buf);

    let table = read_table(input, config.batch_size)?;
    let catalog_table = catalog
        .map(|path| read_table(path, config.batch_size))
        .transpose()?;
    report.rows_in = table.num_rows();

    let result = transform(stage, table, catalog_table.as_ref(), config, &mut report)?;
    report.rows_out = result.num_rows();

    write_table(output, &result)?;

    report.elapsed_ms = start.elapsed().as_millis();
    report.log_summary();
    Ok(report)
}

fn transform(
    stage: Stage,
    mut table: RecordBatch,
    catalog: Option<&RecordBatch>,
    config: &PipelineConfig,
    report: &mut RunReport,
) -> Result<RecordBatch> {
    if matches!(stage, Stage::Dedup | Stage::Run) {
        let (deduped, dedup) = dedup_rows(&table)?;
        report.dedup = Some(dedup);
        table = deduped;
    }
    if matches!(stage, Stage::Expand | Stage::Run) {
        let (expanded, expand) = expand_variants(&table, config)?;
        report.expand = Some(expand);
        table = expanded;
    }
    if matches!(stage, Stage::Fill | Stage::Run) {
        let (filled, fill) = fill_vtrac(&table, catalog, config)?;
        report.fill = Some(fill);
        table = filled;
    }

    Ok(table)
}
