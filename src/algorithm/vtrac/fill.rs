//! Parallel VTRAC filling
//!
//! Records without a VTRAC are probed against the read-only index using
//! their primary code, their extracted variants and any values already in
//! their variant columns. The work is split into contiguous partitions, one
//! per worker, and the partition results are concatenated in order so the
//! output lines up with the input rows.

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use smallvec::SmallVec;

use crate::algorithm::variants::VariantExtractor;
use crate::algorithm::vtrac::MatchResult;
use crate::algorithm::vtrac::index::VtracIndex;
use crate::config::{DEFAULT_MIN_VARIANT_LEN, PipelineConfig};
use crate::error::{PipelineError, Result};
use crate::models::{NormalizedCode, Record};
use crate::utils::arrow::{string_array, upsert_columns};
use crate::utils::logging::{create_main_progress_bar, finish_progress_bar};

/// Rows listed in the log when some records stay unmatched
const UNMATCHED_SAMPLE: usize = 5;

/// What happened to one record's VTRAC cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FillOutcome {
    /// The record already had a VTRAC
    AlreadyPresent,
    /// A VTRAC was derived from the matched codes
    Filled(String),
    /// Several codes matched but they share too short a prefix
    Ambiguous { candidates: usize },
    /// Nothing in the index matched
    Unmatched,
}

/// Settings for the fill step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillSettings {
    /// Worker threads
    pub workers: usize,
    /// Shortest variant code probed
    pub min_variant_len: usize,
    /// Shortest common prefix accepted as a VTRAC value
    pub min_prefix_len: usize,
    /// Draw a progress bar
    pub show_progress: bool,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            workers: num_cpus::get(),
            min_variant_len: DEFAULT_MIN_VARIANT_LEN,
            min_prefix_len: 0,
            show_progress: false,
        }
    }
}

impl FillSettings {
    #[must_use]
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            workers: config.worker_count(),
            min_variant_len: config.min_variant_len,
            min_prefix_len: config.min_prefix_len,
            show_progress: config.show_progress,
        }
    }
}

/// Counters for the fill stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FillReport {
    /// Rows processed
    pub rows: usize,
    /// Rows that already had a VTRAC
    pub already_present: usize,
    /// Rows that received a VTRAC
    pub filled: usize,
    /// Rows whose matches shared no usable prefix
    pub ambiguous: usize,
    /// Rows with no match at all
    pub unmatched: usize,
    /// Rows whose text could not be scanned for variants
    pub malformed: usize,
    /// Distinct article codes in the index
    pub index_keys: usize,
}

impl FillReport {
    /// Tally outcomes
    #[must_use]
    pub fn from_outcomes(outcomes: &[FillOutcome]) -> Self {
        let mut report = Self {
            rows: outcomes.len(),
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                FillOutcome::AlreadyPresent => report.already_present += 1,
                FillOutcome::Filled(_) => report.filled += 1,
                FillOutcome::Ambiguous { .. } => report.ambiguous += 1,
                FillOutcome::Unmatched => report.unmatched += 1,
            }
        }
        report
    }
}

/// Union of the VTRAC codes matched by the record's primary code and variants
#[must_use]
pub fn match_record(record: &Record, index: &VtracIndex, extractor: &VariantExtractor) -> MatchResult {
    let mut candidates: SmallVec<[NormalizedCode; 8]> = SmallVec::new();
    candidates.push(extractor.primary_code(record));
    candidates.extend(extractor.extract(record).iter().cloned());
    candidates.extend(record.known_variants.iter().map(|v| extractor.key(v)));

    let mut matched = MatchResult::new();
    for code in candidates.iter().filter(|c| !c.is_empty()).unique() {
        for vtracs in index.matching(code) {
            matched.extend_from(vtracs);
        }
    }
    matched
}

/// Decide the VTRAC outcome of one record
#[must_use]
pub fn resolve_record(
    record: &Record,
    index: &VtracIndex,
    extractor: &VariantExtractor,
    min_prefix_len: usize,
) -> FillOutcome {
    if !record.needs_vtrac() {
        return FillOutcome::AlreadyPresent;
    }

    let matched = match_record(record, index, extractor);
    match matched.common_prefix() {
        None => FillOutcome::Unmatched,
        // A single match is used as is; the minimum only bounds aggregated prefixes
        Some(prefix)
            if matched.len() > 1 && (prefix.is_empty() || prefix.chars().count() < min_prefix_len) =>
        {
            FillOutcome::Ambiguous {
                candidates: matched.len(),
            }
        }
        Some(prefix) => FillOutcome::Filled(prefix),
    }
}

/// Resolve every record on a dedicated worker pool, preserving row order
pub fn fill_missing(records: &[Record], index: &VtracIndex, settings: &FillSettings) -> Result<Vec<FillOutcome>> {
    let workers = settings.workers.max(1);
    let extractor = VariantExtractor::new(settings.min_variant_len, index.fold_case());

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("vtrac-worker-{i}"))
        .build()
        .map_err(|e| PipelineError::Config(format!("failed to start worker pool: {e}")))?;

    let chunk_size = records.len().div_ceil(workers).max(1);
    info!(
        "Filling VTRAC for {} rows with {workers} workers ({chunk_size} rows per partition)",
        records.len()
    );

    let pb = create_main_progress_bar(records.len() as u64, Some("Filling VTRAC"), settings.show_progress);

    let partitions: Vec<Vec<FillOutcome>> = pool.install(|| {
        records
            .par_chunks(chunk_size)
            .enumerate()
            .map(|(part, chunk)| {
                let start = part * chunk_size;
                debug!("Partition {part}: rows {start}..{}", start + chunk.len());

                let outcomes = chunk
                    .iter()
                    .map(|record| resolve_record(record, index, &extractor, settings.min_prefix_len))
                    .collect::<Vec<_>>();
                pb.inc(chunk.len() as u64);
                outcomes
            })
            .collect()
    });

    finish_progress_bar(&pb, Some("VTRAC fill complete"));
    Ok(partitions.into_iter().flatten().collect())
}

/// Fill the VTRAC column of `batch`, creating it when absent
///
/// The index is built from the rows that already carry a VTRAC, plus the
/// optional external `catalog`. Existing VTRAC cells are never changed.
pub fn fill_vtrac(
    batch: &RecordBatch,
    catalog: Option<&RecordBatch>,
    config: &PipelineConfig,
) -> Result<(RecordBatch, FillReport)> {
    let records = Record::from_batch(batch, &config.columns)?;

    let mut builder = VtracIndex::builder(config.fold_case).with_catalog_prefix_match(config.catalog_prefix_match);
    builder.add_records(&records, config.index_variant_columns);
    if let Some(catalog) = catalog {
        builder.add_catalog(catalog, &config.catalog_columns)?;
    }
    let index = builder.finish();

    let outcomes = fill_missing(&records, &index, &FillSettings::from_config(config))?;

    let mut report = FillReport::from_outcomes(&outcomes);
    report.index_keys = index.len();
    report.malformed = records
        .iter()
        .filter(|r| r.needs_vtrac() && r.malformed_field().is_some())
        .count();
    log_fill_summary(&records, &outcomes, &report);

    let values = records
        .iter()
        .zip(&outcomes)
        .map(|(record, outcome)| match outcome {
            FillOutcome::Filled(vtrac) => Some(vtrac.clone()),
            _ => record.vtrac.clone(),
        })
        .collect();

    let filled = upsert_columns(batch, vec![(config.columns.vtrac.clone(), string_array(values))])?;
    Ok((filled, report))
}

fn log_fill_summary(records: &[Record], outcomes: &[FillOutcome], report: &FillReport) {
    info!(
        "VTRAC fill: {} filled, {} already present, {} ambiguous, {} unmatched, {} malformed",
        report.filled, report.already_present, report.ambiguous, report.unmatched, report.malformed
    );

    let unmatched = records
        .iter()
        .zip(outcomes)
        .enumerate()
        .filter(|(_, (_, outcome))| **outcome == FillOutcome::Unmatched)
        .take(UNMATCHED_SAMPLE)
        .map(|(row, (record, _))| format!("row {row}: {}", record.article.as_deref().unwrap_or("<empty>")))
        .join(", ");
    if !unmatched.is_empty() {
        info!("Sample of unmatched rows: {unmatched}");
    }
}
