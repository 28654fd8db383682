use std::path::{Path, PathBuf};

use anyhow::Context;
use catalog_enrich::{PipelineConfig, RunReport, run_all, run_dedup, run_expand, run_fill};
use clap::{Args, Parser, Subcommand};
use log::{debug, error};

#[derive(Parser)]
#[command(name = "catalog-enrich")]
#[command(about = "Deduplicate product catalogs, expand article variants and fill VTRAC codes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Args)]
struct GlobalOptions {
    /// JSON settings file; missing keys keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worker threads for the VTRAC fill (default: all logical CPUs)
    #[arg(long, global = true)]
    workers: Option<usize>,

    /// Write a JSON run summary to this file
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Upper bound on generated variant columns
    #[arg(long, global = true)]
    max_variant_columns: Option<usize>,

    /// Shortest common prefix accepted as a VTRAC value
    #[arg(long, global = true)]
    min_prefix_len: Option<usize>,

    /// Compare article codes case-insensitively
    #[arg(long, global = true)]
    fold_case: bool,

    /// Also match catalog codes that start with a probed code
    #[arg(long, global = true)]
    catalog_prefix_match: bool,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hide progress bars
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove exact duplicate rows, keeping the first occurrence
    Dedup {
        input: PathBuf,
        output: PathBuf,
    },
    /// Add "Доп. Артикул N" variant columns
    Expand {
        input: PathBuf,
        output: PathBuf,
    },
    /// Fill missing VTRAC values
    Fill {
        input: PathBuf,
        output: PathBuf,
        /// External catalog with article, analog and VTRAC columns
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Dedup, expand and fill in one pass
    Run {
        input: PathBuf,
        output: PathBuf,
        /// External catalog with article, analog and VTRAC columns
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.options.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    if let Err(e) = run(cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = build_config(&cli.options)?;
    debug!("Effective settings: {config:?}");

    let report = match &cli.command {
        Commands::Dedup { input, output } => run_dedup(input, output, &config),
        Commands::Expand { input, output } => run_expand(input, output, &config),
        Commands::Fill {
            input,
            output,
            catalog,
        } => run_fill(input, catalog.as_deref(), output, &config),
        Commands::Run {
            input,
            output,
            catalog,
        } => run_all(input, catalog.as_deref(), output, &config),
    }?;

    if let Some(path) = &cli.options.report {
        write_report(&report, path)?;
    }
    Ok(())
}

fn build_config(options: &GlobalOptions) -> anyhow::Result<PipelineConfig> {
    let mut config = match &options.config {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => PipelineConfig::default(),
    }
    .with_env_overrides();

    if let Some(workers) = options.workers {
        config.workers = Some(workers);
    }
    if let Some(cap) = options.max_variant_columns {
        config.max_variant_columns = Some(cap);
    }
    if let Some(min_prefix_len) = options.min_prefix_len {
        config.min_prefix_len = min_prefix_len;
    }
    if options.fold_case {
        config.fold_case = true;
    }
    if options.catalog_prefix_match {
        config.catalog_prefix_match = true;
    }
    config.show_progress = !options.quiet;

    config.validate()?;
    Ok(config)
}

fn write_report(report: &RunReport, path: &Path) -> anyhow::Result<()> {
    report
        .write(path)
        .with_context(|| format!("saving run summary to {}", path.display()))
}
