//! Command-line interface components.

use crate::config::{
    AssemblyConfig, CompressionAlgorithm, MissingCoordinatePolicy, OutputConfig, OutputFormat,
};
use crate::models::AssemblyStats;
use crate::processor::ModelProcessor;
use crate::registry::CategoryRegistry;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "swmm-sections")]
#[command(about = "Assemble SWMM model sections into one table per element category")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the SWMM network file (.inp)
    #[arg(value_name = "INP")]
    pub inp_path: PathBuf,

    /// Path to the simulation report file (.rpt)
    #[arg(long = "rpt", value_name = "RPT")]
    pub rpt_path: Option<PathBuf>,

    /// Element category to assemble; repeat for several
    #[arg(short = 'c', long = "category", value_name = "CATEGORY")]
    pub categories: Vec<String>,

    /// Assemble every registered category
    #[arg(long, conflicts_with = "categories")]
    pub all: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: FormatArg,

    /// Directory for csv and parquet outputs
    #[arg(short, long = "output-dir", value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Parquet compression algorithm
    #[arg(long, value_enum, default_value = "snappy")]
    pub compression: CompressionArg,

    /// Drop links whose endpoints have no coordinates instead of failing
    #[arg(long)]
    pub drop_missing_geometry: bool,

    /// Keep report rows that have no matching network element
    #[arg(long)]
    pub keep_orphan_results: bool,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Print tables to stdout
    Table,
    Csv,
    Parquet,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Parquet => OutputFormat::Parquet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompressionArg {
    Snappy,
    Zstd,
    Lz4,
    None,
}

impl From<CompressionArg> for CompressionAlgorithm {
    fn from(arg: CompressionArg) -> Self {
        match arg {
            CompressionArg::Snappy => CompressionAlgorithm::Snappy,
            CompressionArg::Zstd => CompressionAlgorithm::Zstd,
            CompressionArg::Lz4 => CompressionAlgorithm::Lz4,
            CompressionArg::None => CompressionAlgorithm::Uncompressed,
        }
    }
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Requested categories; all registered ones when none are named
    pub fn selected_categories(&self, registry: &CategoryRegistry) -> Vec<String> {
        if self.all || self.categories.is_empty() {
            registry
                .categories()
                .into_iter()
                .map(str::to_string)
                .collect()
        } else {
            self.categories.iter().map(|c| c.to_lowercase()).collect()
        }
    }

    pub fn assembly_config(&self) -> AssemblyConfig {
        let mut config = AssemblyConfig::default();
        if self.drop_missing_geometry {
            config = config.with_missing_coordinates(MissingCoordinatePolicy::DropRow);
        }
        if self.keep_orphan_results {
            config = config.with_orphan_results();
        }
        config
    }

    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::default()
            .with_format(self.format.into())
            .with_compression(self.compression.into())
            .with_output_dir(self.output_dir.clone())
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("swmm_sections={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Run the assembly described by `args`
pub async fn run(args: Args) -> Result<AssemblyStats> {
    let processor = ModelProcessor::new(args.inp_path.clone(), args.rpt_path.clone())
        .with_context(|| format!("Failed to open model {}", args.inp_path.display()))?
        .with_assembly_config(args.assembly_config())
        .with_output_config(args.output_config());

    let categories = args.selected_categories(processor.registry());
    info!("Assembling {} categories", categories.len());

    let stats = processor
        .process(&categories)
        .await
        .context("Section assembly failed")?;
    Ok(stats)
}
