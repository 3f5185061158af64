//! Command-line interface definitions for scaling.

use std::path::PathBuf;

use clap::Parser;

/// Aggregate benchmark trials into speedup/efficiency summaries and charts.
///
/// With no arguments, reads `results_raw.csv`, writes `metrics_summary.csv`
/// and renders charts into `plots/`.
#[derive(Parser, Debug, Default)]
#[command(name = "scaling", version, about)]
pub struct Cli {
    /// Configuration file (default: `scaling.toml` if present).
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Raw trial CSV to read.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Summary CSV to write.
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Directory for chart images.
    #[arg(long)]
    pub plots_dir: Option<PathBuf>,

    /// Name of the sequential binary whose single-thread runs are the baseline.
    #[arg(long)]
    pub baseline_binary: Option<String>,

    /// Also write the summary as JSON to this path.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Print the metric table to stdout.
    #[arg(long)]
    pub table: bool,

    /// Skip chart rendering.
    #[arg(long)]
    pub no_plots: bool,

    /// Suppress progress output; show only errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output with timings and per-step diagnostics.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
