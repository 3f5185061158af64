//! Configuration resolution.
//!
//! Built-in defaults are overridden by an optional `scaling.toml`, which is in
//! turn overridden by command-line flags. Relative paths are resolved against
//! the working directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use scaling_perf::{DEFAULT_SEQUENTIAL_BINARY, PlotOptions};
use serde::Deserialize;

use crate::cli::Cli;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "scaling.toml";
/// Raw trial CSV read by default.
pub const DEFAULT_INPUT: &str = "results_raw.csv";
/// Summary CSV written by default.
pub const DEFAULT_OUTPUT: &str = "metrics_summary.csv";
/// Chart directory used by default.
pub const DEFAULT_PLOTS_DIR: &str = "plots";

/// On-disk configuration. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    json: Option<PathBuf>,
    baseline_binary: Option<String>,
    #[serde(default)]
    plots: PlotsSection,
}

/// `[plots]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlotsSection {
    dir: Option<PathBuf>,
    enabled: Option<bool>,
    width: Option<u32>,
    height: Option<u32>,
    font: Option<PathBuf>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Raw trial CSV.
    pub input: PathBuf,
    /// Summary CSV.
    pub output: PathBuf,
    /// Optional JSON summary.
    pub json: Option<PathBuf>,
    /// Sequential binary providing the baseline.
    pub baseline_binary: String,
    /// Chart settings.
    pub plots: PlotOptions,
    /// Whether charts are rendered.
    pub plots_enabled: bool,
    /// Whether the metric table is printed.
    pub table: bool,
}

impl Config {
    /// Resolve configuration from the CLI and the config file it points at.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => load_config_file(path)?,
            None => {
                let implicit = Path::new(DEFAULT_CONFIG_FILE);
                if implicit.is_file() {
                    load_config_file(implicit)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: ConfigFile) -> Result<Self> {
        let baseline_binary = cli
            .baseline_binary
            .clone()
            .or(file.baseline_binary)
            .unwrap_or_else(|| DEFAULT_SEQUENTIAL_BINARY.to_string());
        if baseline_binary.trim().is_empty() {
            bail!("baseline binary name must not be empty");
        }

        let mut plots = PlotOptions::new(
            cli.plots_dir
                .clone()
                .or(file.plots.dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PLOTS_DIR)),
        );
        if let Some(width) = file.plots.width {
            plots.width = width;
        }
        if let Some(height) = file.plots.height {
            plots.height = height;
        }
        if plots.width == 0 || plots.height == 0 {
            bail!(
                "plot size must be positive, got {}x{}",
                plots.width,
                plots.height
            );
        }
        plots.font = file.plots.font;

        Ok(Self {
            input: cli
                .input
                .clone()
                .or(file.input)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT)),
            output: cli
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            json: cli.json.clone().or(file.json),
            baseline_binary,
            plots,
            plots_enabled: !cli.no_plots && file.plots.enabled.unwrap_or(true),
            table: cli.table,
        })
    }

    /// Print the resolved configuration.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  input:           {}", self.input.display());
        println!("  output:          {}", self.output.display());
        if let Some(json) = &self.json {
            println!("  json:            {}", json.display());
        }
        println!("  baseline binary: {}", self.baseline_binary);
        if self.plots_enabled {
            println!(
                "  plots:           {} ({}x{})",
                self.plots.dir.display(),
                self.plots.width,
                self.plots.height
            );
        } else {
            println!("  plots:           disabled");
        }
    }
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    parse_config(&content).with_context(|| format!("parsing config file {}", path.display()))
}

fn parse_config(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}
