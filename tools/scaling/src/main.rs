//! Benchmark scaling post-processor.
//!
//! Turns raw per-trial timings into a per-configuration summary with speedup
//! and efficiency against the sequential baseline, and renders one speedup
//! and one efficiency chart per problem size.
//!
//! Pipeline: load trials → aggregate → join baseline → compute metrics →
//!           write summary → render charts.

mod cli;
mod config;
mod verbose;

use anyhow::{Context, Result};
use clap::Parser;
use scaling_perf::{MetricRow, output, plot, summary, trial};

use crate::config::Config;
use crate::verbose::{Timer, dprintln, vprintln, warnln};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    let config = Config::resolve(&cli)?;
    if verbose::is_verbose() {
        config.print();
    }

    let rows = analyze(&config)?;
    report(&config, &rows)
}

// ===========================================================================
// Analysis
// ===========================================================================

/// Load, aggregate, join and compute. Nothing is written before this succeeds.
fn analyze(config: &Config) -> Result<Vec<MetricRow>> {
    let table = {
        let _t = Timer::start("load");
        trial::load_trials(&config.input).map_err(|err| {
            let what = if err.is_input_error() {
                "invalid benchmark input"
            } else {
                "reading benchmark input"
            };
            anyhow::Error::new(err)
                .context(format!("{what} {}", config.input.display()))
        })?
    };
    vprintln!(
        "Loaded {} trials from {} ({} columns)",
        table.len(),
        config.input.display(),
        table.headers.len()
    );

    let analysis = {
        let _t = Timer::start("analyze");
        scaling_perf::analyze(&table, &config.baseline_binary)
    };
    vprintln!(
        "Aggregated into {} groups; `{}` baselines for {} problem size(s)",
        analysis.rows.len(),
        config.baseline_binary,
        analysis.baseline_sizes
    );

    if !analysis.missing_baselines.is_empty() {
        warnln!(
            "no single-thread `{}` run for N = {}; metrics left empty for those rows",
            config.baseline_binary,
            join_sizes(&analysis.missing_baselines)
        );
    }
    let diagnostics = analysis.diagnostics();
    if !diagnostics.is_clean() {
        vprintln!(
            "  {} of {} rows without speedup (N = {})",
            diagnostics.missing_rows,
            analysis.rows.len(),
            join_sizes(&diagnostics.affected_n)
        );
    }

    Ok(analysis.rows)
}

fn join_sizes(sizes: &[u64]) -> String {
    sizes
        .iter()
        .map(u64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ===========================================================================
// Reporting
// ===========================================================================

/// Write the summary files and charts. Files already written stay in place
/// if a later step fails.
fn report(config: &Config, rows: &[MetricRow]) -> Result<()> {
    {
        let _t = Timer::start("write summary");
        summary::write_summary_csv(rows, &config.output)
            .with_context(|| format!("writing summary to {}", config.output.display()))?;
    }
    dprintln!("Saved {}", config.output.display());

    if let Some(json) = &config.json {
        summary::write_summary_json(rows, json)
            .with_context(|| format!("writing JSON summary to {}", json.display()))?;
        vprintln!("Saved {}", json.display());
    }

    if config.table {
        output::print_metrics_table(rows);
    }

    if !config.plots_enabled {
        vprintln!("Chart rendering disabled");
        return Ok(());
    }

    match plot::chart_font(config.plots.font.as_deref()) {
        Some(font) => vprintln!("  chart font: {}", font.display()),
        None => vprintln!("  no usable font found; charts are drawn without text"),
    }

    let written = {
        let _t = Timer::start("render charts");
        plot::render_plots(rows, &config.plots)
            .with_context(|| format!("rendering charts into {}", config.plots.dir.display()))?
    };
    vprintln!("  {} chart(s) written", written.len());
    dprintln!("Plots saved in {}/", config.plots.dir.display());

    Ok(())
}
