//! Scaling analysis for parallel benchmark trials.
//!
//! Loads raw per-trial timings, folds repetitions into per-configuration
//! statistics, joins the single-threaded sequential baseline onto every
//! configuration with the same problem size, derives speedup and efficiency,
//! and reports the result as CSV/JSON, a terminal table and PNG charts.
//!
//! Pipeline: [`trial::load_trials`] → [`aggregate::aggregate`] →
//! [`baseline::join`] → [`metrics::compute`] → [`summary`] / [`plot`].

pub mod aggregate;
pub mod baseline;
pub mod error;
pub mod metrics;
pub mod output;
pub mod plot;
pub mod summary;
pub mod trial;

pub use aggregate::{GroupKey, GroupSummary, SampleStats};
pub use baseline::{Baselines, DEFAULT_SEQUENTIAL_BINARY, JoinedRow};
pub use error::{PerfError, Result};
pub use metrics::{MetricRow, MetricsDiagnostics};
pub use plot::PlotOptions;
pub use trial::{TrialRecord, TrialTable};

/// Result of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// One row per (binary, n_threads, N), sorted by that key.
    pub rows: Vec<MetricRow>,
    /// Problem sizes with a sequential baseline.
    pub baseline_sizes: usize,
    /// Problem sizes without one, ascending.
    pub missing_baselines: Vec<u64>,
}

impl Analysis {
    /// Rows whose speedup could not be derived.
    pub fn diagnostics(&self) -> MetricsDiagnostics {
        MetricsDiagnostics::collect(&self.rows)
    }
}

/// Aggregate trials and derive metrics against `sequential_binary`.
pub fn analyze(table: &TrialTable, sequential_binary: &str) -> Analysis {
    let summaries = aggregate::aggregate(table);
    let baselines = Baselines::extract(&summaries, sequential_binary);
    let missing_baselines = baselines.missing_for(&summaries);
    Analysis {
        rows: metrics::compute(baseline::join(summaries, &baselines)),
        baseline_sizes: baselines.len(),
        missing_baselines,
    }
}
