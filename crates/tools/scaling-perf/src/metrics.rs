//! Speedup and efficiency.
//!
//! Missing operands propagate: a metric is `None` whenever the baseline is
//! absent or the parallel time is zero.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::aggregate::GroupSummary;
use crate::baseline::JoinedRow;

/// A fully computed summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRow {
    /// The aggregated row.
    pub summary: GroupSummary,
    /// Sequential baseline for the row's N.
    pub ts: Option<f64>,
    /// `Ts / mean_time_total`.
    pub speedup: Option<f64>,
    /// `speedup / n_threads`.
    pub efficiency: Option<f64>,
}

/// Divide two optional values. `None` if either side is missing or the
/// divisor is zero.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    let (num, den) = (numerator?, denominator?);
    if den == 0.0 {
        return None;
    }
    let value = num / den;
    value.is_finite().then_some(value)
}

/// Derive speedup and efficiency for every joined row.
pub fn compute(rows: Vec<JoinedRow>) -> Vec<MetricRow> {
    rows.into_iter()
        .map(|JoinedRow { summary, ts }| {
            let speedup = ratio(ts, Some(summary.time_total.mean));
            let efficiency = ratio(speedup, Some(f64::from(summary.n_threads)));
            MetricRow {
                summary,
                ts,
                speedup,
                efficiency,
            }
        })
        .collect()
}

/// Rows that ended up without metrics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsDiagnostics {
    /// Number of rows with no speedup.
    pub missing_rows: usize,
    /// Problem sizes affected, ascending.
    pub affected_n: Vec<u64>,
}

impl MetricsDiagnostics {
    /// Count rows with a missing speedup.
    pub fn collect(rows: &[MetricRow]) -> Self {
        let missing: Vec<&MetricRow> = rows.iter().filter(|r| r.speedup.is_none()).collect();
        let affected_n: BTreeSet<u64> = missing.iter().map(|r| r.summary.n).collect();
        Self {
            missing_rows: missing.len(),
            affected_n: affected_n.into_iter().collect(),
        }
    }

    /// Returns `true` if every row has metrics.
    pub fn is_clean(&self) -> bool {
        self.missing_rows == 0
    }
}
