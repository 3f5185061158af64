//! Sequential baseline extraction and the left join on problem size.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::aggregate::GroupSummary;

/// Binary name of the sequential implementation in the benchmark driver.
pub const DEFAULT_SEQUENTIAL_BINARY: &str = "screensaver_seq";

/// Sequential reference time `Ts` per problem size.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Baselines {
    by_n: BTreeMap<u64, f64>,
}

impl Baselines {
    /// Collect the mean total time of `sequential_binary` at one thread for
    /// every N it was run with.
    pub fn extract(summaries: &[GroupSummary], sequential_binary: &str) -> Self {
        let by_n = summaries
            .iter()
            .filter(|s| s.binary == sequential_binary && s.n_threads == 1)
            .map(|s| (s.n, s.time_total.mean))
            .collect();
        Self { by_n }
    }

    /// Baseline time for a problem size, if one was recorded.
    pub fn get(&self, n: u64) -> Option<f64> {
        self.by_n.get(&n).copied()
    }

    /// Number of problem sizes with a baseline.
    pub fn len(&self) -> usize {
        self.by_n.len()
    }

    /// Returns `true` if no baseline was found at all.
    pub fn is_empty(&self) -> bool {
        self.by_n.is_empty()
    }

    /// Problem sizes present in `summaries` that have no baseline, ascending.
    pub fn missing_for(&self, summaries: &[GroupSummary]) -> Vec<u64> {
        summaries
            .iter()
            .map(|s| s.n)
            .filter(|n| !self.by_n.contains_key(n))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// An aggregated row with its sequential baseline attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    /// The aggregated row.
    pub summary: GroupSummary,
    /// Baseline time for the row's N, if any.
    pub ts: Option<f64>,
}

/// Left join `summaries` against `baselines` on N.
///
/// Every row is kept in its original order; rows whose N has no baseline get
/// `ts = None`.
pub fn join(summaries: Vec<GroupSummary>, baselines: &Baselines) -> Vec<JoinedRow> {
    summaries
        .into_iter()
        .map(|summary| {
            let ts = baselines.get(summary.n);
            JoinedRow { summary, ts }
        })
        .collect()
}
