//! Folding repeated trials into per-configuration statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::trial::TrialTable;

/// Summary statistics over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStats {
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (N-1 denominator); `None` for a single sample.
    pub std: Option<f64>,
    /// Minimum sample.
    pub min: f64,
    /// Maximum sample.
    pub max: f64,
    /// Number of samples.
    pub count: usize,
}

impl SampleStats {
    /// Compute statistics for a slice of samples. Returns `None` if empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let n = samples.len();
        if n == 0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let count = n as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let std = if n > 1 {
            let var = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (count - 1.0);
            Some(var.sqrt())
        } else {
            None
        };
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std,
            min,
            max,
            count: n,
        })
    }
}

/// Composite grouping key. Orders by binary, then thread count, then N.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupKey {
    /// Benchmarked binary.
    pub binary: String,
    /// Thread count.
    pub n_threads: u32,
    /// Problem size.
    pub n: u64,
}

/// One aggregated row per distinct (binary, n_threads, N).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Benchmarked binary.
    pub binary: String,
    /// Thread count.
    pub n_threads: u32,
    /// Problem size.
    pub n: u64,
    /// Statistics of `time_total`.
    pub time_total: SampleStats,
    /// Statistics of `time_update`.
    pub time_update: SampleStats,
    /// Number of trials folded into this row.
    pub reps: usize,
}

#[derive(Default)]
struct Samples {
    total: Vec<f64>,
    update: Vec<f64>,
}

/// Group trials by (binary, n_threads, N) and summarize each group.
///
/// Every distinct key yields exactly one row; rows come back sorted by key.
pub fn aggregate(table: &TrialTable) -> Vec<GroupSummary> {
    let mut groups: BTreeMap<GroupKey, Samples> = BTreeMap::new();

    for record in &table.records {
        let key = GroupKey {
            binary: record.binary.clone(),
            n_threads: record.n_threads,
            n: record.n,
        };
        let samples = groups.entry(key).or_default();
        samples.total.push(record.time_total);
        samples.update.push(record.time_update);
    }

    groups
        .into_iter()
        .filter_map(|(key, samples)| {
            let time_total = SampleStats::from_samples(&samples.total)?;
            let time_update = SampleStats::from_samples(&samples.update)?;
            Some(GroupSummary {
                binary: key.binary,
                n_threads: key.n_threads,
                n: key.n,
                reps: time_total.count,
                time_total,
                time_update,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trial::TrialRecord;

    fn trial(binary: &str, n_threads: u32, n: u64, total: f64, update: f64) -> TrialRecord {
        TrialRecord {
            binary: binary.into(),
            n_threads,
            n,
            time_total: total,
            time_update: update,
            extras: BTreeMap::new(),
        }
    }

    fn table(records: Vec<TrialRecord>) -> TrialTable {
        TrialTable {
            headers: Vec::new(),
            records,
        }
    }

    #[test]
    fn stats_of_empty_slice_is_none() {
        assert!(SampleStats::from_samples(&[]).is_none());
    }

    #[test]
    fn single_sample_has_undefined_std() {
        let stats = SampleStats::from_samples(&[3.5]).unwrap();
        assert_eq!(stats.count, 1);
        assert!((stats.mean - 3.5).abs() < 1e-12);
        assert_eq!(stats.std, None);
    }

    #[test]
    fn identical_samples_have_zero_std() {
        let stats = SampleStats::from_samples(&[10.0, 10.0, 10.0]).unwrap();
        assert_eq!(stats.std, Some(0.0));
        assert!((stats.mean - 10.0).abs() < 1e-12);
    }

    #[test]
    fn std_uses_sample_denominator() {
        // Mean 5, squared deviations sum to 32, divided by n-1 = 7.
        let stats = SampleStats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!((stats.mean - 5.0).abs() < 1e-12);
        assert!((stats.std.unwrap() - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert!((stats.min - 2.0).abs() < 1e-12);
        assert!((stats.max - 9.0).abs() < 1e-12);
    }

    #[test]
    fn each_distinct_key_appears_once() {
        let rows = aggregate(&table(vec![
            trial("par", 4, 100, 4.0, 1.0),
            trial("seq", 1, 100, 10.0, 2.0),
            trial("par", 4, 100, 5.0, 1.0),
            trial("par", 2, 100, 6.0, 1.0),
            trial("par", 4, 200, 8.0, 1.0),
            trial("seq", 1, 100, 11.0, 2.0),
        ]));

        let keys: Vec<_> = rows
            .iter()
            .map(|r| (r.binary.clone(), r.n_threads, r.n))
            .collect();
        assert_eq!(keys.len(), 4);
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(keys, sorted);
        assert_eq!(rows.iter().map(|r| r.reps).sum::<usize>(), 6);
    }

    #[test]
    fn rows_sorted_by_binary_threads_then_n() {
        let rows = aggregate(&table(vec![
            trial("seq", 1, 200, 1.0, 0.0),
            trial("par", 8, 100, 1.0, 0.0),
            trial("par", 2, 200, 1.0, 0.0),
            trial("par", 2, 100, 1.0, 0.0),
        ]));
        let order: Vec<_> = rows
            .iter()
            .map(|r| (r.binary.as_str(), r.n_threads, r.n))
            .collect();
        assert_eq!(
            order,
            vec![("par", 2, 100), ("par", 2, 200), ("par", 8, 100), ("seq", 1, 200)]
        );
    }

    #[test]
    fn mean_matches_raw_subset() {
        let rows = aggregate(&table(vec![
            trial("par", 4, 100, 4.0, 1.0),
            trial("par", 4, 100, 5.0, 2.0),
            trial("par", 4, 100, 9.0, 6.0),
        ]));
        assert_eq!(rows.len(), 1);
        assert!((rows[0].time_total.mean - 6.0).abs() < 1e-12);
        assert!((rows[0].time_update.mean - 3.0).abs() < 1e-12);
        assert_eq!(rows[0].reps, 3);
    }

    #[test]
    fn scenario_seq_and_par() {
        let rows = aggregate(&table(vec![
            trial("seq", 1, 100, 10.0, 1.0),
            trial("seq", 1, 100, 10.0, 1.0),
            trial("seq", 1, 100, 10.0, 1.0),
            trial("par", 4, 100, 4.0, 0.5),
            trial("par", 4, 100, 4.0, 0.5),
            trial("par", 4, 100, 4.0, 0.5),
        ]));

        let seq = rows.iter().find(|r| r.binary == "seq").unwrap();
        assert!((seq.time_total.mean - 10.0).abs() < 1e-12);
        assert_eq!(seq.time_total.std, Some(0.0));
        assert_eq!(seq.reps, 3);

        let par = rows.iter().find(|r| r.binary == "par").unwrap();
        assert!((par.time_total.mean - 4.0).abs() < 1e-12);
        assert_eq!(par.reps, 3);
    }

    #[test]
    fn empty_table_aggregates_to_nothing() {
        assert!(aggregate(&TrialTable::default()).is_empty());
    }
}
