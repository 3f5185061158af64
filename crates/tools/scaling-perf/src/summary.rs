//! Summary table persistence (CSV and JSON).

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::{PerfError, Result};
use crate::metrics::MetricRow;

/// Column order of the summary CSV.
pub const SUMMARY_COLUMNS: [&str; 11] = [
    "binary",
    "n_threads",
    "N",
    "mean_time_total",
    "std_time_total",
    "mean_time_update",
    "std_time_update",
    "reps",
    "Ts",
    "speedup",
    "efficiency",
];

/// One flattened output row. Field order defines the column order.
#[derive(Debug, Serialize)]
pub struct SummaryRecord<'a> {
    binary: &'a str,
    n_threads: u32,
    #[serde(rename = "N")]
    n: u64,
    mean_time_total: f64,
    std_time_total: Option<f64>,
    mean_time_update: f64,
    std_time_update: Option<f64>,
    reps: usize,
    #[serde(rename = "Ts")]
    ts: Option<f64>,
    speedup: Option<f64>,
    efficiency: Option<f64>,
}

impl<'a> From<&'a MetricRow> for SummaryRecord<'a> {
    fn from(row: &'a MetricRow) -> Self {
        let s = &row.summary;
        Self {
            binary: &s.binary,
            n_threads: s.n_threads,
            n: s.n,
            mean_time_total: s.time_total.mean,
            std_time_total: s.time_total.std,
            mean_time_update: s.time_update.mean,
            std_time_update: s.time_update.std,
            reps: s.reps,
            ts: row.ts,
            speedup: row.speedup,
            efficiency: row.efficiency,
        }
    }
}

/// Write the summary table as CSV, replacing any existing file.
///
/// Missing values are written as empty fields.
pub fn write_summary_csv(rows: &[MetricRow], path: &Path) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| PerfError::io(format!("creating {}", path.display()), e))?;
    write_summary_to(rows, file, &path.display().to_string())
}

/// Write the summary table as CSV into any writer.
pub fn write_summary_to<W: Write>(rows: &[MetricRow], writer: W, target: &str) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);

    // Written explicitly so an empty table still gets a header row.
    wtr.write_record(SUMMARY_COLUMNS)
        .map_err(|e| csv_write_error(target, e))?;
    for row in rows {
        wtr.serialize(SummaryRecord::from(row))
            .map_err(|e| csv_write_error(target, e))?;
    }
    wtr.flush()
        .map_err(|e| PerfError::io(format!("flushing {target}"), e))?;
    Ok(())
}

/// Write the summary table as a pretty-printed JSON array.
pub fn write_summary_json(rows: &[MetricRow], path: &Path) -> Result<()> {
    let records: Vec<SummaryRecord<'_>> = rows.iter().map(SummaryRecord::from).collect();
    let json = serde_json::to_string_pretty(&records).map_err(|e| PerfError::Serialization {
        message: e.to_string(),
    })?;
    std::fs::write(path, json)
        .map_err(|e| PerfError::io(format!("writing {}", path.display()), e))?;
    Ok(())
}

fn csv_write_error(target: &str, err: csv::Error) -> PerfError {
    let context = format!("writing {target}");
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io_err) => PerfError::io(context, io_err),
        _ => PerfError::Csv { context, message },
    }
}
