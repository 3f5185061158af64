//! Raw trial loading.
//!
//! Reads the CSV emitted by the benchmark driver: one row per executed trial
//! with the binary name, thread count, problem size and two wall-clock
//! timings. Columns beyond the five required ones are kept on each record
//! verbatim.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::Serialize;

use crate::error::{PerfError, Result};

/// Column holding the benchmarked binary name.
pub const COL_BINARY: &str = "binary";
/// Column holding the worker thread count.
pub const COL_THREADS: &str = "n_threads";
/// Column holding the problem size.
pub const COL_N: &str = "N";
/// Column holding the total run time.
pub const COL_TIME_TOTAL: &str = "time_total";
/// Column holding the time spent in the update phase.
pub const COL_TIME_UPDATE: &str = "time_update";

const REQUIRED_COLUMNS: [&str; 5] = [
    COL_BINARY,
    COL_THREADS,
    COL_N,
    COL_TIME_TOTAL,
    COL_TIME_UPDATE,
];

/// A single executed trial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrialRecord {
    /// Benchmarked binary.
    pub binary: String,
    /// Thread count, always at least 1.
    pub n_threads: u32,
    /// Problem size, always at least 1.
    pub n: u64,
    /// Total run time.
    pub time_total: f64,
    /// Update-phase time.
    pub time_update: f64,
    /// Any further columns, by header name.
    pub extras: BTreeMap<String, String>,
}

/// All trials read from one source.
#[derive(Debug, Clone, Default)]
pub struct TrialTable {
    /// Header row as read, including extra columns.
    pub headers: Vec<String>,
    /// Trials in file order.
    pub records: Vec<TrialRecord>,
}

impl TrialTable {
    /// Number of trials.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no trials were read.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Column positions of the required fields within a header row.
struct ColumnMap {
    binary: usize,
    n_threads: usize,
    n: usize,
    time_total: usize,
    time_update: usize,
    extras: Vec<(usize, String)>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord, source: &str) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| {
                    PerfError::malformed(source, None, format!("missing required column `{name}`"))
                })
        };

        let extras = headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !REQUIRED_COLUMNS.contains(h))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        Ok(Self {
            binary: find(COL_BINARY)?,
            n_threads: find(COL_THREADS)?,
            n: find(COL_N)?,
            time_total: find(COL_TIME_TOTAL)?,
            time_update: find(COL_TIME_UPDATE)?,
            extras,
        })
    }
}

/// Load trials from a CSV file.
///
/// Fails with [`PerfError::InputNotFound`] if the file does not exist and
/// with [`PerfError::InputMalformed`] if a required column is absent or a
/// value cannot be coerced.
pub fn load_trials(path: &Path) -> Result<TrialTable> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => PerfError::InputNotFound {
            path: path.to_path_buf(),
        },
        _ => PerfError::io(format!("opening {}", path.display()), e),
    })?;
    read_trials(file, &path.display().to_string())
}

/// Read trials from any CSV source. `source` names the input in errors.
pub fn read_trials<R: Read>(reader: R, source: &str) -> Result<TrialTable> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| csv_read_error(source, &e))?
        .clone();
    let columns = ColumnMap::from_headers(&headers, source)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|e| csv_read_error(source, &e))?;
        records.push(parse_row(&row, &columns, source)?);
    }

    Ok(TrialTable {
        headers: headers.iter().map(str::to_string).collect(),
        records,
    })
}

fn parse_row(row: &StringRecord, columns: &ColumnMap, source: &str) -> Result<TrialRecord> {
    let line = row.position().map(csv::Position::line);
    let field = |idx: usize| row.get(idx).unwrap_or("");

    let binary = field(columns.binary);
    if binary.is_empty() {
        return Err(PerfError::malformed(source, line, format!("column `{COL_BINARY}` is empty")));
    }

    let n_threads: u32 = parse_number(field(columns.n_threads), COL_THREADS, source, line)?;
    if n_threads == 0 {
        return Err(PerfError::malformed(
            source,
            line,
            format!("column `{COL_THREADS}` must be at least 1"),
        ));
    }

    let n: u64 = parse_number(field(columns.n), COL_N, source, line)?;
    if n == 0 {
        return Err(PerfError::malformed(
            source,
            line,
            format!("column `{COL_N}` must be at least 1"),
        ));
    }

    let time_total = parse_time(field(columns.time_total), COL_TIME_TOTAL, source, line)?;
    let time_update = parse_time(field(columns.time_update), COL_TIME_UPDATE, source, line)?;

    let extras = columns
        .extras
        .iter()
        .map(|(idx, name)| (name.clone(), field(*idx).to_string()))
        .collect();

    Ok(TrialRecord {
        binary: binary.to_string(),
        n_threads,
        n,
        time_total,
        time_update,
        extras,
    })
}

fn parse_number<T>(raw: &str, column: &str, source: &str, line: Option<u64>) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| {
        PerfError::malformed(source, line, format!("column `{column}`: cannot parse {raw:?}: {e}"))
    })
}

fn parse_time(raw: &str, column: &str, source: &str, line: Option<u64>) -> Result<f64> {
    let value: f64 = parse_number(raw, column, source, line)?;
    if !value.is_finite() || value < 0.0 {
        return Err(PerfError::malformed(
            source,
            line,
            format!("column `{column}`: expected a non-negative time, got {raw:?}"),
        ));
    }
    Ok(value)
}

fn csv_read_error(source: &str, err: &csv::Error) -> PerfError {
    if let csv::ErrorKind::Io(io_err) = err.kind() {
        return PerfError::io(
            format!("reading {source}"),
            io::Error::new(io_err.kind(), io_err.to_string()),
        );
    }
    let line = err.position().map(csv::Position::line);
    PerfError::malformed(source, line, err.to_string())
}
