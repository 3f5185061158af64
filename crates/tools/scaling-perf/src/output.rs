//! Terminal output formatting for metric rows.

use crate::metrics::MetricRow;

/// Placeholder for a missing value.
const MISSING: &str = "-";

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| format!("{v:.precision$}"))
}

/// Right-aligned numeric columns after `Binary`, with their widths.
const COLUMNS: [(&str, usize); 10] = [
    ("Threads", 7),
    ("N", 10),
    ("Mean total", 12),
    ("Std total", 10),
    ("Min total", 12),
    ("Max total", 12),
    ("Reps", 5),
    ("Ts", 12),
    ("Speedup", 8),
    ("Efficiency", 10),
];

fn push_line(out: &mut String, first: &str, width: usize, cells: &[String]) {
    out.push_str(&format!("  {first:<width$}"));
    for (cell, (_, w)) in cells.iter().zip(COLUMNS) {
        out.push_str(&format!("  {cell:>w$}"));
    }
    out.push('\n');
}

/// Render metric rows as an aligned table.
pub fn format_metrics_table(rows: &[MetricRow]) -> String {
    let mut out = String::new();

    if rows.is_empty() {
        out.push_str("  No benchmark groups to display.\n");
        return out;
    }

    let width = rows
        .iter()
        .map(|r| r.summary.binary.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let header: Vec<String> = COLUMNS
        .iter()
        .map(|(name, _)| (*name).to_string())
        .collect();
    push_line(&mut out, "Binary", width, &header);
    let rule: Vec<String> = COLUMNS.iter().map(|(_, w)| "-".repeat(*w)).collect();
    push_line(&mut out, &"-".repeat(width), width, &rule);

    for row in rows {
        let s = &row.summary;
        let cells = [
            s.n_threads.to_string(),
            s.n.to_string(),
            format!("{:.6}", s.time_total.mean),
            fmt_opt(s.time_total.std, 6),
            format!("{:.6}", s.time_total.min),
            format!("{:.6}", s.time_total.max),
            s.reps.to_string(),
            fmt_opt(row.ts, 6),
            fmt_opt(row.speedup, 3),
            fmt_opt(row.efficiency, 3),
        ];
        push_line(&mut out, &s.binary, width, &cells);
    }

    out
}

/// Print metric rows as a formatted table.
pub fn print_metrics_table(rows: &[MetricRow]) {
    println!();
    print!("{}", format_metrics_table(rows));
    println!();
}
