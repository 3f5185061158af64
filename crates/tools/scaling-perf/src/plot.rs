//! Per-problem-size speedup and efficiency charts.
//!
//! For every distinct N two PNG images are produced: speedup against thread
//! count (with error bars from the standard deviation of the total time) and
//! efficiency against thread count. Rows whose metric is missing leave a gap
//! but never suppress the image.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use plotters::prelude::*;
use plotters::style::FontStyle;

use crate::error::{PerfError, Result};
use crate::metrics::MetricRow;

/// Font family name charts are drawn with.
const FONT_FAMILY: &str = "sans-serif";

/// Locations probed for a TrueType font when none is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Chart rendering options.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Directory images are written to. Created if missing.
    pub dir: PathBuf,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// TrueType font for titles and labels. System fonts are probed if unset.
    pub font: Option<PathBuf>,
}

impl PlotOptions {
    /// Default options writing into `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            width: 800,
            height: 600,
            font: None,
        }
    }
}

/// Which metric a chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    /// `Ts / Tp` with error bars.
    Speedup,
    /// `speedup / threads`.
    Efficiency,
}

impl ChartKind {
    /// File name of this chart for problem size `n`.
    pub fn file_name(self, n: u64) -> String {
        match self {
            Self::Speedup => format!("speedup_N{n}.png"),
            Self::Efficiency => format!("efficiency_N{n}.png"),
        }
    }

    fn title(self, n: u64) -> String {
        match self {
            Self::Speedup => format!("Speedup vs threads (N={n})"),
            Self::Efficiency => format!("Efficiency vs threads (N={n})"),
        }
    }

    fn y_desc(self) -> &'static str {
        match self {
            Self::Speedup => "Speedup (Ts/Tp)",
            Self::Efficiency => "Efficiency (speedup / threads)",
        }
    }

    fn value(self, row: &MetricRow) -> Option<f64> {
        match self {
            Self::Speedup => row.speedup,
            Self::Efficiency => row.efficiency,
        }
    }

    fn error(self, row: &MetricRow) -> Option<f64> {
        match self {
            Self::Speedup => row.summary.time_total.std,
            Self::Efficiency => None,
        }
    }
}

/// One plotted point: thread count, value and optional error half-width.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ChartPoint {
    threads: u32,
    value: f64,
    error: Option<f64>,
}

/// Rows sharing one problem size, sorted by thread count.
#[derive(Debug)]
pub struct ProblemSeries<'a> {
    /// Problem size.
    pub n: u64,
    /// Rows for this N, ascending by thread count.
    pub rows: Vec<&'a MetricRow>,
}

impl ProblemSeries<'_> {
    /// Distinct thread counts present, ascending.
    pub fn thread_counts(&self) -> Vec<u32> {
        let mut counts: Vec<u32> = self.rows.iter().map(|r| r.summary.n_threads).collect();
        counts.dedup();
        counts
    }

    /// Plotted points split into connected runs. A row with a missing value
    /// ends the current run, leaving a gap in the line.
    fn segments(&self, kind: ChartKind) -> Vec<Vec<ChartPoint>> {
        let mut segments = Vec::new();
        let mut current = Vec::new();
        for row in &self.rows {
            match kind.value(row) {
                Some(value) => current.push(ChartPoint {
                    threads: row.summary.n_threads,
                    value,
                    error: kind.error(row),
                }),
                None if !current.is_empty() => segments.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        segments
    }
}

/// Split rows by N (ascending), each series stably sorted by thread count.
pub fn group_by_problem_size(rows: &[MetricRow]) -> Vec<ProblemSeries<'_>> {
    let mut sizes: Vec<u64> = rows.iter().map(|r| r.summary.n).collect();
    sizes.sort_unstable();
    sizes.dedup();

    sizes
        .into_iter()
        .map(|n| {
            let mut subset: Vec<&MetricRow> = rows.iter().filter(|r| r.summary.n == n).collect();
            subset.sort_by_key(|r| r.summary.n_threads);
            ProblemSeries { n, rows: subset }
        })
        .collect()
}

/// Render both charts for every problem size. Returns the written paths in
/// order (speedup then efficiency, per ascending N).
pub fn render_plots(rows: &[MetricRow], options: &PlotOptions) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(&options.dir)
        .map_err(|e| PerfError::io(format!("creating {}", options.dir.display()), e))?;

    let text = chart_font(options.font.as_deref()).is_some();
    let mut written = Vec::new();

    for series in group_by_problem_size(rows) {
        for kind in [ChartKind::Speedup, ChartKind::Efficiency] {
            let path = options.dir.join(kind.file_name(series.n));
            draw_chart(&series, kind, &path, options, text).map_err(|message| {
                PerfError::Render {
                    path: path.clone(),
                    message,
                }
            })?;
            written.push(path);
        }
    }

    Ok(written)
}

/// Register the chart font once per process.
///
/// Returns the font path in use, or `None` when no usable font exists; charts
/// are then drawn without text.
pub fn chart_font(configured: Option<&Path>) -> Option<&'static Path> {
    static FONT: OnceLock<Option<PathBuf>> = OnceLock::new();

    FONT.get_or_init(|| {
        let candidates = configured
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONTS.iter().map(PathBuf::from));

        for candidate in candidates {
            let Ok(bytes) = std::fs::read(&candidate) else {
                continue;
            };
            // The registry keeps a 'static reference for the process lifetime.
            let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
            if plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes).is_ok() {
                return Some(candidate);
            }
        }
        None
    })
    .as_deref()
}

/// Axis range covering `lo..hi` with a margin, never degenerate.
fn padded_range(lo: f64, hi: f64, min_pad: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.08).max(min_pad);
    (lo - pad, hi + pad)
}

fn y_range(points: &[ChartPoint]) -> (f64, f64) {
    let lo = points
        .iter()
        .map(|p| p.value - p.error.unwrap_or(0.0))
        .fold(f64::INFINITY, f64::min);
    let hi = points
        .iter()
        .map(|p| p.value + p.error.unwrap_or(0.0))
        .fold(f64::NEG_INFINITY, f64::max);
    padded_range(lo, hi, 0.05)
}

fn draw_chart(
    series: &ProblemSeries<'_>,
    kind: ChartKind,
    path: &Path,
    options: &PlotOptions,
    text: bool,
) -> std::result::Result<(), String> {
    let ticks = series.thread_counts();
    let segments = series.segments(kind);
    let points: Vec<ChartPoint> = segments.iter().flatten().copied().collect();

    let x_lo = ticks.first().copied().unwrap_or(1).saturating_sub(1);
    let x_hi = ticks.last().copied().unwrap_or(1).saturating_add(1);
    let (y_lo, y_hi) = y_range(&points);

    let root = BitMapBackend::new(path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| e.to_string())?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(20);
    if text {
        builder
            .caption(kind.title(series.n), (FONT_FAMILY, 24))
            .x_label_area_size(45)
            .y_label_area_size(60);
    }

    let mut chart = builder
        .build_cartesian_2d((x_lo..x_hi).with_key_points(ticks.clone()), y_lo..y_hi)
        .map_err(|e| e.to_string())?;

    if text {
        chart
            .configure_mesh()
            .x_desc("Number of threads")
            .y_desc(kind.y_desc())
            .label_style((FONT_FAMILY, 14))
            .axis_desc_style((FONT_FAMILY, 16))
            .draw()
            .map_err(|e| e.to_string())?;
    } else {
        // Mesh labels need a font; draw the grid by hand instead.
        let grid = BLACK.mix(0.15);
        chart
            .draw_series(
                ticks
                    .iter()
                    .map(|&x| PathElement::new(vec![(x, y_lo), (x, y_hi)], grid)),
            )
            .map_err(|e| e.to_string())?;
        chart
            .draw_series((0..=4).map(|i| {
                let y = y_lo + (y_hi - y_lo) * f64::from(i) / 4.0;
                PathElement::new(vec![(x_lo, y), (x_hi, y)], grid)
            }))
            .map_err(|e| e.to_string())?;
    }

    for segment in &segments {
        chart
            .draw_series(
                LineSeries::new(
                    segment.iter().map(|p| (p.threads, p.value)),
                    BLUE.stroke_width(2),
                )
                .point_size(4),
            )
            .map_err(|e| e.to_string())?;
    }

    if kind == ChartKind::Speedup {
        chart
            .draw_series(points.iter().filter_map(|p| {
                p.error.map(|err| {
                    ErrorBar::new_vertical(
                        p.threads,
                        p.value - err,
                        p.value,
                        p.value + err,
                        BLUE.filled(),
                        10,
                    )
                })
            }))
            .map_err(|e| e.to_string())?;
    }

    root.present().map_err(|e| e.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{GroupSummary, SampleStats};

    fn points(series: &ProblemSeries<'_>, kind: ChartKind) -> Vec<ChartPoint> {
        series.segments(kind).into_iter().flatten().collect()
    }

    fn row(
        binary: &str,
        n_threads: u32,
        n: u64,
        speedup: Option<f64>,
        std: Option<f64>,
    ) -> MetricRow {
        let stats = SampleStats {
            mean: 1.0,
            std,
            min: 1.0,
            max: 1.0,
            count: 2,
        };
        MetricRow {
            summary: GroupSummary {
                binary: binary.into(),
                n_threads,
                n,
                time_total: stats,
                time_update: stats,
                reps: 2,
            },
            ts: speedup,
            speedup,
            efficiency: speedup.map(|s| s / f64::from(n_threads)),
        }
    }

    #[test]
    fn file_names_include_problem_size() {
        assert_eq!(ChartKind::Speedup.file_name(400), "speedup_N400.png");
        assert_eq!(ChartKind::Efficiency.file_name(7), "efficiency_N7.png");
    }

    #[test]
    fn groups_sorted_by_n_then_threads() {
        let rows = vec![
            row("par", 8, 200, Some(5.0), None),
            row("par", 2, 100, Some(1.8), None),
            row("seq", 1, 200, Some(1.0), None),
            row("par", 4, 200, Some(3.0), None),
            row("par", 1, 100, Some(0.9), None),
        ];
        let groups = group_by_problem_size(&rows);
        assert_eq!(groups.iter().map(|g| g.n).collect::<Vec<_>>(), vec![100, 200]);
        assert_eq!(groups[0].thread_counts(), vec![1, 2]);
        assert_eq!(groups[1].thread_counts(), vec![1, 4, 8]);
    }

    #[test]
    fn thread_counts_are_distinct() {
        let rows = vec![
            row("seq", 1, 100, Some(1.0), None),
            row("par", 1, 100, Some(0.9), None),
            row("par", 4, 100, Some(3.0), None),
        ];
        let groups = group_by_problem_size(&rows);
        assert_eq!(groups[0].thread_counts(), vec![1, 4]);
        assert_eq!(groups[0].rows.len(), 3);
    }

    #[test]
    fn missing_metrics_are_skipped() {
        let rows = vec![
            row("par", 2, 100, None, Some(0.1)),
            row("par", 4, 100, Some(3.0), Some(0.2)),
        ];
        let groups = group_by_problem_size(&rows);
        let speedup = points(&groups[0], ChartKind::Speedup);
        assert_eq!(speedup.len(), 1);
        assert_eq!(speedup[0].error, Some(0.2));
        assert!(points(&groups[0], ChartKind::Efficiency)[0].error.is_none());
    }

    #[test]
    fn missing_value_breaks_the_line() {
        let rows = vec![
            row("par", 2, 100, Some(1.0), None),
            row("par", 4, 100, None, None),
            row("par", 8, 100, Some(3.0), None),
        ];
        let groups = group_by_problem_size(&rows);
        let runs: Vec<Vec<u32>> = groups[0]
            .segments(ChartKind::Speedup)
            .iter()
            .map(|run| run.iter().map(|p| p.threads).collect())
            .collect();
        assert_eq!(runs, vec![vec![2], vec![8]]);
        // Ticks still include the thread count with no value.
        assert_eq!(groups[0].thread_counts(), vec![2, 4, 8]);
    }

    #[test]
    fn contiguous_values_form_one_run() {
        let rows = vec![
            row("par", 2, 100, None, None),
            row("par", 4, 100, Some(2.0), None),
            row("par", 8, 100, Some(3.0), None),
            row("par", 16, 100, None, None),
        ];
        let groups = group_by_problem_size(&rows);
        let segments = groups[0].segments(ChartKind::Efficiency);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].len(), 2);
    }

    #[test]
    fn large_thread_counts_are_not_clamped() {
        let rows = vec![row("par", u32::MAX, 100, Some(1.0), None)];
        let groups = group_by_problem_size(&rows);
        assert_eq!(points(&groups[0], ChartKind::Speedup)[0].threads, u32::MAX);
    }

    #[test]
    fn y_range_covers_error_bars() {
        let points = [
            ChartPoint {
                threads: 1,
                value: 1.0,
                error: Some(0.5),
            },
            ChartPoint {
                threads: 2,
                value: 2.0,
                error: None,
            },
        ];
        let (lo, hi) = y_range(&points);
        assert!(lo < 0.5);
        assert!(hi > 2.0);
        assert_eq!(y_range(&[]), (0.0, 1.0));
    }

    #[test]
    fn renders_two_images_per_problem_size() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("plots");
        let rows = vec![
            row("seq", 1, 100, Some(1.0), Some(0.0)),
            row("par", 2, 100, Some(1.9), Some(0.1)),
            row("par", 4, 100, None, None),
            row("par", 8, 100, Some(3.5), None),
            row("par", 4, 300, None, Some(0.3)),
        ];

        let mut options = PlotOptions::new(&out);
        options.width = 320;
        options.height = 240;
        let written = render_plots(&rows, &options).unwrap();

        assert_eq!(written.len(), 4);
        for name in [
            "speedup_N100.png",
            "efficiency_N100.png",
            "speedup_N300.png",
            "efficiency_N300.png",
        ] {
            let path = out.join(name);
            assert!(path.exists(), "{} was not written", path.display());
            let bytes = std::fs::read(&path).unwrap();
            assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        }
    }

    #[test]
    fn no_rows_renders_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let written = render_plots(&[], &PlotOptions::new(dir.path().join("p"))).unwrap();
        assert!(written.is_empty());
        assert!(dir.path().join("p").is_dir());
    }
}
