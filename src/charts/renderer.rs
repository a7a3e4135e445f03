//! Chart Renderer Module
//! Turns a results table into one of three chart layouts:
//!
//! 1. Bias/ROC-AUC grid: one dual-y-axis scatter cell per (m, B) combination,
//!    both scores over H on a shared [-0.1, 1.1] range.
//! 2. Faceted swarm: rows by B, columns by H, x = pseeds, hue = m.
//! 3. Compact swarm: rows by m, columns by B, x = H, hue = pseeds.
//!
//! The drawing surface is scoped to a single call: the `render_*` wrappers
//! build a bitmap area, draw, and present it on every successful path.

use crate::charts::layout::{keep_fixed_tick, keep_proportional_tick, GridShape};
use crate::charts::swarm::swarm_positions;
use crate::data::{ResultsTable, TableError};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

// Colors
const BIAS_COLOR: RGBColor = RGBColor(214, 39, 40); // left axis (bias)
const ROCAUC_COLOR: RGBColor = RGBColor(31, 119, 180); // right axis (rocauc)
const REFERENCE_COLOR: RGBColor = RGBColor(128, 128, 128);

/// Hue palette for swarm series.
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),  // Red
    RGBColor(46, 204, 113), // Green
    RGBColor(155, 89, 182), // Purple
    RGBColor(243, 156, 18), // Orange
    RGBColor(26, 188, 156), // Teal
    RGBColor(233, 30, 99),  // Pink
    RGBColor(0, 188, 212),  // Cyan
    RGBColor(255, 87, 34),  // Deep Orange
    RGBColor(121, 85, 72),  // Brown
    RGBColor(96, 125, 139), // Blue Grey
];

// Cell sizes in pixels, proportional to the original figure sizes
const GRID_CELL_WIDTH: u32 = 300;
const GRID_CELL_HEIGHT: u32 = 200;
const FACET_CELL_SIZE: u32 = 160;
const COMPACT_CELL_SIZE: u32 = 200;
const LEGEND_WIDTH: u32 = 110;

const SWARM_WIDTH: f64 = 0.35;
const SCORE_RANGE: (f64, f64) = (-0.1, 1.1);
const COMPACT_RANGE: (f64, f64) = (0.0, 1.1);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("score ({0}) not found")]
    UnknownScore(String),
    #[error("Table error: {0}")]
    Table(#[from] TableError),
    #[error("Drawing failed: {0}")]
    Draw(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for ChartError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ChartError::Draw(err.to_string())
    }
}

/// Score columns that may be plotted on the y-axis of the swarm layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    RocAuc,
    Bias1,
}

impl Metric {
    /// Parse a score-selector string. Only "rocauc" and "bias1" are known;
    /// matching is case-sensitive and anything else fails before drawing.
    pub fn parse(score: &str) -> Result<Self, ChartError> {
        match score {
            "rocauc" => Ok(Metric::RocAuc),
            "bias1" => Ok(Metric::Bias1),
            _ => Err(ChartError::UnknownScore(score.to_string())),
        }
    }

    /// Column holding this metric's values.
    pub fn column(&self) -> &'static str {
        match self {
            Metric::RocAuc => "rocauc",
            Metric::Bias1 => "bias1",
        }
    }

    /// Label attached to the 0.5 reference line.
    pub fn reference_label(&self) -> &'static str {
        match self {
            Metric::RocAuc => "uniform",
            Metric::Bias1 => "unbiased",
        }
    }
}

/// Facet arrangement of one swarm layout.
struct SwarmSpec {
    row_col: &'static str,
    col_col: &'static str,
    x_col: &'static str,
    hue_col: &'static str,
    fixed_y: Option<(f64, f64)>,
    fixed_ticks: bool,
}

const FACETED_SPEC: SwarmSpec = SwarmSpec {
    row_col: "B",
    col_col: "H",
    x_col: "pseeds",
    hue_col: "m",
    fixed_y: None,
    fixed_ticks: false,
};

const COMPACT_SPEC: SwarmSpec = SwarmSpec {
    row_col: "m",
    col_col: "B",
    x_col: "H",
    hue_col: "pseeds",
    fixed_y: Some(COMPACT_RANGE),
    fixed_ticks: true,
};

/// Renders results tables as statistical charts. Stateless; every render call
/// is independent.
pub struct ChartRenderer;

impl ChartRenderer {
    /// Grid shape of the bias/ROC-AUC layout: rows = distinct m, cols = distinct B.
    pub fn bias_rocauc_grid_shape(table: &ResultsTable) -> Result<GridShape, ChartError> {
        Ok(GridShape::new(
            table.distinct("m")?.len(),
            table.distinct("B")?.len(),
        ))
    }

    /// Grid shape of the faceted swarm layout: rows = distinct B, cols = distinct H.
    pub fn faceted_shape(table: &ResultsTable) -> Result<GridShape, ChartError> {
        Ok(GridShape::new(
            table.distinct("B")?.len(),
            table.distinct("H")?.len(),
        ))
    }

    /// Grid shape of the compact swarm layout: rows = distinct m, cols = distinct B.
    pub fn compact_shape(table: &ResultsTable) -> Result<GridShape, ChartError> {
        Ok(GridShape::new(
            table.distinct("m")?.len(),
            table.distinct("B")?.len(),
        ))
    }

    /// Render the bias/ROC-AUC grid to a PNG file.
    pub fn render_bias_rocauc_grid<P: AsRef<Path>>(
        table: &ResultsTable,
        path: P,
    ) -> Result<(), ChartError> {
        let shape = Self::bias_rocauc_grid_shape(table)?;
        let size = canvas_size(&shape, GRID_CELL_WIDTH, GRID_CELL_HEIGHT, 0);
        let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
        Self::draw_bias_rocauc_grid(table, &root)?;
        root.present()?;
        Ok(())
    }

    /// Render the faceted swarm layout to a PNG file.
    pub fn render_faceted<P: AsRef<Path>>(
        table: &ResultsTable,
        score: &str,
        path: P,
    ) -> Result<(), ChartError> {
        // validate before the drawing surface exists
        let metric = Metric::parse(score)?;
        let shape = Self::faceted_shape(table)?;
        let size = canvas_size(&shape, FACET_CELL_SIZE, FACET_CELL_SIZE, LEGEND_WIDTH);
        let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
        Self::draw_swarm_grid(table, metric, &root, &FACETED_SPEC)?;
        root.present()?;
        Ok(())
    }

    /// Render the compact swarm layout to a PNG file.
    pub fn render_compact<P: AsRef<Path>>(
        table: &ResultsTable,
        score: &str,
        path: P,
    ) -> Result<(), ChartError> {
        let metric = Metric::parse(score)?;
        let shape = Self::compact_shape(table)?;
        let size = canvas_size(&shape, COMPACT_CELL_SIZE, COMPACT_CELL_SIZE, LEGEND_WIDTH);
        let root = BitMapBackend::new(path.as_ref(), size).into_drawing_area();
        Self::draw_swarm_grid(table, metric, &root, &COMPACT_SPEC)?;
        root.present()?;
        Ok(())
    }

    /// Draw the bias/ROC-AUC grid onto an existing drawing area.
    ///
    /// Each (m, B) cell overlays two scatter series over H: bias1 on the left
    /// y-axis and rocauc on the right, both on [-0.1, 1.1] with a dashed 0.5
    /// reference line. An empty table yields a blank (degenerate) grid.
    pub fn draw_bias_rocauc_grid<DB: DrawingBackend>(
        table: &ResultsTable,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE)?;

        let m_values = table.distinct("m")?;
        let b_values = table.distinct("B")?;
        let shape = GridShape::new(m_values.len(), b_values.len());
        if shape.is_empty() {
            return Ok(());
        }

        let m_labels = table.column_labels("m")?;
        let b_labels = table.column_labels("B")?;
        let h_col = table.column_f64("H")?;
        let bias_col = table.column_f64("bias1")?;
        let rocauc_col = table.column_f64("rocauc")?;

        // shared x range across cells
        let (x_min, x_max) = padded_range(h_col.iter().flatten().copied());
        let (y_min, y_max) = SCORE_RANGE;

        let cells = root.split_evenly((shape.nrows, shape.ncols));
        for (index, area) in cells.iter().enumerate() {
            let (row, col) = shape.cell(index);
            let m = &m_values[row];
            let b = &b_values[col];

            let mut bias_points: Vec<(f64, f64)> = Vec::new();
            let mut rocauc_points: Vec<(f64, f64)> = Vec::new();
            for i in 0..table.height() {
                if m_labels[i].as_deref() != Some(m.as_str())
                    || b_labels[i].as_deref() != Some(b.as_str())
                {
                    continue;
                }
                let Some(h) = h_col[i] else { continue };
                if let Some(bias) = bias_col[i] {
                    bias_points.push((h, bias));
                }
                if let Some(rocauc) = rocauc_col[i] {
                    rocauc_points.push((h, rocauc));
                }
            }

            let mut chart = ChartBuilder::on(area)
                .caption(format!("B={} | m={}", b, m), ("sans-serif", 13))
                .margin(5)
                .x_label_area_size(24)
                .y_label_area_size(32)
                .right_y_label_area_size(32)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)?
                .set_secondary_coord(x_min..x_max, y_min..y_max);

            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("H")
                .y_desc("bias")
                .x_labels(4)
                .y_labels(4)
                .label_style(("sans-serif", 9).into_font().color(&BIAS_COLOR))
                .axis_desc_style(("sans-serif", 11).into_font().color(&BIAS_COLOR))
                .draw()?;

            chart
                .configure_secondary_axes()
                .y_desc("rocauc")
                .label_style(("sans-serif", 9).into_font().color(&ROCAUC_COLOR))
                .axis_desc_style(("sans-serif", 11).into_font().color(&ROCAUC_COLOR))
                .draw()?;

            chart.draw_series(DashedLineSeries::new(
                vec![(x_min, 0.5), (x_max, 0.5)],
                4,
                3,
                BIAS_COLOR.mix(0.6).stroke_width(1),
            ))?;
            chart.draw_series(
                bias_points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, BIAS_COLOR.filled())),
            )?;

            chart.draw_secondary_series(DashedLineSeries::new(
                vec![(x_min, 0.5), (x_max, 0.5)],
                4,
                3,
                ROCAUC_COLOR.mix(0.6).stroke_width(1),
            ))?;
            chart.draw_secondary_series(
                rocauc_points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 3, ROCAUC_COLOR.filled())),
            )?;
        }

        Ok(())
    }

    /// Draw the faceted swarm layout onto an existing drawing area.
    pub fn draw_faceted<DB: DrawingBackend>(
        table: &ResultsTable,
        score: &str,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), ChartError> {
        let metric = Metric::parse(score)?;
        Self::draw_swarm_grid(table, metric, root, &FACETED_SPEC)
    }

    /// Draw the compact swarm layout onto an existing drawing area.
    pub fn draw_compact<DB: DrawingBackend>(
        table: &ResultsTable,
        score: &str,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), ChartError> {
        let metric = Metric::parse(score)?;
        Self::draw_swarm_grid(table, metric, root, &COMPACT_SPEC)
    }

    fn draw_swarm_grid<DB: DrawingBackend>(
        table: &ResultsTable,
        metric: Metric,
        root: &DrawingArea<DB, Shift>,
        spec: &SwarmSpec,
    ) -> Result<(), ChartError> {
        root.fill(&WHITE)?;

        let row_values = table.distinct(spec.row_col)?;
        let col_values = table.distinct(spec.col_col)?;
        let shape = GridShape::new(row_values.len(), col_values.len());
        if shape.is_empty() {
            return Ok(());
        }

        let categories = table.distinct(spec.x_col)?;
        let hues = table.distinct(spec.hue_col)?;

        let row_labels = table.column_labels(spec.row_col)?;
        let col_labels = table.column_labels(spec.col_col)?;
        let cat_labels = table.column_labels(spec.x_col)?;
        let hue_labels = table.column_labels(spec.hue_col)?;
        let y_col = table.column_f64(metric.column())?;

        let (y_min, y_max) = match spec.fixed_y {
            Some(range) => range,
            None => padded_range(y_col.iter().flatten().copied()),
        };

        let (width, _) = root.dim_in_pixel();
        let split_at = width.saturating_sub(LEGEND_WIDTH) as i32;
        let (grid_area, legend_area) = root.split_horizontally(split_at);
        draw_legend(&legend_area, spec.hue_col, &hues, metric.reference_label())?;

        let n_cats = categories.len();
        let x_min = -0.5;
        // keep a non-degenerate span even when the category column is all-null
        let x_max = (n_cats as f64 - 0.5).max(0.5);

        let cells = grid_area.split_evenly((shape.nrows, shape.ncols));
        for (index, area) in cells.iter().enumerate() {
            let (row, col) = shape.cell(index);
            let row_value = &row_values[row];
            let col_value = &col_values[col];

            // (category index, hue index, y) for this cell
            let mut cell_points: Vec<(usize, usize, f64)> = Vec::new();
            for i in 0..table.height() {
                if row_labels[i].as_deref() != Some(row_value.as_str())
                    || col_labels[i].as_deref() != Some(col_value.as_str())
                {
                    continue;
                }
                let (Some(cat), Some(hue), Some(y)) =
                    (cat_labels[i].as_deref(), hue_labels[i].as_deref(), y_col[i])
                else {
                    continue;
                };
                let (Some(ci), Some(hi)) = (
                    categories.iter().position(|c| c == cat),
                    hues.iter().position(|h| h == hue),
                ) else {
                    continue;
                };
                cell_points.push((ci, hi, y));
            }

            let x_desc = if shape.keep_x_label(row, col) {
                spec.x_col
            } else {
                ""
            };
            let y_desc = if shape.keep_y_label(row, col) {
                metric.column()
            } else {
                ""
            };

            let mut chart = ChartBuilder::on(area)
                .caption(
                    format!("{}={} | {}={}", spec.col_col, col_value, spec.row_col, row_value),
                    ("sans-serif", 12),
                )
                .margin(4)
                .x_label_area_size(24)
                .y_label_area_size(30)
                .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc(x_desc)
                .y_desc(y_desc)
                .x_labels(n_cats.max(2))
                .y_labels(4)
                .label_style(("sans-serif", 9))
                .axis_desc_style(("sans-serif", 11))
                .x_label_formatter(&|x| {
                    let idx = x.round();
                    if (x - idx).abs() > 1e-6 || idx < 0.0 || idx >= n_cats as f64 {
                        return String::new();
                    }
                    let idx = idx as usize;
                    let keep = if spec.fixed_ticks {
                        keep_fixed_tick(idx)
                    } else {
                        keep_proportional_tick(n_cats, idx)
                    };
                    if keep {
                        categories[idx].clone()
                    } else {
                        String::new()
                    }
                })
                .draw()?;

            chart.draw_series(DashedLineSeries::new(
                vec![(x_min, 0.5), (x_max, 0.5)],
                4,
                3,
                REFERENCE_COLOR.stroke_width(1),
            ))?;

            // swarm offsets are computed per category slot across all hues
            let mut placed: Vec<(f64, f64, usize)> = Vec::new();
            for ci in 0..n_cats {
                let slot: Vec<(usize, f64)> = cell_points
                    .iter()
                    .filter(|p| p.0 == ci)
                    .map(|p| (p.1, p.2))
                    .collect();
                let ys: Vec<f64> = slot.iter().map(|p| p.1).collect();
                let xs = swarm_positions(&ys, ci as f64, SWARM_WIDTH);
                for (x, (hi, y)) in xs.into_iter().zip(slot) {
                    placed.push((x, y, hi));
                }
            }

            for hi in 0..hues.len() {
                let color = PALETTE[hi % PALETTE.len()];
                chart.draw_series(
                    placed
                        .iter()
                        .filter(|p| p.2 == hi)
                        .map(|&(x, y, _)| Circle::new((x, y), 2, color.filled())),
                )?;
            }
        }

        Ok(())
    }
}

fn canvas_size(shape: &GridShape, cell_w: u32, cell_h: u32, legend_w: u32) -> (u32, u32) {
    let ncols = shape.ncols.max(1) as u32;
    let nrows = shape.nrows.max(1) as u32;
    (ncols * cell_w + legend_w, nrows * cell_h)
}

fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if !v.is_nan() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((max - min) * 0.05).max(0.05);
    (min - pad, max + pad)
}

/// Draw the shared hue legend plus the reference-line entry into the margin strip.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    entries: &[String],
    reference_label: &str,
) -> Result<(), ChartError> {
    area.draw(&Text::new(
        title.to_string(),
        (10, 12),
        ("sans-serif", 13).into_font(),
    ))?;

    let mut y = 32i32;
    for (i, entry) in entries.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        area.draw(&Circle::new((14, y), 4, color.filled()))?;
        area.draw(&Text::new(
            entry.clone(),
            (24, y - 6),
            ("sans-serif", 12).into_font(),
        ))?;
        y += 18;
    }

    area.draw(&PathElement::new(
        vec![(8, y), (20, y)],
        REFERENCE_COLOR.stroke_width(1),
    ))?;
    area.draw(&Text::new(
        reference_label.to_string(),
        (24, y - 6),
        ("sans-serif", 12).into_font(),
    ))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn table(
        m: Vec<i64>,
        b: Vec<i64>,
        h: Vec<f64>,
        pseeds: Vec<i64>,
        rocauc: Vec<f64>,
        bias1: Vec<f64>,
    ) -> ResultsTable {
        let df = DataFrame::new(vec![
            Column::new("m".into(), m),
            Column::new("B".into(), b),
            Column::new("H".into(), h),
            Column::new("pseeds".into(), pseeds),
            Column::new("rocauc".into(), rocauc),
            Column::new("bias1".into(), bias1),
        ])
        .unwrap();
        ResultsTable::new(df).unwrap()
    }

    fn sample_table() -> ResultsTable {
        table(
            vec![1, 1, 2, 2],
            vec![10, 20, 10, 20],
            vec![0.1, 0.5, 0.9, 0.5],
            vec![5, 10, 5, 10],
            vec![0.7, 0.8, 0.6, 0.9],
            vec![0.4, 0.5, 0.55, 0.45],
        )
    }

    #[test]
    fn metric_parses_known_scores() {
        assert_eq!(Metric::parse("rocauc").unwrap(), Metric::RocAuc);
        assert_eq!(Metric::parse("bias1").unwrap(), Metric::Bias1);
        assert_eq!(Metric::parse("rocauc").unwrap().reference_label(), "uniform");
        assert_eq!(Metric::parse("bias1").unwrap().reference_label(), "unbiased");
    }

    #[test]
    fn metric_rejects_unknown_scores() {
        for score in ["bias2", "ROCAUC", "Bias1", ""] {
            match Metric::parse(score) {
                Err(ChartError::UnknownScore(name)) => assert_eq!(name, score),
                _ => panic!("expected UnknownScore for {score:?}"),
            }
        }
    }

    #[test]
    fn grid_shape_is_sorted_two_by_two() {
        let shape = ChartRenderer::bias_rocauc_grid_shape(&sample_table()).unwrap();
        assert_eq!(shape, GridShape::new(2, 2));
        // ascending on both axes
        let t = sample_table();
        assert_eq!(t.distinct("m").unwrap(), vec!["1", "2"]);
        assert_eq!(t.distinct("B").unwrap(), vec!["10", "20"]);
    }

    #[test]
    fn single_combination_gives_one_by_one_grid() {
        let t = table(
            vec![1, 1],
            vec![10, 10],
            vec![0.5, 0.5],
            vec![5, 5],
            vec![0.7, 0.8],
            vec![0.4, 0.5],
        );
        assert_eq!(
            ChartRenderer::bias_rocauc_grid_shape(&t).unwrap(),
            GridShape::new(1, 1)
        );
    }

    #[test]
    fn swarm_shapes_follow_their_facet_columns() {
        let t = sample_table();
        // faceted: rows = B (2 distinct), cols = H (3 distinct)
        assert_eq!(ChartRenderer::faceted_shape(&t).unwrap(), GridShape::new(2, 3));
        // compact: rows = m, cols = B
        assert_eq!(ChartRenderer::compact_shape(&t).unwrap(), GridShape::new(2, 2));
    }

    #[test]
    fn unknown_score_fails_before_any_output() {
        let path = std::env::temp_dir().join(format!(
            "biaschart_{}_invalid_score.png",
            std::process::id()
        ));
        let err = ChartRenderer::render_faceted(&sample_table(), "accuracy", &path).unwrap_err();
        assert!(matches!(err, ChartError::UnknownScore(_)));
        assert!(!path.exists());

        let err = ChartRenderer::render_compact(&sample_table(), "Rocauc", &path).unwrap_err();
        assert!(matches!(err, ChartError::UnknownScore(_)));
        assert!(!path.exists());
    }

    #[test]
    fn empty_table_renders_degenerate_grid() {
        let t = table(vec![], vec![], vec![], vec![], vec![], vec![]);
        assert!(ChartRenderer::bias_rocauc_grid_shape(&t).unwrap().is_empty());

        let path = std::env::temp_dir().join(format!(
            "biaschart_{}_empty_grid.png",
            std::process::id()
        ));
        ChartRenderer::render_bias_rocauc_grid(&t, &path).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn empty_table_renders_degenerate_swarm_layouts() {
        let t = table(vec![], vec![], vec![], vec![], vec![], vec![]);
        let path = std::env::temp_dir().join(format!(
            "biaschart_{}_empty_swarm.png",
            std::process::id()
        ));
        ChartRenderer::render_faceted(&t, "rocauc", &path).unwrap();
        ChartRenderer::render_compact(&t, "bias1", &path).unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).ok();
    }
}
