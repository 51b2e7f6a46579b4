//! PNG rendering of sweep tables with `plotters`.
//!
//! A [`FigureSpec`] names the x column and either one y column split into
//! curves by series keys ([`Curves::GroupBy`]) or several y columns drawn
//! against the same x ([`Curves::Columns`]). Axes are linear or logarithmic
//! independently.
use std::path::Path;

use log::{info, warn};
use plotters::coord::Shift;
use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::prelude::*;

use super::table::Table;
use crate::Kinetics::kinetics_error::KinError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Linear,
    Log,
}

#[derive(Debug, Clone)]
pub enum Curves {
    /// one y column, one curve per combination of the series-key axes
    GroupBy { y: String, keys: Vec<String> },
    /// several y columns, each a curve with its own legend label
    Columns(Vec<(String, String)>),
}

/// Text with an arrow pointing at a data coordinate
#[derive(Debug, Clone)]
pub struct Annotation {
    pub text: String,
    pub xy: (f64, f64),
    pub text_xy: (f64, f64),
}

#[derive(Debug, Clone)]
pub struct FigureSpec {
    pub file_name: String,
    pub title: Option<String>,
    pub x_column: String,
    pub curves: Curves,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: Scale,
    pub y_scale: Scale,
    /// plot |y| (semilog plots of signed fields)
    pub abs_y: bool,
    pub x_limits: Option<(f64, f64)>,
    pub y_limits: Option<(f64, f64)>,
    pub legend_title: Option<String>,
    pub annotation: Option<Annotation>,
}

impl FigureSpec {
    /// log-log figure of `y` vs `x` with one curve per series key combination
    pub fn loglog(file_name: &str, x_column: &str, y: &str, keys: &[&str]) -> Self {
        Self {
            file_name: file_name.to_string(),
            title: None,
            x_column: x_column.to_string(),
            curves: Curves::GroupBy {
                y: y.to_string(),
                keys: keys.iter().map(|k| k.to_string()).collect(),
            },
            x_label: x_column.to_string(),
            y_label: y.to_string(),
            x_scale: Scale::Log,
            y_scale: Scale::Log,
            abs_y: false,
            x_limits: None,
            y_limits: None,
            legend_title: None,
            annotation: None,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_labels(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = x_label.to_string();
        self.y_label = y_label.to_string();
        self
    }

    pub fn with_legend_title(mut self, legend_title: &str) -> Self {
        self.legend_title = Some(legend_title.to_string());
        self
    }
}

/// A drawn curve: legend label and points
#[derive(Debug, Clone)]
pub struct Curve {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Resolve the figure spec against the table into plain point lists
pub fn collect_curves(table: &Table, spec: &FigureSpec) -> Result<Vec<Curve>, KinError> {
    let x_idx = table.column_index(&spec.x_column)?;
    let y_of = |v: f64| if spec.abs_y { v.abs() } else { v };
    match &spec.curves {
        Curves::GroupBy { y, keys } => {
            let y_idx = table.column_index(y)?;
            let keys: Vec<&str> = keys.iter().map(|k| k.as_str()).collect();
            let groups = table.group_by(&keys)?;
            Ok(groups
                .iter()
                .map(|g| Curve {
                    label: g.label(),
                    points: g
                        .samples
                        .iter()
                        .map(|s| (table.value(s, x_idx), y_of(table.value(s, y_idx))))
                        .collect(),
                })
                .collect())
        }
        Curves::Columns(columns) => columns
            .iter()
            .map(|(name, label)| {
                let y_idx = table.column_index(name)?;
                Ok(Curve {
                    label: label.clone(),
                    points: table
                        .samples()
                        .iter()
                        .map(|s| (table.value(s, x_idx), y_of(table.value(s, y_idx))))
                        .collect(),
                })
            })
            .collect(),
    }
}

/// Render the figure into `dir/spec.file_name`
pub fn render_figure(
    table: &Table,
    spec: &FigureSpec,
    dir: &Path,
    size: (u32, u32),
) -> Result<std::path::PathBuf, KinError> {
    let path = dir.join(&spec.file_name);
    let mut curves = collect_curves(table, spec)?;
    // points a log axis cannot show are dropped, lines leaving fixed limits are cut at the frame
    let mut pieces: Vec<(String, Vec<Vec<(f64, f64)>>)> = Vec::with_capacity(curves.len());
    for curve in curves.iter_mut() {
        let before = curve.points.len();
        curve.points.retain(|&(x, y)| {
            (spec.x_scale == Scale::Linear || x > 0.0) && (spec.y_scale == Scale::Linear || y > 0.0)
        });
        if curve.points.len() < before {
            warn!(
                "{}: {} non-positive points of '{}' skipped on log axis",
                spec.file_name,
                before - curve.points.len(),
                curve.label
            );
        }
        pieces.push((curve.label.clone(), clip_to_limits(&curve.points, spec)));
    }
    let drawn: Vec<(f64, f64)> = pieces
        .iter()
        .flat_map(|(_, p)| p.iter().flatten().copied())
        .collect();
    let x_range = spec
        .x_limits
        .or_else(|| data_range(&drawn, |p| p.0))
        .ok_or_else(|| plot_error(&path, "no drawable points"))?;
    let y_range = spec
        .y_limits
        .or_else(|| data_range(&drawn, |p| p.1))
        .ok_or_else(|| plot_error(&path, "no drawable points"))?;
    let x_range = padded(x_range, spec.x_scale);
    let y_range = padded(y_range, spec.y_scale);

    // the backend borrows the path until the area is dropped
    {
        let root = BitMapBackend::new(&path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| plot_error(&path, e))?;
        let (x0, x1) = x_range;
        let (y0, y1) = y_range;
        match (spec.x_scale, spec.y_scale) {
            (Scale::Log, Scale::Log) => {
                let chart = chart_builder(&root, spec)
                    .build_cartesian_2d((x0..x1).log_scale(), (y0..y1).log_scale())
                    .map_err(|e| plot_error(&path, e))?;
                draw_curves(chart, spec, &pieces, &path)?;
            }
            (Scale::Linear, Scale::Log) => {
                let chart = chart_builder(&root, spec)
                    .build_cartesian_2d(x0..x1, (y0..y1).log_scale())
                    .map_err(|e| plot_error(&path, e))?;
                draw_curves(chart, spec, &pieces, &path)?;
            }
            (Scale::Log, Scale::Linear) => {
                let chart = chart_builder(&root, spec)
                    .build_cartesian_2d((x0..x1).log_scale(), y0..y1)
                    .map_err(|e| plot_error(&path, e))?;
                draw_curves(chart, spec, &pieces, &path)?;
            }
            (Scale::Linear, Scale::Linear) => {
                let chart = chart_builder(&root, spec)
                    .build_cartesian_2d(x0..x1, y0..y1)
                    .map_err(|e| plot_error(&path, e))?;
                draw_curves(chart, spec, &pieces, &path)?;
            }
        }
        root.present().map_err(|e| plot_error(&path, e))?;
    }
    info!("saved figure {}", path.display());
    Ok(path)
}

fn chart_builder<'a, 'b, 'c>(
    root: &'a DrawingArea<BitMapBackend<'c>, Shift>,
    spec: &FigureSpec,
) -> ChartBuilder<'a, 'b, BitMapBackend<'c>> {
    let mut builder = ChartBuilder::on(root);
    builder
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(80);
    if let Some(title) = &spec.title {
        builder.caption(title, ("sans-serif", 18));
    }
    builder
}

fn draw_curves<'a, X, Y>(
    mut chart: ChartContext<'a, BitMapBackend<'a>, Cartesian2d<X, Y>>,
    spec: &FigureSpec,
    curves: &[(String, Vec<Vec<(f64, f64)>>)],
    path: &Path,
) -> Result<(), KinError>
where
    X: Ranged<ValueType = f64> + ValueFormatter<f64>,
    Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
{
    let x_ticks = |v: &f64| tick_label(*v, spec.x_scale);
    let y_ticks = |v: &f64| tick_label(*v, spec.y_scale);
    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .x_label_formatter(&x_ticks)
        .y_label_formatter(&y_ticks)
        .draw()
        .map_err(|e| plot_error(path, e))?;

    for (idx, (label, lines)) in curves.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        for (n, line) in lines.iter().enumerate() {
            let series = chart
                .draw_series(LineSeries::new(line.iter().copied(), color.stroke_width(2)))
                .map_err(|e| plot_error(path, e))?;
            // one legend entry per curve
            if n == 0 {
                series.label(label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            }
        }
    }

    if let Some(note) = &spec.annotation {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![note.text_xy, note.xy],
                BLACK.stroke_width(1),
            )))
            .map_err(|e| plot_error(path, e))?;
        chart
            .draw_series(std::iter::once(Circle::new(note.xy, 3, BLACK.filled())))
            .map_err(|e| plot_error(path, e))?;
        chart
            .draw_series(std::iter::once(Text::new(
                note.text.clone(),
                note.text_xy,
                ("sans-serif", 14).into_font(),
            )))
            .map_err(|e| plot_error(path, e))?;
    }

    if curves.len() > 1 || spec.legend_title.is_some() {
        if let Some(legend_title) = &spec.legend_title {
            chart
                .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())
                .map_err(|e| plot_error(path, e))?
                .label(legend_title.as_str())
                .legend(|(x, y)| PathElement::new(vec![(x, y)], TRANSPARENT));
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()
            .map_err(|e| plot_error(path, e))?;
    }
    Ok(())
}

/// Splits a polyline into the pieces that lie inside the fixed limits of `spec`.
///
/// A segment crossing a limit is cut where it meets the frame, interpolated in the
/// plotted coordinates (log10 on log axes). Without limits the polyline is returned whole.
pub fn clip_to_limits(points: &[(f64, f64)], spec: &FigureSpec) -> Vec<Vec<(f64, f64)>> {
    let fwd = |v: f64, scale: Scale| if scale == Scale::Log { v.log10() } else { v };
    let inv = |v: f64, scale: Scale| if scale == Scale::Log { 10f64.powf(v) } else { v };
    let bounds = |limits: Option<(f64, f64)>, scale: Scale| {
        limits.map_or((f64::NEG_INFINITY, f64::INFINITY), |(lo, hi)| (fwd(lo, scale), fwd(hi, scale)))
    };
    let (x_lo, x_hi) = bounds(spec.x_limits, spec.x_scale);
    let (y_lo, y_hi) = bounds(spec.y_limits, spec.y_scale);
    let inside = |x: f64, y: f64| x >= x_lo && x <= x_hi && y >= y_lo && y <= y_hi;

    let mut pieces = Vec::new();
    let mut current: Vec<(f64, f64)> = Vec::new();
    if let [only] = points {
        if inside(fwd(only.0, spec.x_scale), fwd(only.1, spec.y_scale)) {
            pieces.push(vec![*only]);
        }
        return pieces;
    }
    for w in points.windows(2) {
        let (p, q) = (w[0], w[1]);
        let (x0, y0) = (fwd(p.0, spec.x_scale), fwd(p.1, spec.y_scale));
        let (dx, dy) = (fwd(q.0, spec.x_scale) - x0, fwd(q.1, spec.y_scale) - y0);
        // Liang-Barsky: parameter window of the segment inside the rectangle
        let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
        let mut visible = true;
        for (edge_p, edge_q) in [(-dx, x0 - x_lo), (dx, x_hi - x0), (-dy, y0 - y_lo), (dy, y_hi - y0)] {
            if edge_p == 0.0 {
                if edge_q < 0.0 {
                    visible = false;
                }
            } else if edge_q.is_finite() {
                let r = edge_q / edge_p;
                if edge_p < 0.0 {
                    t0 = t0.max(r);
                } else {
                    t1 = t1.min(r);
                }
            }
        }
        if !visible || t0 > t1 {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
            }
            continue;
        }
        let at = |t: f64| (inv(x0 + t * dx, spec.x_scale), inv(y0 + t * dy, spec.y_scale));
        let start = if t0 == 0.0 { p } else { at(t0) };
        let end = if t1 == 1.0 { q } else { at(t1) };
        if t0 > 0.0 && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        if current.is_empty() {
            current.push(start);
        }
        current.push(end);
        if t1 < 1.0 {
            pieces.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

fn tick_label(v: f64, scale: Scale) -> String {
    match scale {
        Scale::Log => format!("{:.0e}", v),
        Scale::Linear => {
            if v != 0.0 && (v.abs() >= 1e4 || v.abs() < 1e-2) {
                format!("{:.1e}", v)
            } else {
                format!("{}", (v * 1e3).round() / 1e3)
            }
        }
    }
}

fn data_range(points: &[(f64, f64)], pick: impl Fn(&(f64, f64)) -> f64) -> Option<(f64, f64)> {
    points
        .iter()
        .map(pick)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// degenerate ranges are widened so the coordinate system is valid
fn padded((lo, hi): (f64, f64), scale: Scale) -> (f64, f64) {
    if hi > lo {
        return (lo, hi);
    }
    match scale {
        Scale::Log => (lo / 2.0, hi * 2.0),
        Scale::Linear => {
            let d = if lo == 0.0 { 1.0 } else { lo.abs() * 0.5 };
            (lo - d, hi + d)
        }
    }
}

fn plot_error(path: &Path, message: impl std::fmt::Display) -> KinError {
    KinError::Plot {
        file: path.display().to_string(),
        message: message.to_string(),
    }
}
