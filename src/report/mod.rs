//! SVG charts for a labeled survey dataset.
//!
//! Every chart reads the binarized answer columns and the "Stress Level"
//! column; none of them classifies anything.

pub mod palette;

use crate::classifier::StressLevel;
use crate::config::{ReportConfig, Size};
use crate::prepare::LabeledDataset;
use crate::records::SurveyRecord;
use crate::stats::{box_stats, grouped_correlation, BoxStats, GroupedCorrelation};
use log::{debug, info};
use palette::{annotation_color, coolwarm, level_color, UNDEFINED};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

pub type DrawResult<T> = Result<T, Box<dyn Error>>;

/// Variable pairs compared side by side, as (first, second).
pub static HISTOGRAM_PAIRS: [(&str, &str); 3] = [
    ("Academic Pressure", "Time Management"),
    ("Financial Stress", "Sleep Stress"),
    ("Interaction", "Attendance"),
];

pub static BOXPLOT_PAIRS: [(&str, &str); 3] = [
    ("Academic Pressure", "Time Management"),
    ("Financial Stress", "Sleep Stress"),
    ("Attendance", "Interaction"),
];

const FONT: &str = "sans-serif";

/// Columns pulled out of the dataframe once, ready for drawing.
pub struct PlotData {
    levels: Vec<StressLevel>,
    columns: Vec<(String, Vec<Option<i32>>)>,
}

impl PlotData {
    pub fn from_dataset(labeled: &LabeledDataset) -> DrawResult<Self> {
        let levels = labeled.levels()?;
        let columns = SurveyRecord::binary_vars()
            .into_iter()
            .map(|var| Ok((var.to_string(), labeled.binary_column(var)?)))
            .collect::<DrawResult<Vec<_>>>()?;
        Ok(Self { levels, columns })
    }

    fn column(&self, var: &str) -> DrawResult<&[Option<i32>]> {
        self.columns
            .iter()
            .find(|(name, _)| name == var)
            .map(|(_, values)| values.as_slice())
            .ok_or_else(|| format!("no binarized column {var:?}").into())
    }

    /// Rows with the given level and a value equal to `value`.
    fn count(&self, values: &[Option<i32>], level: StressLevel, value: i32) -> usize {
        self.levels
            .iter()
            .zip(values)
            .filter(|(l, v)| **l == level && **v == Some(value))
            .count()
    }

    fn values_for(&self, values: &[Option<i32>], level: StressLevel) -> Vec<f64> {
        self.levels
            .iter()
            .zip(values)
            .filter(|(l, _)| **l == level)
            .filter_map(|(_, v)| v.map(f64::from))
            .collect()
    }
}

pub fn slug(label: &str) -> String {
    label.to_lowercase().replace(' ', "_")
}

/// Tick labels for a 0/1 axis: only the integer positions are named.
fn binary_tick(v: &f64) -> String {
    if (v - v.round()).abs() < 1e-6 && (0.0..=1.0).contains(&v.round()) {
        format!("{:.0}", v.round())
    } else {
        String::new()
    }
}

/// Tick labels for a level axis where level `k` of `StressLevel::ALL` sits at `2 - k`.
fn level_tick(v: &f64) -> String {
    if (v - v.round()).abs() > 1e-6 {
        return String::new();
    }
    match v.round() as i64 {
        0 => StressLevel::Low.to_string(),
        1 => StressLevel::Medium.to_string(),
        2 => StressLevel::High.to_string(),
        _ => String::new(),
    }
}

fn level_position(level: StressLevel) -> f64 {
    match level {
        StressLevel::High => 2.0,
        StressLevel::Medium => 1.0,
        StressLevel::Low => 0.0,
    }
}

fn centered(size: u32) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(HPos::Center, VPos::Center))
}

fn annotation_style(value: f64) -> TextStyle<'static> {
    let mut style = centered(14);
    style.color = annotation_color(value).to_backend_color();
    style
}

/// Render every chart into `config.output_dir` and return the written files.
pub fn render_all(labeled: &LabeledDataset, config: &ReportConfig) -> DrawResult<Vec<PathBuf>> {
    fs::create_dir_all(&config.output_dir)?;
    let data = PlotData::from_dataset(labeled)?;
    let dir = config.output_dir.as_path();
    let mut written = Vec::new();

    for var in SurveyRecord::binary_vars() {
        let path = dir.join(format!("distribution_{}.svg", slug(var)));
        distribution_by_level(&data, var, &path, config.chart)?;
        written.push(path);
    }

    for (first, second) in HISTOGRAM_PAIRS {
        let path = dir.join(format!("distribution_{}_vs_{}.svg", slug(first), slug(second)));
        overlaid_distribution(&data, first, second, &path, config.chart)?;
        written.push(path);
    }

    let correlation = grouped_correlation(labeled)?;
    let path = dir.join("correlation_heatmap.svg");
    correlation_heatmap(&correlation, &path, config.heatmap)?;
    written.push(path);

    let path = dir.join("pairplot.svg");
    pairplot(&data, &path, config.pairplot_side)?;
    written.push(path);

    for var in SurveyRecord::binary_vars() {
        let path = dir.join(format!("boxplot_{}.svg", slug(var)));
        boxplot_by_level(&data, var, &path, config.chart)?;
        written.push(path);
    }

    for (x_var, y_var) in BOXPLOT_PAIRS {
        let path = dir.join(format!("boxplot_{}_vs_{}.svg", slug(x_var), slug(y_var)));
        paired_boxplot(&data, x_var, y_var, &path, config.chart)?;
        written.push(path);
    }

    info!("rendered {} charts into {:?}", written.len(), dir);
    Ok(written)
}

/// Counts of 0 and 1 for one variable, stacked by stress level.
pub fn distribution_by_level(data: &PlotData, var: &str, path: &Path, size: Size) -> DrawResult<()> {
    let values = data.column(var)?;
    let stack: Vec<[usize; 2]> = StressLevel::ALL
        .iter()
        .map(|&level| [data.count(values, level, 0), data.count(values, level, 1)])
        .collect();
    let tallest = (0..2)
        .map(|x| stack.iter().map(|counts| counts[x]).sum::<usize>())
        .max()
        .unwrap_or(0);

    let root = SVGBackend::new(path, size.pair()).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {var} by Stress Level"), (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..1.5f64, 0f64..(tallest.max(1) as f64 * 1.1))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(5)
        .x_label_formatter(&binary_tick)
        .x_desc(var)
        .y_desc("Count")
        .draw()?;

    let mut base = [0usize; 2];
    for (level, counts) in StressLevel::ALL.iter().zip(&stack) {
        let color = level_color(*level);
        let bars: Vec<Rectangle<(f64, f64)>> = (0..2)
            .map(|x| {
                let bottom = base[x] as f64;
                let top = (base[x] + counts[x]) as f64;
                base[x] += counts[x];
                Rectangle::new(
                    [(x as f64 - 0.4, bottom), (x as f64 + 0.4, top)],
                    color.filled(),
                )
            })
            .collect();
        chart
            .draw_series(bars)?
            .label(level.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    debug!("wrote {:?}", path);
    Ok(())
}

/// Two variables' 0/1 counts drawn over each other.
pub fn overlaid_distribution(
    data: &PlotData,
    first: &str,
    second: &str,
    path: &Path,
    size: Size,
) -> DrawResult<()> {
    let series = [(first, BLUE), (second, GREEN)];
    let counts: Vec<[usize; 2]> = series
        .iter()
        .map(|(var, _)| {
            let values = data.column(var)?;
            let zeros = values.iter().filter(|v| **v == Some(0)).count();
            let ones = values.iter().filter(|v| **v == Some(1)).count();
            Ok([zeros, ones])
        })
        .collect::<DrawResult<_>>()?;
    let tallest = counts.iter().flatten().copied().max().unwrap_or(0);

    let root = SVGBackend::new(path, size.pair()).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Distribution of {first} and {second}"), (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..1.5f64, 0f64..(tallest.max(1) as f64 * 1.1))?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(5)
        .x_label_formatter(&binary_tick)
        .y_desc("Count")
        .draw()?;

    for ((var, color), counts) in series.iter().zip(&counts) {
        let style = color.mix(0.5).filled();
        let bars = (0..2).map(|x| {
            Rectangle::new(
                [(x as f64 - 0.4, 0.0), (x as f64 + 0.4, counts[x] as f64)],
                style,
            )
        });
        chart
            .draw_series(bars)?
            .label(*var)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    debug!("wrote {:?}", path);
    Ok(())
}

/// Stacked per-level correlation matrices with two-decimal annotations.
pub fn correlation_heatmap(correlation: &GroupedCorrelation, path: &Path, size: Size) -> DrawResult<()> {
    let rows = correlation.stacked_rows();
    let row_labels = correlation.row_labels();
    let n_rows = rows.len().max(1);
    let n_cols = correlation.variables.len().max(1);

    let canvas = SVGBackend::new(path, size.pair()).into_drawing_area();
    canvas.fill(&WHITE)?;
    let root = canvas.titled(
        "Correlation Matrix Heatmap for Binary Variables by Stress Level",
        (FONT, 24),
    )?;
    let (grid_area, bar_area) = root.split_horizontally(size.width as i32 - 140);

    let mut chart = ChartBuilder::on(&grid_area)
        .margin(10)
        .x_label_area_size(80)
        .y_label_area_size(280)
        .build_cartesian_2d(0f64..n_cols as f64, 0f64..n_rows as f64)?;

    // First stacked row at the top.
    let top_down = |r: usize| (n_rows - 1 - r) as f64;

    chart.draw_series(rows.iter().enumerate().flat_map(|(r, row)| {
        row.iter().enumerate().map(move |(c, value)| {
            let fill = value.map(coolwarm).unwrap_or(UNDEFINED);
            let y = top_down(r);
            Rectangle::new([(c as f64, y), (c as f64 + 1.0, y + 1.0)], fill.filled())
        })
    }))?;
    chart.draw_series(rows.iter().enumerate().flat_map(|(r, row)| {
        row.iter().enumerate().filter_map(move |(c, value)| {
            value.map(|v| {
                Text::new(
                    format!("{v:.2}"),
                    (c as f64 + 0.5, top_down(r) + 0.5),
                    annotation_style(v),
                )
            })
        })
    }))?;

    // Axis labels are placed in absolute pixels so they line up with cell centers.
    for (c, var) in correlation.variables.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(c as f64 + 0.5, 0.0));
        canvas.draw(&Text::new(var.clone(), (px, py + 20), centered(13)))?;
    }
    let right_aligned =
        TextStyle::from((FONT, 13).into_font()).pos(Pos::new(HPos::Right, VPos::Center));
    for (r, label) in row_labels.iter().enumerate() {
        let (px, py) = chart.backend_coord(&(0.0, top_down(r) + 0.5));
        canvas.draw(&Text::new(label.clone(), (px - 8, py), right_aligned.clone()))?;
    }

    let mut bar = ChartBuilder::on(&bar_area)
        .margin_top(40)
        .margin_bottom(100)
        .margin_right(20)
        .y_label_area_size(45)
        .build_cartesian_2d(0f64..1f64, -1f64..1f64)?;
    bar.configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_labels(5)
        .draw()?;
    let steps = 100;
    bar.draw_series((0..steps).map(|i| {
        let low = -1.0 + 2.0 * i as f64 / steps as f64;
        let high = low + 2.0 / steps as f64;
        Rectangle::new([(0.0, low), (1.0, high)], coolwarm((low + high) / 2.0).filled())
    }))?;

    canvas.present()?;
    debug!("wrote {:?}", path);
    Ok(())
}

/// Grid of every variable against every other, colored by stress level.
///
/// Off-diagonal cells show one dot per (x, y, level) combination sized by its
/// count; diagonal cells show per-level counts of 0 and 1.
pub fn pairplot(data: &PlotData, path: &Path, side: u32) -> DrawResult<()> {
    let vars: Vec<&str> = data.columns.iter().map(|(name, _)| name.as_str()).collect();
    let n = vars.len();

    let root = SVGBackend::new(path, (side, side)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Pairplot for Binary Variables (Yes/No) by Stress Level", (FONT, 24))?;
    let cells = root.split_evenly((n, n));
    let offsets = [-0.15, 0.0, 0.15];

    for (index, cell) in cells.iter().enumerate() {
        let (row, col) = (index / n, index % n);
        let y_values = data.column(vars[row])?;
        let x_values = data.column(vars[col])?;

        if row == col {
            let tallest = StressLevel::ALL
                .iter()
                .flat_map(|&level| (0..2).map(move |v| (level, v)))
                .map(|(level, v)| data.count(x_values, level, v))
                .max()
                .unwrap_or(0);
            let mut chart = ChartBuilder::on(cell)
                .margin(4)
                .x_label_area_size(if row == n - 1 { 30 } else { 4 })
                .y_label_area_size(if col == 0 { 40 } else { 4 })
                .build_cartesian_2d(-0.5f64..1.5f64, 0f64..(tallest.max(1) as f64 * 1.1))?;
            let mut mesh = chart.configure_mesh();
            mesh.disable_mesh().x_labels(5).x_label_formatter(&binary_tick);
            if row == n - 1 {
                mesh.x_desc(vars[col]);
            }
            if col == 0 {
                mesh.y_desc(vars[row]);
            }
            mesh.draw()?;

            for (level, offset) in StressLevel::ALL.iter().zip(offsets) {
                let color = level_color(*level);
                let bars = (0..2).map(|v| {
                    let x = v as f64 + offset;
                    let height = data.count(x_values, *level, v) as f64;
                    Rectangle::new([(x - 0.07, 0.0), (x + 0.07, height)], color.mix(0.8).filled())
                });
                let anno = chart.draw_series(bars)?;
                if index == 0 {
                    anno.label(level.label()).legend(move |(x, y)| {
                        Rectangle::new([(x, y - 4), (x + 8, y + 4)], color.filled())
                    });
                }
            }
            if index == 0 {
                chart
                    .configure_series_labels()
                    .background_style(&WHITE.mix(0.8))
                    .label_font((FONT, 10))
                    .draw()?;
            }
            continue;
        }

        let mut chart = ChartBuilder::on(cell)
            .margin(4)
            .x_label_area_size(if row == n - 1 { 30 } else { 4 })
            .y_label_area_size(if col == 0 { 40 } else { 4 })
            .build_cartesian_2d(-0.5f64..1.5f64, -0.5f64..1.5f64)?;
        let mut mesh = chart.configure_mesh();
        mesh.disable_mesh()
            .x_labels(5)
            .y_labels(5)
            .x_label_formatter(&binary_tick)
            .y_label_formatter(&binary_tick);
        if row == n - 1 {
            mesh.x_desc(vars[col]);
        }
        if col == 0 {
            mesh.y_desc(vars[row]);
        }
        mesh.draw()?;

        let total = data.levels.len().max(1) as f64;
        for (level, offset) in StressLevel::ALL.iter().zip(offsets) {
            let color = level_color(*level);
            let mut dots = Vec::new();
            for x in 0..2 {
                for y in 0..2 {
                    let hits = data
                        .levels
                        .iter()
                        .zip(x_values.iter().zip(y_values))
                        .filter(|(l, (xv, yv))| {
                            **l == *level && **xv == Some(x) && **yv == Some(y)
                        })
                        .count();
                    if hits > 0 {
                        let radius = 2 + (12.0 * (hits as f64 / total).sqrt()) as i32;
                        dots.push(Circle::new(
                            (x as f64 + offset, y as f64),
                            radius,
                            color.mix(0.7).filled(),
                        ));
                    }
                }
            }
            chart.draw_series(dots)?;
        }
    }

    root.present()?;
    debug!("wrote {:?}", path);
    Ok(())
}

/// Shapes of one box: body, median/whisker lines, outlier dots.
struct BoxShapes {
    bodies: Vec<Rectangle<(f64, f64)>>,
    lines: Vec<PathElement<(f64, f64)>>,
    outliers: Vec<Circle<(f64, f64), i32>>,
}

/// Build a box at `center` on the category axis; `horizontal` puts values on x.
fn box_shapes(stats: &BoxStats, center: f64, half_width: f64, color: RGBColor, horizontal: bool) -> BoxShapes {
    let pt = |value: f64, pos: f64| if horizontal { (value, pos) } else { (pos, value) };
    let (lo, hi) = (center - half_width, center + half_width);
    let edge = BLACK.stroke_width(1);

    BoxShapes {
        bodies: vec![
            Rectangle::new([pt(stats.q1, lo), pt(stats.q3, hi)], color.mix(0.6).filled()),
            Rectangle::new([pt(stats.q1, lo), pt(stats.q3, hi)], edge),
        ],
        lines: vec![
            PathElement::new(vec![pt(stats.median, lo), pt(stats.median, hi)], BLACK.stroke_width(2)),
            PathElement::new(vec![pt(stats.lower_whisker, center), pt(stats.q1, center)], edge),
            PathElement::new(vec![pt(stats.q3, center), pt(stats.upper_whisker, center)], edge),
            PathElement::new(
                vec![pt(stats.lower_whisker, center - half_width / 2.0), pt(stats.lower_whisker, center + half_width / 2.0)],
                edge,
            ),
            PathElement::new(
                vec![pt(stats.upper_whisker, center - half_width / 2.0), pt(stats.upper_whisker, center + half_width / 2.0)],
                edge,
            ),
        ],
        outliers: stats
            .outliers
            .iter()
            .map(|&v| Circle::new(pt(v, center), 3, edge))
            .collect(),
    }
}

/// One horizontal box per stress level for a single variable.
pub fn boxplot_by_level(data: &PlotData, var: &str, path: &Path, size: Size) -> DrawResult<()> {
    let values = data.column(var)?;

    let root = SVGBackend::new(path, size.pair()).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Boxplot for {var} by Stress Level"), (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d(-0.25f64..1.25f64, -0.5f64..2.5f64)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_labels(7)
        .y_labels(7)
        .x_label_formatter(&binary_tick)
        .y_label_formatter(&level_tick)
        .x_desc(var)
        .y_desc("Stress Level")
        .draw()?;

    for level in StressLevel::ALL {
        let Some(stats) = box_stats(&data.values_for(values, level)) else {
            continue;
        };
        let shapes = box_shapes(&stats, level_position(level), 0.3, level_color(level), true);
        chart.draw_series(shapes.bodies)?;
        chart.draw_series(shapes.lines)?;
        chart.draw_series(shapes.outliers)?;
    }

    root.present()?;
    debug!("wrote {:?}", path);
    Ok(())
}

/// Boxes of `y_var` for each value of `x_var`, split by stress level.
pub fn paired_boxplot(data: &PlotData, x_var: &str, y_var: &str, path: &Path, size: Size) -> DrawResult<()> {
    let xs = data.column(x_var)?;
    let ys = data.column(y_var)?;

    let root = SVGBackend::new(path, size.pair()).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(format!("Boxplot for {x_var} vs. {y_var} by Stress Level"), (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..1.5f64, -0.25f64..1.25f64)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(5)
        .y_labels(7)
        .x_label_formatter(&binary_tick)
        .y_label_formatter(&binary_tick)
        .x_desc(x_var)
        .y_desc(y_var)
        .draw()?;

    let offsets = [-0.27, 0.0, 0.27];
    for (level, offset) in StressLevel::ALL.iter().zip(offsets) {
        let color = level_color(*level);
        let mut first = true;
        for x in 0..2 {
            let values: Vec<f64> = data
                .levels
                .iter()
                .zip(xs.iter().zip(ys))
                .filter(|(l, (xv, _))| **l == *level && **xv == Some(x))
                .filter_map(|(_, (_, yv))| yv.map(f64::from))
                .collect();
            let Some(stats) = box_stats(&values) else {
                continue;
            };
            let shapes = box_shapes(&stats, x as f64 + offset, 0.11, color, false);
            let anno = chart.draw_series(shapes.bodies)?;
            if first {
                anno.label(level.label()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
                first = false;
            }
            chart.draw_series(shapes.lines)?;
            chart.draw_series(shapes.outliers)?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    root.present()?;
    debug!("wrote {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_are_file_friendly() {
        assert_eq!(slug("Time Management"), "time_management");
        assert_eq!(slug("Attendance"), "attendance");
    }

    #[test]
    fn binary_ticks_name_only_zero_and_one() {
        assert_eq!(binary_tick(&0.0), "0");
        assert_eq!(binary_tick(&1.0000001), "1");
        assert_eq!(binary_tick(&0.5), "");
        assert_eq!(binary_tick(&-0.5), "");
        assert_eq!(binary_tick(&2.0), "");
    }

    #[test]
    fn level_ticks_follow_positions() {
        for level in StressLevel::ALL {
            assert_eq!(level_tick(&level_position(level)), level.label());
        }
        assert_eq!(level_tick(&1.5), "");
    }
}
