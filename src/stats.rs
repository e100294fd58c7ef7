//! Descriptive statistics over a labeled dataset.

use crate::classifier::StressLevel;
use crate::error::Result;
use crate::prepare::LabeledDataset;
use crate::records::SurveyRecord;
use polars::prelude::DataFrame;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<i32>,
    pub max: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelCount {
    pub level: StressLevel,
    pub respondents: usize,
}

/// Correlations among the binarized variables for the respondents of one level.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationBlock {
    pub level: StressLevel,
    pub respondents: usize,
    /// `matrix[i][j]` pairs `variables[i]` with `variables[j]`.
    pub matrix: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedCorrelation {
    pub variables: Vec<String>,
    pub blocks: Vec<CorrelationBlock>,
}

impl GroupedCorrelation {
    /// Row labels of the stacked matrix, `"<level> / <variable>"`.
    pub fn row_labels(&self) -> Vec<String> {
        self.blocks
            .iter()
            .flat_map(|block| {
                self.variables
                    .iter()
                    .map(move |var| format!("{} / {}", block.level, var))
            })
            .collect()
    }

    /// Blocks stacked vertically, one row per (level, variable).
    pub fn stacked_rows(&self) -> Vec<&[Option<f64>]> {
        self.blocks
            .iter()
            .flat_map(|block| block.matrix.iter().map(|row| row.as_slice()))
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub levels: Vec<LevelCount>,
    pub columns: Vec<ColumnSummary>,
    pub correlation: GroupedCorrelation,
}

pub fn preview(labeled: &LabeledDataset, rows: usize) -> DataFrame {
    labeled.frame().head(Some(rows))
}

pub fn missing_counts(labeled: &LabeledDataset) -> Vec<(String, usize)> {
    labeled
        .frame()
        .get_columns()
        .iter()
        .map(|series| (series.name().to_string(), series.null_count()))
        .collect()
}

pub fn describe(labeled: &LabeledDataset) -> Result<Vec<ColumnSummary>> {
    SurveyRecord::binary_vars()
        .into_iter()
        .map(|var| {
            let values = labeled.binary_column(var)?;
            Ok(summarize(var, &values))
        })
        .collect()
}

fn summarize(name: &str, values: &[Option<i32>]) -> ColumnSummary {
    let present: Vec<i32> = values.iter().flatten().copied().collect();
    let as_f64: Vec<f64> = present.iter().map(|&v| f64::from(v)).collect();
    ColumnSummary {
        name: name.to_string(),
        count: present.len(),
        missing: values.len() - present.len(),
        mean: mean(&as_f64),
        std: sample_std(&as_f64),
        min: present.iter().min().copied(),
        max: present.iter().max().copied(),
    }
}

pub fn level_counts(levels: &[StressLevel]) -> Vec<LevelCount> {
    StressLevel::ALL
        .into_iter()
        .map(|level| LevelCount {
            level,
            respondents: levels.iter().filter(|&&l| l == level).count(),
        })
        .collect()
}

fn mean(v: &[f64]) -> Option<f64> {
    if v.is_empty() {
        None
    } else {
        Some(v.iter().sum::<f64>() / v.len() as f64)
    }
}

fn sample_std(v: &[f64]) -> Option<f64> {
    if v.len() < 2 {
        return None;
    }
    let m = mean(v)?;
    let var = v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (v.len() - 1) as f64;
    Some(var.sqrt())
}

/// Pearson correlation over pairwise-complete observations.
///
/// `None` when fewer than two complete pairs exist or either side is constant.
pub fn pearson(xs: &[Option<i32>], ys: &[Option<i32>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter_map(|(x, y)| Some((f64::from((*x)?), f64::from((*y)?))))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;
    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let (dx, dy) = (x - mean_x, y - mean_y);
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Correlation matrices of the binarized variables, one per stress level present.
pub fn grouped_correlation(labeled: &LabeledDataset) -> Result<GroupedCorrelation> {
    let variables = SurveyRecord::binary_vars();
    let levels = labeled.levels()?;
    let columns = variables
        .iter()
        .map(|var| labeled.binary_column(var))
        .collect::<Result<Vec<_>>>()?;

    let mut blocks = Vec::new();
    for level in StressLevel::ALL {
        let rows: Vec<usize> = levels
            .iter()
            .enumerate()
            .filter(|(_, l)| **l == level)
            .map(|(i, _)| i)
            .collect();
        if rows.is_empty() {
            continue;
        }

        let subset: Vec<Vec<Option<i32>>> = columns
            .iter()
            .map(|column| rows.iter().map(|&i| column[i]).collect())
            .collect();
        let matrix = subset
            .iter()
            .map(|x| subset.iter().map(|y| pearson(x, y)).collect())
            .collect();

        blocks.push(CorrelationBlock {
            level,
            respondents: rows.len(),
            matrix,
        });
    }

    Ok(GroupedCorrelation {
        variables: variables.into_iter().map(String::from).collect(),
        blocks,
    })
}

/// Box-and-whisker summary with whiskers at 1.5 IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Linearly interpolated quantile of already sorted values.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let (lo, hi) = (pos.floor() as usize, pos.ceil() as usize);
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = 1.5 * (q3 - q1);
    let inside = |v: &&f64| **v >= q1 - reach && **v <= q3 + reach;

    Some(BoxStats {
        q1,
        median,
        q3,
        lower_whisker: sorted.iter().find(inside).copied().unwrap_or(q1),
        upper_whisker: sorted.iter().rev().find(inside).copied().unwrap_or(q3),
        outliers: sorted.iter().filter(|v| !inside(v)).copied().collect(),
    })
}

pub fn summarize_dataset(labeled: &LabeledDataset) -> Result<DatasetSummary> {
    let levels = labeled.levels()?;
    Ok(DatasetSummary {
        rows: labeled.height(),
        levels: level_counts(&levels),
        columns: describe(labeled)?,
        correlation: grouped_correlation(labeled)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Option<f64>, b: f64) -> bool {
        a.map(|a| (a - b).abs() < 1e-9).unwrap_or(false)
    }

    #[test]
    fn pearson_of_identical_and_opposite_columns() {
        let x = [Some(1), Some(0), Some(1), Some(0)];
        let y = [Some(0), Some(1), Some(0), Some(1)];
        assert!(close(pearson(&x, &x), 1.0));
        assert!(close(pearson(&x, &y), -1.0));
    }

    #[test]
    fn pearson_skips_incomplete_pairs() {
        let x = [Some(1), None, Some(0), Some(1)];
        let y = [Some(1), Some(0), Some(0), Some(1)];
        assert!(close(pearson(&x, &y), 1.0));
    }

    #[test]
    fn pearson_is_undefined_for_constant_or_tiny_input() {
        assert_eq!(pearson(&[Some(1), Some(1)], &[Some(0), Some(1)]), None);
        assert_eq!(pearson(&[Some(1)], &[Some(0)]), None);
        assert_eq!(pearson(&[None, None], &[Some(0), Some(1)]), None);
    }

    #[test]
    fn summary_of_a_column_with_gaps() {
        let s = summarize("Interaction", &[Some(1), Some(0), None, Some(1)]);
        assert_eq!(s.count, 3);
        assert_eq!(s.missing, 1);
        assert!(close(s.mean, 2.0 / 3.0));
        assert!(close(s.std, (1.0f64 / 3.0).sqrt()));
        assert_eq!((s.min, s.max), (Some(0), Some(1)));
    }

    #[test]
    fn box_stats_of_mostly_yes_answers() {
        let b = box_stats(&[1.0, 1.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!((b.q1, b.median, b.q3), (1.0, 1.0, 1.0));
        assert_eq!((b.lower_whisker, b.upper_whisker), (1.0, 1.0));
        assert_eq!(b.outliers, vec![0.0]);
    }

    #[test]
    fn box_stats_interpolates_quartiles() {
        let b = box_stats(&[0.0, 1.0, 0.0, 1.0]).unwrap();
        assert_eq!((b.q1, b.median, b.q3), (0.0, 0.5, 1.0));
        assert_eq!((b.lower_whisker, b.upper_whisker), (0.0, 1.0));
        assert!(b.outliers.is_empty());
        assert_eq!(box_stats(&[]), None);
    }

    #[test]
    fn level_counts_cover_all_levels() {
        let counts = level_counts(&[StressLevel::Low, StressLevel::Low, StressLevel::High]);
        let flat: Vec<(StressLevel, usize)> =
            counts.iter().map(|c| (c.level, c.respondents)).collect();
        assert_eq!(
            flat,
            vec![
                (StressLevel::High, 1),
                (StressLevel::Medium, 0),
                (StressLevel::Low, 2)
            ]
        );
    }
}
