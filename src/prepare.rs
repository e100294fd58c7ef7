//! Loading survey exports and turning them into a labeled, binarized dataset.
//!
//! ```text
//!  stress.csv ──read_csv──▶ DataFrame ──prepare──▶ LabeledDataset
//!                                        │
//!                                        ├─ check the six question columns
//!                                        ├─ append "Stress Level"
//!                                        ├─ rename long headers to short labels
//!                                        └─ map Yes/No to 1/0 (anything else -> null)
//! ```

use crate::classifier::{classify, StressLevel, NO, YES};
use crate::error::{Result, SurveyError};
use crate::records::{SurveyRecord, DATASET_QUESTIONS, STRESS_LEVEL};
use log::{debug, info};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

pub async fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| SurveyError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let df = CsvReader::new(file).has_header(true).finish()?;
    info!("loaded {} rows x {} columns from {:?}", df.height(), df.width(), path);
    Ok(df)
}

pub async fn load_and_prepare<P: AsRef<Path>>(path: P) -> Result<LabeledDataset> {
    let df = read_csv(path).await?;
    prepare(df)
}

/// A survey table with its derived "Stress Level" column and binarized answers.
#[derive(Debug, Clone)]
pub struct LabeledDataset {
    frame: DataFrame,
}

impl LabeledDataset {
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn levels(&self) -> Result<Vec<StressLevel>> {
        let labels = self.frame.column(STRESS_LEVEL)?.utf8()?;
        labels
            .into_iter()
            .map(|value| {
                let value = value.unwrap_or_default();
                value.parse::<StressLevel>().map_err(|_| SurveyError::InvalidLabel {
                    value: value.to_string(),
                })
            })
            .collect()
    }

    /// Values of one binarized column; `None` marks an answer that was neither Yes nor No.
    pub fn binary_column(&self, label: &str) -> Result<Vec<Option<i32>>> {
        Ok(self.frame.column(label)?.i32()?.into_iter().collect())
    }
}

/// Run the whole preparation on a freshly loaded table.
///
/// All question columns are checked before anything is modified, so a
/// `ColumnMissing` failure never yields a partially transformed table.
pub fn prepare(mut df: DataFrame) -> Result<LabeledDataset> {
    ensure_columns(&df, DATASET_QUESTIONS.iter().map(|q| q.long))?;

    label_stress_levels(&mut df)?;
    rename_to_short_labels(&mut df)?;
    binarize(&mut df)?;

    debug!("prepared dataset columns: {:?}", df.get_column_names());
    Ok(LabeledDataset { frame: df })
}

pub fn ensure_columns<'a, I>(df: &DataFrame, columns: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let present = df.get_column_names();
    for column in columns {
        if !present.contains(&column) {
            return Err(SurveyError::ColumnMissing {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Append (or replace) the "Stress Level" column, scoring each row's question cells.
pub fn label_stress_levels(df: &mut DataFrame) -> Result<()> {
    let schema = SurveyRecord::answer_schema();
    ensure_columns(df, schema.iter_names().map(|name| name.as_str()))?;

    // Casting string to string is a no-op; other inferred types become text and never match "Yes".
    let answers = schema
        .iter()
        .map(|(name, dtype)| df.column(name.as_str())?.cast(dtype))
        .collect::<PolarsResult<Vec<Series>>>()?;
    let answers = answers
        .iter()
        .map(|series| series.utf8())
        .collect::<PolarsResult<Vec<&Utf8Chunked>>>()?;

    let mut rows: Vec<Vec<&str>> = vec![Vec::with_capacity(answers.len()); df.height()];
    for column in answers.iter().copied() {
        for (row, cell) in rows.iter_mut().zip(column) {
            row.push(cell.unwrap_or_default());
        }
    }
    let levels: Vec<&str> = rows.iter().map(|row| classify(row).label()).collect();

    df.with_column(Series::new(STRESS_LEVEL, levels))?;
    Ok(())
}

pub fn rename_to_short_labels(df: &mut DataFrame) -> Result<()> {
    for question in DATASET_QUESTIONS.iter() {
        ensure_columns(df, [question.long])?;
        df.rename(question.long, question.short)?;
    }
    Ok(())
}

/// Replace each short-labelled answer column with 1 for "Yes", 0 for "No", null otherwise.
pub fn binarize(df: &mut DataFrame) -> Result<()> {
    let binary_vars = SurveyRecord::binary_vars();
    ensure_columns(df, binary_vars.iter().copied())?;

    let encoded: Vec<Expr> = binary_vars
        .iter()
        .map(|var| {
            col(var)
                .alias(var)
                .apply(encode_answer, GetOutput::from_type(DataType::Int32))
        })
        .collect();
    *df = df.clone().lazy().with_columns(encoded).collect()?;
    Ok(())
}

fn encode_answer(column: Series) -> PolarsResult<Option<Series>> {
    let text = column.cast(&DataType::Utf8)?;
    let encoded: Vec<Option<i32>> = text
        .utf8()?
        .into_iter()
        .map(|value| match value {
            Some(v) if v == YES => Some(1),
            Some(v) if v == NO => Some(0),
            _ => None,
        })
        .collect();
    Ok(Some(Series::new(column.name(), encoded)))
}
