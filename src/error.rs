use polars::prelude::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("missing expected column {column:?}")]
    ColumnMissing { column: String },
    #[error("cannot read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("not a CSV file {path:?}")]
    NotCsv { path: PathBuf },
    #[error("no CSV file selected")]
    NoFileSelected,
    #[error("invalid stress level {value:?} in labeled data")]
    InvalidLabel { value: String },
    #[error("rendering failed: {message}")]
    Render { message: String },
    #[error("invalid config {path:?}: {message}")]
    Config { path: PathBuf, message: String },
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl SurveyError {
    pub fn render(err: impl std::fmt::Display) -> Self {
        SurveyError::Render {
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = SurveyError> = std::result::Result<T, E>;
