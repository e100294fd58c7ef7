//! Report settings.
//!
//! The question set and the classification thresholds are fixed in code; only
//! where and how large the plots are drawn can be changed, through an optional
//! TOML file:
//!
//! ```toml
//! output_dir = "plots"
//!
//! [chart]
//! width = 800
//! height = 600
//! ```

use crate::error::{Result, SurveyError};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub static DEFAULT_INPUT: &str = "stress.csv";
pub static DEFAULT_OUTPUT_DIR: &str = "plots";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory that receives the rendered SVG files
    pub output_dir: PathBuf,
    /// Single-variable charts (distributions, boxplots)
    pub chart: Size,
    /// Grouped correlation heatmap
    pub heatmap: Size,
    /// Side length of the square pairplot grid
    pub pairplot_side: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn pair(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart: Size {
                width: 800,
                height: 600,
            },
            heatmap: Size {
                width: 1200,
                height: 1000,
            },
            pairplot_side: 1200,
        }
    }
}

impl ReportConfig {
    pub fn from_toml_str(raw: &str, path: &Path) -> Result<Self> {
        toml::from_str(raw).map_err(|e| SurveyError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| SurveyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw, path)
    }

    /// Defaults, or the given file when one is passed.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_output_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.output_dir = dir;
        }
        self
    }
}
