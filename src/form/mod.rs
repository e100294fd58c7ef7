//! State and actions behind the two-tab stress form.
//!
//! The controller owns everything the form shows. Loading a file produces an
//! immutable [`FileSelection`] which the compute action consumes; any failure
//! of the compute action goes through [`ErrorDialog::from_failure`].

pub mod tui;

use crate::classifier::{classify_answers, Answer, StressLevel};
use crate::config::ReportConfig;
use crate::error::{Result, SurveyError};
use crate::prepare::{load_and_prepare, LabeledDataset};
use crate::records::INTERACTIVE_QUESTIONS;
use crate::report::correlation_heatmap;
use crate::stats::{grouped_correlation, GroupedCorrelation};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub static HEATMAP_FILE: &str = "correlation_heatmap.svg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Predict,
    Analyze,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Predict => "Predict Stress Level",
            Tab::Analyze => "Analyze CSV File",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Predict => Tab::Analyze,
            Tab::Analyze => Tab::Predict,
        }
    }
}

/// One Yes/No choice per interactive question, every choice starting at "No".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Questionnaire {
    answers: Vec<Answer>,
}

impl Default for Questionnaire {
    fn default() -> Self {
        Self {
            answers: vec![Answer::default(); INTERACTIVE_QUESTIONS.len()],
        }
    }
}

impl Questionnaire {
    pub fn questions(&self) -> &'static [&'static str] {
        &INTERACTIVE_QUESTIONS
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    /// Out-of-range indices are ignored; the form never offers them.
    pub fn set(&mut self, index: usize, answer: Answer) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = answer;
        }
    }

    pub fn toggle(&mut self, index: usize) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = slot.toggled();
        }
    }

    pub fn level(&self) -> StressLevel {
        classify_answers(&self.answers)
    }

    pub fn submit(&self) -> String {
        format!("Your predicted stress level is: {}", self.level())
    }
}

/// A CSV file picked through the load action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    path: PathBuf,
}

impl FileSelection {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !is_csv(&path) {
            return Err(SurveyError::NotCsv { path });
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// CSV files directly inside `dir`, sorted by name; what the file chooser offers.
pub fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| SurveyError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && is_csv(path))
        .collect();
    files.sort();
    Ok(files)
}

/// Result of a successful compute action.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub source: PathBuf,
    pub dataset: LabeledDataset,
    pub correlation: GroupedCorrelation,
    pub heatmap: PathBuf,
}

/// Modal message shown for any failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: String,
    pub message: String,
}

impl ErrorDialog {
    pub fn from_failure(err: &SurveyError) -> Self {
        Self {
            title: "Error".to_string(),
            message: format!("Error in calculating stress levels: {err}"),
        }
    }
}

pub async fn calculate_and_visualize(
    selection: &FileSelection,
    config: &ReportConfig,
) -> Result<AnalysisOutcome> {
    let dataset = load_and_prepare(selection.path()).await?;
    let correlation = grouped_correlation(&dataset)?;

    fs::create_dir_all(&config.output_dir).map_err(|source| SurveyError::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    let heatmap = config.output_dir.join(HEATMAP_FILE);
    correlation_heatmap(&correlation, &heatmap, config.heatmap).map_err(SurveyError::render)?;

    Ok(AnalysisOutcome {
        source: selection.path().to_path_buf(),
        dataset,
        correlation,
        heatmap,
    })
}

#[derive(Debug)]
pub struct FormController {
    config: ReportConfig,
    pub tab: Tab,
    pub questionnaire: Questionnaire,
    selection: Option<FileSelection>,
    outcome: Option<AnalysisOutcome>,
    readout: String,
    dialog: Option<ErrorDialog>,
}

impl FormController {
    pub fn new(config: ReportConfig) -> Self {
        Self {
            config,
            tab: Tab::default(),
            questionnaire: Questionnaire::default(),
            selection: None,
            outcome: None,
            readout: String::new(),
            dialog: None,
        }
    }

    pub fn selection(&self) -> Option<&FileSelection> {
        self.selection.as_ref()
    }

    pub fn outcome(&self) -> Option<&AnalysisOutcome> {
        self.outcome.as_ref()
    }

    pub fn readout(&self) -> &str {
        &self.readout
    }

    pub fn dialog(&self) -> Option<&ErrorDialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    /// Submit action of the questionnaire tab.
    pub fn predict_stress_level(&mut self) -> StressLevel {
        self.readout = self.questionnaire.submit();
        self.questionnaire.level()
    }

    /// Load action of the analysis tab.
    pub fn load_csv_file(&mut self, path: impl Into<PathBuf>) {
        match FileSelection::new(path) {
            Ok(selection) => {
                info!("selected {:?}", selection.path());
                self.selection = Some(selection);
            }
            Err(err) => self.fail(err),
        }
    }

    /// Compute action of the analysis tab. A failure keeps the previous outcome.
    pub async fn calculate_and_visualize(&mut self) {
        let result = match &self.selection {
            Some(selection) => calculate_and_visualize(selection, &self.config).await,
            None => Err(SurveyError::NoFileSelected),
        };
        match result {
            Ok(outcome) => {
                info!(
                    "analysed {} respondents, heatmap at {:?}",
                    outcome.dataset.height(),
                    outcome.heatmap
                );
                self.outcome = Some(outcome);
            }
            Err(err) => self.fail(err),
        }
    }

    fn fail(&mut self, err: SurveyError) {
        warn!("form action failed: {err}");
        self.dialog = Some(ErrorDialog::from_failure(&err));
    }
}
