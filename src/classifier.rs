//! Stress level classification of a single respondent row.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The literal value counted as an affirmative answer.
pub const YES: &str = "Yes";
pub const NO: &str = "No";

const HIGH_STRESS_MIN_YES: usize = 4;
const MEDIUM_STRESS_YES: usize = 3;

/// Ordinal stress category derived from the number of "Yes" answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StressLevel {
    High,
    Medium,
    Low,
}

impl StressLevel {
    /// Display order used by reports: most stressed first.
    pub const ALL: [StressLevel; 3] = [StressLevel::High, StressLevel::Medium, StressLevel::Low];

    pub fn from_yes_count(count: usize) -> Self {
        if count >= HIGH_STRESS_MIN_YES {
            StressLevel::High
        } else if count == MEDIUM_STRESS_YES {
            StressLevel::Medium
        } else {
            StressLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StressLevel::High => "High Stress",
            StressLevel::Medium => "Medium Stress",
            StressLevel::Low => "Low Stress",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown stress level {0:?}")]
pub struct UnknownStressLevel(pub String);

impl FromStr for StressLevel {
    type Err = UnknownStressLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StressLevel::ALL
            .into_iter()
            .find(|level| level.label() == s)
            .ok_or_else(|| UnknownStressLevel(s.to_string()))
    }
}

impl Serialize for StressLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Classify a respondent row.
///
/// Only entries exactly equal to `"Yes"` are counted; anything else,
/// including `"yes"` or an empty cell, scores like `"No"`.
pub fn classify<I, S>(row: I) -> StressLevel
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let count = row.into_iter().filter(|answer| answer.as_ref() == YES).count();
    StressLevel::from_yes_count(count)
}

/// A validated answer collected from a person rather than read from a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Answer {
    Yes,
    #[default]
    No,
}

impl Answer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => YES,
            Answer::No => NO,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Answer::Yes => Answer::No,
            Answer::No => Answer::Yes,
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("expected Yes or No, got {0:?}")]
pub struct InvalidAnswer(pub String);

impl FromStr for Answer {
    type Err = InvalidAnswer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(YES) {
            Ok(Answer::Yes)
        } else if trimmed.eq_ignore_ascii_case(NO) {
            Ok(Answer::No)
        } else {
            Err(InvalidAnswer(s.to_string()))
        }
    }
}

/// Classify answers collected interactively, through the same rule as file rows.
pub fn classify_answers(answers: &[Answer]) -> StressLevel {
    classify(answers.iter().map(Answer::as_str))
}
