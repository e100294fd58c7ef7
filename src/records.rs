use lazy_static::lazy_static;
use polars::prelude::{DataType, Field, Schema};
use std::collections::HashMap;

/// Name of the derived column appended to every labeled dataset.
pub static STRESS_LEVEL: &str = "Stress Level";

/// A survey question as it appears in the CSV header, plus its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Question {
    pub long: &'static str,
    pub short: &'static str,
}

/// The six answer columns of the survey export, in plotting order.
///
/// Header strings are matched verbatim, including the double space in the
/// financial question.
pub static DATASET_QUESTIONS: [Question; 6] = [
    Question {
        long: "Do you feel academic pressure?",
        short: "Academic Pressure",
    },
    Question {
        long: "Do you feel financial  stress?",
        short: "Financial Stress",
    },
    Question {
        long: "Are you getting enough sleep(7 - 8hrs per day)?",
        short: "Sleep Stress",
    },
    Question {
        long: "Do you feel stress due to poor Time Management?",
        short: "Time Management",
    },
    Question {
        long: "Do you feel stress due to lack of interaction in classroom?",
        short: "Interaction",
    },
    Question {
        long: "Do you feel stress due to the tight deadlines of college assignments and strict attendance?",
        short: "Attendance",
    },
];

/// Questions asked when a single respondent fills the questionnaire.
pub static INTERACTIVE_QUESTIONS: [&str; 5] = [
    "Do you feel academic pressure?",
    "Do you feel financial stress?",
    "Are you not getting enough sleep (7 - 8 hrs per day)?",
    "Do you feel stress due to poor time management?",
    "Do you feel stress due to lack of interaction in the classroom?",
];

lazy_static! {
    /// Long header text -> short display label.
    pub static ref SHORT_LABELS: HashMap<&'static str, &'static str> = DATASET_QUESTIONS
        .iter()
        .map(|q| (q.long, q.short))
        .collect();
}

pub struct SurveyRecord {}

impl SurveyRecord {
    /// Types the answer columns must have before scoring.
    pub fn answer_schema() -> Schema {
        Schema::from_iter(
            DATASET_QUESTIONS
                .iter()
                .map(|q| Field::new(q.long, DataType::Utf8)),
        )
    }

    /// Short labels of the binarized columns, in plotting order.
    pub fn binary_vars() -> Vec<&'static str> {
        DATASET_QUESTIONS.iter().map(|q| q.short).collect()
    }

    pub fn short_label(long: &str) -> Option<&'static str> {
        SHORT_LABELS.get(long).copied()
    }
}
