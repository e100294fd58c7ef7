//! Stress level scoring for yes/no student surveys.
//!
//! A respondent's "Yes" answers are counted and mapped to an ordinal
//! [`classifier::StressLevel`]. Survey exports are labeled, renamed and
//! binarized by [`prepare`], summarized by [`stats`] and drawn by [`report`].
//! [`predict`] and [`form`] score a single respondent interactively.

extern crate serde;

pub mod classifier;
pub mod config;
pub mod error;
pub mod form;
pub mod predict;
pub mod prepare;
pub mod records;
pub mod report;
pub mod stats;
pub mod telemetry;

pub use classifier::{classify, Answer, StressLevel};
pub use error::SurveyError;
pub use prepare::{load_and_prepare, prepare, LabeledDataset};
