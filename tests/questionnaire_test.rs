mod common;

use common::{sample_rows, write_csv, write_malformed_survey, write_survey};
use std::io::Cursor;
use stress_survey::config::ReportConfig;
use stress_survey::form::{FormController, HEATMAP_FILE};
use stress_survey::predict::Prompter;
use stress_survey::{Answer, StressLevel};
use tempfile::TempDir;

/// The command-line flow scores the answers just entered, not a stored dataset row.
#[test]
fn command_line_flow_classifies_the_entered_answers() {
    let mut out = Vec::new();
    let prediction = Prompter::new(Cursor::new("Sam\nyes\nno\nyes\nyes\nyes\n"), &mut out)
        .predict()
        .unwrap();

    assert_eq!(
        prediction.answers,
        vec![Answer::Yes, Answer::No, Answer::Yes, Answer::Yes, Answer::Yes]
    );
    assert_eq!(prediction.level, StressLevel::High);
    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("Please enter your name: Please answer the following questions (Yes/No):"));
    assert!(out.contains("Sam, your predicted stress level is: High Stress"));
}

#[test]
fn form_and_command_line_agree() {
    let mut form = FormController::new(ReportConfig::default());
    for (i, answer) in [Answer::Yes, Answer::No, Answer::Yes, Answer::No, Answer::Yes]
        .into_iter()
        .enumerate()
    {
        form.questionnaire.set(i, answer);
    }
    assert_eq!(form.predict_stress_level(), StressLevel::Medium);
    assert_eq!(form.readout(), "Your predicted stress level is: Medium Stress");

    let mut out = Vec::new();
    let prediction = Prompter::new(Cursor::new("x\nYes\nNo\nYes\nNo\nYes\n"), &mut out)
        .predict()
        .unwrap();
    assert_eq!(prediction.level, StressLevel::Medium);
}

#[tokio::test]
async fn form_load_then_compute_renders_the_heatmap() {
    let dir = TempDir::new().unwrap();
    let csv = write_survey(dir.path(), "stress.csv", &sample_rows());
    let config = ReportConfig {
        output_dir: dir.path().join("plots"),
        ..ReportConfig::default()
    };
    let mut form = FormController::new(config.clone());

    form.load_csv_file(&csv);
    assert_eq!(form.selection().unwrap().path(), csv.as_path());
    form.calculate_and_visualize().await;

    assert!(form.dialog().is_none());
    let outcome = form.outcome().unwrap();
    assert_eq!(outcome.dataset.height(), 10);
    assert_eq!(outcome.heatmap, config.output_dir.join(HEATMAP_FILE));
    assert!(outcome.heatmap.exists());
}

#[tokio::test]
async fn failed_compute_keeps_the_previous_outcome() {
    let dir = TempDir::new().unwrap();
    let good = write_survey(dir.path(), "good.csv", &sample_rows());
    let bad = write_csv(
        dir.path(),
        "bad.csv",
        &["Do you feel academic pressure?"],
        &[vec!["Yes".to_string()]],
    );
    let mut form = FormController::new(ReportConfig {
        output_dir: dir.path().join("plots"),
        ..ReportConfig::default()
    });

    form.load_csv_file(&good);
    form.calculate_and_visualize().await;
    assert!(form.outcome().is_some());

    form.load_csv_file(&bad);
    form.calculate_and_visualize().await;
    let dialog = form.dialog().unwrap();
    assert_eq!(dialog.title, "Error");
    assert!(dialog.message.contains("missing expected column"));
    assert_eq!(form.outcome().unwrap().source, good);
}

#[tokio::test]
async fn unparseable_csv_opens_the_dialog_without_an_outcome() {
    let dir = TempDir::new().unwrap();
    let csv = write_malformed_survey(dir.path(), "stress.csv");
    let mut form = FormController::new(ReportConfig {
        output_dir: dir.path().join("plots"),
        ..ReportConfig::default()
    });

    form.load_csv_file(&csv);
    form.calculate_and_visualize().await;

    let dialog = form.dialog().unwrap();
    assert_eq!(dialog.title, "Error");
    assert!(dialog.message.starts_with("Error in calculating stress levels:"));
    assert!(form.outcome().is_none());
    assert!(!dir.path().join("plots").join(HEATMAP_FILE).exists());
}

#[test]
fn selecting_a_non_csv_file_opens_the_dialog() {
    let mut form = FormController::new(ReportConfig::default());
    form.load_csv_file("survey.xlsx");
    assert!(form.selection().is_none());
    assert!(form.dialog().unwrap().message.contains("not a CSV file"));
}
