mod common;

use common::{answers_with_yes, sample_rows, write_csv, write_malformed_survey, write_survey};
use pretty_assertions::assert_eq;
use stress_survey::config::ReportConfig;
use stress_survey::prepare::{label_stress_levels, load_and_prepare, prepare, read_csv};
use stress_survey::records::{SurveyRecord, DATASET_QUESTIONS, STRESS_LEVEL};
use stress_survey::report::render_all;
use stress_survey::stats::{grouped_correlation, summarize_dataset};
use stress_survey::{StressLevel, SurveyError};
use tempfile::TempDir;

#[tokio::test]
async fn scores_every_yes_count() {
    let dir = TempDir::new().unwrap();
    let rows: Vec<Vec<&str>> = (0..=6).map(answers_with_yes).collect();
    let path = write_survey(dir.path(), "stress.csv", &rows);

    let labeled = load_and_prepare(&path).await.unwrap();
    use StressLevel::*;
    assert_eq!(
        labeled.levels().unwrap(),
        vec![Low, Low, Low, Medium, High, High, High]
    );
}

#[tokio::test]
async fn scenarios_from_a_file() {
    let dir = TempDir::new().unwrap();
    let rows = vec![
        vec!["Yes", "Yes", "Yes", "Yes", "No", "No"],
        vec!["Yes", "Yes", "Yes", "No", "No", "No"],
        vec!["No", "No", "No", "No", "No", "No"],
    ];
    let path = write_survey(dir.path(), "stress.csv", &rows);

    let labeled = load_and_prepare(&path).await.unwrap();
    assert_eq!(
        labeled.levels().unwrap(),
        vec![StressLevel::High, StressLevel::Medium, StressLevel::Low]
    );
}

#[tokio::test]
async fn renamed_columns_hold_only_zero_one_or_missing() {
    let dir = TempDir::new().unwrap();
    let path = write_survey(dir.path(), "stress.csv", &sample_rows());

    let labeled = load_and_prepare(&path).await.unwrap();
    let names = labeled.frame().get_column_names();
    for q in DATASET_QUESTIONS.iter() {
        assert!(!names.contains(&q.long), "{} still present", q.long);
    }
    assert!(names.contains(&STRESS_LEVEL));

    for var in SurveyRecord::binary_vars() {
        for value in labeled.binary_column(var).unwrap() {
            assert!(matches!(value, None | Some(0) | Some(1)), "{var}: {value:?}");
        }
    }
    // The empty Interaction cell of row 7 is missing, not a fabricated 0.
    assert_eq!(labeled.binary_column("Interaction").unwrap()[7], None);
    assert_eq!(labeled.levels().unwrap()[7], StressLevel::High);
}

#[tokio::test]
async fn relabeling_a_labeled_table_gives_the_same_levels() {
    let dir = TempDir::new().unwrap();
    let path = write_survey(dir.path(), "stress.csv", &sample_rows());

    let first = load_and_prepare(&path).await.unwrap().levels().unwrap();

    let mut frame = read_csv(&path).await.unwrap();
    label_stress_levels(&mut frame).unwrap();
    let second = prepare(frame).unwrap().levels().unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn missing_column_is_reported_and_nothing_is_produced() {
    let dir = TempDir::new().unwrap();
    let headers: Vec<&str> = DATASET_QUESTIONS.iter().take(5).map(|q| q.long).collect();
    let rows = vec![vec!["Yes".to_string(); 5], vec!["No".to_string(); 5]];
    let path = write_csv(dir.path(), "short.csv", &headers, &rows);

    match load_and_prepare(&path).await {
        Err(SurveyError::ColumnMissing { column }) => {
            assert_eq!(column, DATASET_QUESTIONS[5].long)
        }
        other => panic!("expected ColumnMissing, got {other:?}"),
    }
}

#[tokio::test]
async fn unreadable_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_and_prepare(dir.path().join("absent.csv"))
        .await
        .unwrap_err();
    assert!(matches!(err, SurveyError::Io { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[tokio::test]
async fn unparseable_csv_surfaces_the_dataframe_error() {
    let dir = TempDir::new().unwrap();
    let path = write_malformed_survey(dir.path(), "stress.csv");

    let err = load_and_prepare(&path).await.unwrap_err();
    assert!(matches!(err, SurveyError::Polars(_)), "got {err:?}");
}

#[tokio::test]
async fn correlation_groups_follow_the_levels_present() {
    let dir = TempDir::new().unwrap();
    let path = write_survey(dir.path(), "stress.csv", &sample_rows());
    let labeled = load_and_prepare(&path).await.unwrap();

    let correlation = grouped_correlation(&labeled).unwrap();
    let levels: Vec<StressLevel> = correlation.blocks.iter().map(|b| b.level).collect();
    assert_eq!(levels, StressLevel::ALL.to_vec());
    assert_eq!(correlation.row_labels().len(), 18);
    for block in &correlation.blocks {
        assert_eq!(block.matrix.len(), 6);
        for (i, row) in block.matrix.iter().enumerate() {
            if let Some(diag) = row[i] {
                assert!((diag - 1.0).abs() < 1e-9);
            }
            for value in row.iter().flatten() {
                assert!((-1.0..=1.0).contains(value));
            }
        }
    }

    let summary = summarize_dataset(&labeled).unwrap();
    assert_eq!(summary.rows, 10);
    let total: usize = summary.levels.iter().map(|l| l.respondents).sum();
    assert_eq!(total, 10);
    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["levels"][0]["level"], "High Stress");
}

#[tokio::test]
async fn renders_every_chart_as_svg() {
    let dir = TempDir::new().unwrap();
    let path = write_survey(dir.path(), "stress.csv", &sample_rows());
    let labeled = load_and_prepare(&path).await.unwrap();

    let config = ReportConfig {
        output_dir: dir.path().join("plots"),
        ..ReportConfig::default()
    };
    let written = render_all(&labeled, &config).unwrap();

    assert_eq!(written.len(), 20);
    assert!(written.contains(&config.output_dir.join("correlation_heatmap.svg")));
    assert!(written.contains(&config.output_dir.join("boxplot_attendance_vs_interaction.svg")));
    for file in &written {
        let body = std::fs::read_to_string(file).unwrap();
        assert!(body.contains("<svg"), "{file:?} is not an SVG");
    }
}
