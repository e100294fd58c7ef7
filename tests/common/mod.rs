#![allow(dead_code)]

use std::path::{Path, PathBuf};
use stress_survey::records::DATASET_QUESTIONS;

/// Six answers with `yes` leading "Yes" values.
pub fn answers_with_yes(yes: usize) -> Vec<&'static str> {
    (0..6).map(|i| if i < yes { "Yes" } else { "No" }).collect()
}

/// Survey export with a timestamp column followed by the six question columns.
pub fn write_survey(dir: &Path, name: &str, rows: &[Vec<&str>]) -> PathBuf {
    let mut headers = vec!["Timestamp"];
    headers.extend(DATASET_QUESTIONS.iter().map(|q| q.long));
    let rows: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, answers)| {
            let mut row = vec![format!("2023/05/{:02} 10:00", i + 1)];
            row.extend(answers.iter().map(|a| a.to_string()));
            row
        })
        .collect();
    write_csv(dir, name, &headers, &rows)
}

pub fn write_csv(dir: &Path, name: &str, headers: &[&str], rows: &[Vec<String>]) -> PathBuf {
    let path = dir.join(name);
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(headers).unwrap();
    for row in rows {
        writer.write_record(row).unwrap();
    }
    writer.flush().unwrap();
    path
}

/// Survey export whose second data row carries invalid UTF-8 and an extra field.
pub fn write_malformed_survey(dir: &Path, name: &str) -> PathBuf {
    let mut headers = vec!["Timestamp"];
    headers.extend(DATASET_QUESTIONS.iter().map(|q| q.long));
    let mut bytes = headers.join(",").into_bytes();
    bytes.extend_from_slice(b"\n2023/05/01 10:00,Yes,Yes,No,No,No,No\n");
    bytes.extend_from_slice(b"2023/05/02 10:00,Y\xff\xfees,No,No,No,No,No,extra\n");
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Every yes-count from 0 to 6, then a row with an unrecognized answer.
pub fn sample_rows() -> Vec<Vec<&'static str>> {
    let mut rows: Vec<Vec<&'static str>> = (0..=6).map(answers_with_yes).collect();
    rows.push(vec!["Yes", "Yes", "Yes", "Yes", "", "No"]);
    rows.push(vec!["Yes", "Yes", "Yes", "No", "No", "No"]);
    rows.push(vec!["No", "Yes", "No", "Yes", "No", "Yes"]);
    rows
}
