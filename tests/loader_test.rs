//! Loading the headerless record files.

use std::fs;

use brand_pulse::dataset::{load_records, Dataset};
use brand_pulse::{AnalysisError, Sentiment};

#[test]
fn headerless_rows_are_read_with_fixed_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    fs::write(
        &path,
        "2401,Borderlands,Positive,\"im getting on borderlands, and i will murder you all\"\n\
         2402,Borderlands,Neutral,plain text\n",
    )
    .unwrap();

    let df = load_records(&path).unwrap();
    assert_eq!(df.height(), 2);
    assert_eq!(df.get_column_names_str(), vec!["id", "brand", "sentiment", "text"]);
}

#[test]
fn training_rows_come_before_validation_rows() {
    let dir = tempfile::tempdir().unwrap();
    let training = dir.path().join("train.csv");
    let validation = dir.path().join("val.csv");
    fs::write(&training, "1,Amazon,Positive,a\n2,Amazon,Negative,b\n").unwrap();
    fs::write(&validation, "3,ATT,Irrelevant,\"multi\nline\"\n").unwrap();

    let dataset = Dataset::load(&training, &validation).unwrap();
    let records = dataset.records().unwrap();

    let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(records[2].brand, "ATT");
    assert_eq!(records[2].sentiment, Sentiment::Irrelevant);
    assert_eq!(records[2].text.as_deref(), Some("multi\nline"));
    assert_eq!(dataset.brand_count().unwrap(), 2);
}

#[test]
fn unknown_sentiment_label_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let training = dir.path().join("train.csv");
    let validation = dir.path().join("val.csv");
    fs::write(&training, "1,Amazon,Positive,a\n").unwrap();
    fs::write(&validation, "2,Amazon,Sarcastic,b\n").unwrap();

    let err = Dataset::load(&training, &validation).unwrap_err();
    assert!(
        matches!(err, AnalysisError::InvalidData(ref msg) if msg.contains("Sarcastic")),
        "unexpected error: {err}"
    );
}

#[test]
fn non_integer_id_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    fs::write(&path, "abc,Amazon,Positive,a\n").unwrap();

    assert!(load_records(&path).is_err());
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let present = dir.path().join("train.csv");
    fs::write(&present, "1,Amazon,Positive,a\n").unwrap();

    let result = Dataset::load(&present, &dir.path().join("absent.csv"));
    assert!(result.is_err());
}
