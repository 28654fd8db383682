use catalog_enrich::{PipelineError, run_expand, run_fill};

use crate::utils::{scratch_dir, test_config, write_file};

#[test]
fn test_missing_input_file() {
    let dir = scratch_dir();
    let output = dir.path().join("out.csv");
    let err = run_expand(&dir.path().join("absent.csv"), &output, &test_config()).unwrap_err();

    assert!(matches!(err, PipelineError::InputNotFound { .. }));
    assert!(err.is_input_error());
    assert!(!output.exists());
}

#[test]
fn test_missing_catalog_file_fails_before_transform() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "items.csv", "Артикул,VTRAC\nA1,\n");
    let output = dir.path().join("out.csv");
    let err = run_fill(&input, Some(&dir.path().join("nope.csv")), &output, &test_config()).unwrap_err();

    assert!(matches!(err, PipelineError::InputNotFound { .. }));
    assert!(!output.exists());
}

#[test]
fn test_missing_article_column() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "items.csv", "Код,Номенклатура\nA1,thing\n");
    let output = dir.path().join("out.csv");
    let err = run_expand(&input, &output, &test_config()).unwrap_err();

    assert!(matches!(err, PipelineError::MalformedSchema(_)));
    assert!(!output.exists());
}

#[test]
fn test_unsupported_extension() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "items.ods", "not a table");
    let err = run_expand(&input, &dir.path().join("out.csv"), &test_config()).unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
}

#[test]
fn test_write_failure_leaves_no_partial_file() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "items.csv", "Артикул,Номенклатура\nA-1234-5,thing\n");
    let blocker = write_file(dir.path(), "blocker", "");
    let output = blocker.join("out.csv");

    let err = run_expand(&input, &output, &test_config()).unwrap_err();
    assert!(matches!(err, PipelineError::WriteFailure { .. }) || matches!(err, PipelineError::Io(_)));
    assert!(!blocker.join("out.csv.partial").exists());
}

#[test]
fn test_invalid_settings_file() {
    let dir = scratch_dir();
    let settings = write_file(dir.path(), "settings.json", "{ not json");
    let err = catalog_enrich::PipelineConfig::from_file(&settings).unwrap_err();
    assert!(matches!(err, PipelineError::Config(_)));
}

#[test]
fn test_invalid_utf8_row_is_counted_not_fatal() {
    let dir = scratch_dir();
    let input = dir.path().join("items.csv");
    let mut content = "Артикул,Номенклатура\nAB-1234-5,fits (CD5678)\nEF-9012-3,bad ".as_bytes().to_vec();
    content.extend_from_slice(&[0xC0, 0xFF]);
    content.extend_from_slice(b"\n");
    std::fs::write(&input, content).unwrap();
    let output = dir.path().join("out.csv");

    let report = run_expand(&input, &output, &test_config()).unwrap();
    let expand = report.expand.unwrap();
    assert_eq!(expand.rows, 2);
    assert_eq!(expand.malformed, 1);
    assert_eq!(expand.rows_with_variants, 1);
    assert!(output.exists());
}

#[test]
fn test_corrupt_workbook_is_reported() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "items.xlsx", "not a zip archive");
    let err = run_expand(&input, &dir.path().join("out.csv"), &test_config()).unwrap_err();
    assert!(matches!(err, PipelineError::Spreadsheet(_)));
}
