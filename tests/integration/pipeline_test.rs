use catalog_enrich::{PipelineConfig, run_all, run_dedup, run_expand, run_fill};

use crate::utils::{cells, column, headers, load, scratch_dir, test_config, write_file};

const CATALOG: &str = "\
Артикул,Номенклатура,VTRAC
AB123,base part,V001
AB-12 3,widget AB123 spare,
AB-12 3,widget AB123 spare,
NEW-999,brand new part,
ZZ-0001,spare for (QW1234) and XY-5678,
QW1234,,VT1001
XY5678,,VT1002
";

#[test]
fn test_run_all_end_to_end() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "catalog.csv", CATALOG);
    let output = dir.path().join("enriched.csv");

    let report = run_all(&input, None, &output, &test_config()).unwrap();
    let table = load(&output);

    assert_eq!(report.rows_in, 7);
    assert_eq!(report.rows_out, 6);
    assert_eq!(report.dedup.as_ref().unwrap().duplicates, 1);

    assert_eq!(
        headers(&table),
        vec!["Артикул", "Номенклатура", "VTRAC", "Доп. Артикул 1", "Доп. Артикул 2"]
    );
    assert_eq!(
        column(&table, "VTRAC"),
        cells(&[
            Some("V001"),
            Some("V001"),
            None,
            Some("VT100"),
            Some("VT1001"),
            Some("VT1002"),
        ])
    );
    assert_eq!(
        column(&table, "Доп. Артикул 1"),
        cells(&[None, None, None, Some("QW1234"), None, None])
    );
    assert_eq!(
        column(&table, "Доп. Артикул 2"),
        cells(&[None, None, None, Some("XY5678"), None, None])
    );

    let fill = report.fill.unwrap();
    assert_eq!(fill.filled, 2);
    assert_eq!(fill.unmatched, 1);
    assert_eq!(fill.already_present, 3);
    assert_eq!(fill.ambiguous, 0);
}

#[test]
fn test_stages_chain_through_files() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "catalog.csv", CATALOG);
    let deduped = dir.path().join("step1.csv");
    let expanded = dir.path().join("step2.parquet");
    let filled = dir.path().join("step3.csv");
    let config = test_config();

    run_dedup(&input, &deduped, &config).unwrap();
    let report = run_expand(&deduped, &expanded, &config).unwrap();
    assert_eq!(report.expand.as_ref().unwrap().variant_columns, 2);
    run_fill(&expanded, None, &filled, &config).unwrap();

    let chained = load(&filled);
    let direct_out = dir.path().join("direct.csv");
    run_all(&input, None, &direct_out, &config).unwrap();
    let direct = load(&direct_out);

    assert_eq!(headers(&chained), headers(&direct));
    assert_eq!(column(&chained, "VTRAC"), column(&direct, "VTRAC"));
}

#[test]
fn test_dedup_keeps_first_occurrence_and_columns() {
    let dir = scratch_dir();
    let input = write_file(
        dir.path(),
        "raw.csv",
        "Артикул,Номенклатура,Цена\nA-1,one,10\nB-2,two,20\nA-1,one,10\nA-1,one,11\n",
    );
    let output = dir.path().join("out.csv");

    let report = run_dedup(&input, &output, &test_config()).unwrap();
    let table = load(&output);

    assert_eq!(report.dedup.unwrap().duplicates, 1);
    assert_eq!(headers(&table), vec!["Артикул", "Номенклатура", "Цена"]);
    assert_eq!(column(&table, "Цена"), cells(&[Some("10"), Some("20"), Some("11")]));
}

#[test]
fn test_fill_with_external_catalog_creates_vtrac_column() {
    let dir = scratch_dir();
    let input = write_file(
        dir.path(),
        "items.csv",
        "Артикул,Номенклатура\nK-100,gear\nP-1,pump (A/200)\nQ-7,unknown\n",
    );
    let catalog = write_file(
        dir.path(),
        "vtrac.csv",
        "Артикул,Артикул аналога,VTRAC\nK100,,VT5\nX1,A200,VT6\n",
    );
    let output = dir.path().join("filled.parquet");

    let report = run_fill(&input, Some(&catalog), &output, &test_config()).unwrap();
    let table = load(&output);

    assert_eq!(headers(&table), vec!["Артикул", "Номенклатура", "VTRAC"]);
    assert_eq!(column(&table, "VTRAC"), cells(&[Some("VT5"), Some("VT6"), None]));
    assert_eq!(report.fill.unwrap().unmatched, 1);
}

#[test]
fn test_min_prefix_len_leaves_short_prefix_empty() {
    let dir = scratch_dir();
    let input = write_file(
        dir.path(),
        "items.csv",
        "Артикул,Номенклатура,VTRAC\nK1,,VT12345\nK-1,,VT19999\nK 1,,\n",
    );
    let output = dir.path().join("out.csv");
    let config = PipelineConfig {
        min_prefix_len: 6,
        ..test_config()
    };

    let report = run_fill(&input, None, &output, &config).unwrap();
    assert_eq!(report.fill.unwrap().ambiguous, 1);
    assert_eq!(
        column(&load(&output), "VTRAC"),
        cells(&[Some("VT12345"), Some("VT19999"), None])
    );
}

#[test]
fn test_settings_file_caps_variant_columns() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "catalog.csv", CATALOG);
    let settings = write_file(dir.path(), "settings.json", r#"{"max_variant_columns": 1, "workers": 1}"#);
    let output = dir.path().join("out.csv");

    let config = PipelineConfig::from_file(&settings).unwrap();
    run_expand(&input, &output, &config).unwrap();

    let table = load(&output);
    assert_eq!(
        headers(&table),
        vec!["Артикул", "Номенклатура", "VTRAC", "Доп. Артикул 1"]
    );
}

#[test]
fn test_report_file() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "catalog.csv", CATALOG);
    let output = dir.path().join("out.csv");
    let report_path = dir.path().join("reports").join("run.json");

    let report = run_all(&input, None, &output, &test_config()).unwrap();
    report.write(&report_path).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["stage"], "run");
    assert_eq!(json["fill"]["filled"], 2);
    assert_eq!(json["expand"]["variant_columns"], 2);
}

#[test]
fn test_catalog_prefix_match_is_opt_in() {
    let dir = scratch_dir();
    let input = write_file(dir.path(), "items.csv", "Артикул,Номенклатура\nK-100,gear\n");
    let catalog = write_file(
        dir.path(),
        "vtrac.csv",
        "Артикул,Артикул аналога,VTRAC\nK1001,,VT501\nX9,K100-7,VT502\n",
    );
    let exact_out = dir.path().join("exact.csv");
    let prefix_out = dir.path().join("prefix.csv");

    let report = run_fill(&input, Some(&catalog), &exact_out, &test_config()).unwrap();
    assert_eq!(report.fill.unwrap().unmatched, 1);
    assert_eq!(column(&load(&exact_out), "VTRAC"), cells(&[None]));

    let config = PipelineConfig {
        catalog_prefix_match: true,
        ..test_config()
    };
    run_fill(&input, Some(&catalog), &prefix_out, &config).unwrap();
    assert_eq!(column(&load(&prefix_out), "VTRAC"), cells(&[Some("VT50")]));
}

#[test]
fn test_run_all_through_workbooks() {
    let dir = scratch_dir();
    let csv_input = write_file(dir.path(), "catalog.csv", CATALOG);
    let workbook = dir.path().join("catalog.xlsx");
    let output = dir.path().join("enriched.xlsx");

    run_dedup(&csv_input, &workbook, &test_config()).unwrap();
    let report = run_all(&workbook, None, &output, &test_config()).unwrap();
    let table = load(&output);

    assert_eq!(report.rows_in, 6);
    assert_eq!(report.fill.unwrap().filled, 2);
    assert_eq!(column(&table, "VTRAC")[3], Some("VT100".to_string()));
    assert_eq!(column(&table, "Доп. Артикул 2")[3], Some("XY5678".to_string()));
}
