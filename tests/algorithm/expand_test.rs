use std::sync::Arc;

use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use catalog_enrich::{PipelineConfig, RecordBatch, VariantExtractor, expand_variants, extract_variants};

use crate::utils::{cells, column, headers};

fn table(articles: &[Option<&str>], descriptions: &[Option<&str>]) -> RecordBatch {
    let schema = Schema::new(vec![
        Field::new("Артикул", DataType::Utf8, true),
        Field::new("Номенклатура", DataType::Utf8, true),
    ]);
    RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from(articles.to_vec())),
            Arc::new(StringArray::from(descriptions.to_vec())),
        ],
    )
    .unwrap()
}

#[test]
fn test_column_count_matches_largest_variant_set() {
    let batch = table(
        &[Some("ABCD-1234-XY"), Some("PLAIN1"), Some("12345/67890")],
        &[Some("fits (QQ1111; WW2222)"), None, Some("арт. ZX-9001 new")],
    );
    let config = PipelineConfig::default();
    let records = catalog_enrich::Record::from_batch(&batch, &config.columns).unwrap();
    let widest = records.iter().map(|r| extract_variants(r).len()).max().unwrap();

    let (expanded, report) = expand_variants(&batch, &config).unwrap();
    assert_eq!(report.variant_columns, widest);
    assert_eq!(expanded.num_columns(), 2 + widest);
    assert_eq!(report.rows_with_variants, 2);

    // Row 0: ABCD-1234 and ABCD12 from the code, then the bracket tokens
    assert_eq!(
        column(&expanded, "Доп. Артикул 1"),
        cells(&[Some("ABCD1234"), None, Some("12345")])
    );
    assert_eq!(
        column(&expanded, "Доп. Артикул 3"),
        cells(&[Some("QQ1111"), None, Some("ZX9001")])
    );
}

#[test]
fn test_existing_variant_columns_are_replaced() {
    let schema = Schema::new(vec![
        Field::new("Артикул", DataType::Utf8, true),
        Field::new("Доп. Артикул 1", DataType::Utf8, true),
        Field::new("Доп. Артикул 2", DataType::Utf8, true),
        Field::new("Доп. Артикул 3", DataType::Utf8, true),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from(vec![Some("AAAA-BBBB-CC")])),
            Arc::new(StringArray::from(vec![Some("stale")])),
            Arc::new(StringArray::from(vec![Some("stale")])),
            Arc::new(StringArray::from(vec![Some("stale")])),
        ],
    )
    .unwrap();

    let (expanded, _) = expand_variants(&batch, &PipelineConfig::default()).unwrap();
    assert_eq!(
        headers(&expanded),
        vec!["Артикул", "Доп. Артикул 1", "Доп. Артикул 2"]
    );
    assert_eq!(column(&expanded, "Доп. Артикул 1"), cells(&[Some("AAAABBBB")]));
    assert_eq!(column(&expanded, "Доп. Артикул 2"), cells(&[Some("AAAABB")]));
}

#[test]
fn test_malformed_rows_are_counted() {
    let batch = table(&[Some("GOOD-1234-5"), Some("BAD-1234-5")], &[None, Some("broken \u{0007} text")]);
    let (expanded, report) = expand_variants(&batch, &PipelineConfig::default()).unwrap();

    assert_eq!(report.malformed, 1);
    assert_eq!(column(&expanded, "Доп. Артикул 1"), cells(&[Some("GOOD1234"), None]));
}

#[test]
fn test_min_variant_len_setting() {
    let record = catalog_enrich::Record::new("AB-CD-EF", "");
    assert_eq!(VariantExtractor::new(2, false).extract(&record).to_strings(), vec!["ABCD", "EF"]);
}
