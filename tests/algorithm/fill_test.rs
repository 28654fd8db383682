use std::sync::Arc;

use arrow::array::StringArray;
use arrow::datatypes::{DataType, Field, Schema};
use catalog_enrich::{
    FillOutcome, FillSettings, PipelineConfig, Record, RecordBatch, VtracIndex, common_prefix,
    fill_missing, fill_vtrac, normalize,
};

use crate::utils::{cells, column};

#[test]
fn test_normalize_examples() {
    assert_eq!(normalize("AB-12 3"), "AB123");
    assert_eq!(normalize(" 12/34-56 "), "123456");
    assert_eq!(normalize(normalize("a b-c").as_str()), normalize("a b-c"));
}

#[test]
fn test_common_prefix_examples() {
    assert_eq!(common_prefix(["AB123", "AB456"]), "AB");
    assert_eq!(common_prefix(["XYZ"]), "XYZ");
    assert_eq!(common_prefix(["AB", "CD"]), "");
}

#[test]
fn test_single_worker_matches_many() {
    let mut records: Vec<Record> = (0..100)
        .map(|i| Record::new(format!("P-{i:03}"), "").with_vtrac(format!("VT{i:03}")))
        .collect();
    records.extend((0..100).map(|i| Record::new(format!("P {i:03}"), format!("see P{:03}", (i + 1) % 100))));
    let index = VtracIndex::build(&records, false, false);

    let one = fill_missing(&records, &index, &FillSettings { workers: 1, ..FillSettings::default() }).unwrap();
    let many = fill_missing(&records, &index, &FillSettings { workers: 8, ..FillSettings::default() }).unwrap();
    assert_eq!(one, many);
    assert_eq!(many[150], FillOutcome::Filled("VT05".to_string()));
}

#[test]
fn test_fill_vtrac_keeps_existing_values() {
    let schema = Schema::new(vec![
        Field::new("Артикул", DataType::Utf8, true),
        Field::new("Номенклатура", DataType::Utf8, true),
        Field::new("VTRAC", DataType::Utf8, true),
    ]);
    let batch = RecordBatch::try_new(
        Arc::new(schema),
        vec![
            Arc::new(StringArray::from(vec![Some("AB123"), Some("AB-12 3"), Some("CD1")])),
            Arc::new(StringArray::from(vec![None, Some("widget AB123 spare"), None])),
            Arc::new(StringArray::from(vec![Some("V001"), None, Some("KEEP")])),
        ],
    )
    .unwrap();

    let (filled, report) = fill_vtrac(&batch, None, &PipelineConfig::default()).unwrap();
    assert_eq!(column(&filled, "VTRAC"), cells(&[Some("V001"), Some("V001"), Some("KEEP")]));
    assert_eq!(report.filled, 1);
    assert_eq!(report.already_present, 2);
    assert_eq!(report.index_keys, 2);
}
