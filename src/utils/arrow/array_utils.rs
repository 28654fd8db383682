//! Utilities for working with Arrow arrays.
//!
//! The pipeline treats every cell as optional text, so these helpers coerce
//! columns to `Utf8` and rebuild record batches with added or removed
//! string columns.

use arrow::array::{Array, ArrayRef, AsArray, StringArray, new_null_array};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use log::{debug, warn};
use std::sync::Arc;

use crate::error::{PipelineError, Result};

/// Cast an array to `Utf8`, returning it untouched when it already is text
pub fn to_utf8(array: &ArrayRef) -> Result<ArrayRef> {
    if array.data_type() == &DataType::Utf8 {
        return Ok(Arc::clone(array));
    }
    debug!("Casting column from {:?} to Utf8", array.data_type());
    Ok(cast(array, &DataType::Utf8)?)
}

/// Get a column from a record batch as `Utf8`
///
/// # Returns
///
/// * `Ok(Some(ArrayRef))` - The column array, cast to text if necessary
/// * `Ok(None)` - If the column is not found and `required` is false
/// * `Err(PipelineError::MalformedSchema)` - If the column is missing and `required` is true
pub fn get_column(batch: &RecordBatch, column_name: &str, required: bool) -> Result<Option<ArrayRef>> {
    let Ok(idx) = batch.schema().index_of(column_name) else {
        if required {
            return Err(PipelineError::missing_column(column_name));
        }
        warn!("Column '{column_name}' not found in record batch");
        return Ok(None);
    };

    to_utf8(batch.column(idx)).map(Some)
}

/// Get a column as a `StringArray`, substituting an all-null column when it is absent
pub fn get_string_column(batch: &RecordBatch, column_name: &str) -> Result<StringArray> {
    let array = match batch.schema().index_of(column_name) {
        Ok(idx) => to_utf8(batch.column(idx))?,
        Err(_) => new_null_array(&DataType::Utf8, batch.num_rows()),
    };
    Ok(array.as_string::<i32>().clone())
}

/// Trimmed, non-empty cell value at `row`
#[must_use]
pub fn cell_text(array: &StringArray, row: usize) -> Option<&str> {
    if array.is_null(row) {
        return None;
    }
    let value = array.value(row).trim();
    (!value.is_empty()).then_some(value)
}

/// Build a nullable `Utf8` array from optional strings
#[must_use]
pub fn string_array(values: Vec<Option<String>>) -> ArrayRef {
    Arc::new(StringArray::from(values))
}

/// Convert every column of a batch to nullable `Utf8`
pub fn stringify_batch(batch: &RecordBatch) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut columns = Vec::with_capacity(batch.num_columns());

    for (field, column) in batch.schema().fields().iter().zip(batch.columns()) {
        fields.push(Field::new(field.name(), DataType::Utf8, true));
        columns.push(to_utf8(column)?);
    }

    rebuild(fields, columns, batch.num_rows())
}

/// Remove every column whose name matches `predicate`
pub fn drop_columns_where<F>(batch: &RecordBatch, predicate: F) -> Result<RecordBatch>
where
    F: Fn(&str) -> bool,
{
    let schema = batch.schema();
    let (fields, columns): (Vec<Field>, Vec<ArrayRef>) = schema
        .fields()
        .iter()
        .zip(batch.columns())
        .filter(|(field, _)| !predicate(field.name().as_str()))
        .map(|(field, column)| (field.as_ref().clone(), Arc::clone(column)))
        .unzip();

    rebuild(fields, columns, batch.num_rows())
}

/// Replace columns with the same name in place, append the others at the end
pub fn upsert_columns(batch: &RecordBatch, new_columns: Vec<(String, ArrayRef)>) -> Result<RecordBatch> {
    let schema = batch.schema();
    let mut fields: Vec<Field> = schema.fields().iter().map(|f| f.as_ref().clone()).collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    for (name, column) in new_columns {
        if column.len() != batch.num_rows() {
            return Err(PipelineError::MalformedSchema(format!(
                "column '{name}' has {} values, table has {} rows",
                column.len(),
                batch.num_rows()
            )));
        }
        let field = Field::new(&name, column.data_type().clone(), true);
        match fields.iter().position(|f| f.name() == &name) {
            Some(idx) => {
                fields[idx] = field;
                columns[idx] = column;
            }
            None => {
                fields.push(field);
                columns.push(column);
            }
        }
    }

    rebuild(fields, columns, batch.num_rows())
}

fn rebuild(fields: Vec<Field>, columns: Vec<ArrayRef>, num_rows: usize) -> Result<RecordBatch> {
    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &options,
    )?)
}
