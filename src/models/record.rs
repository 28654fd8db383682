//! Catalog record model
//!
//! A [`Record`] is one table row seen through the three columns the pipeline
//! cares about. Everything else in the row passes through untouched.

use std::sync::Arc;

use arrow::array::{ArrayRef, new_null_array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::config::ColumnNames;
use crate::error::{PipelineError, Result};
use crate::utils::arrow::{cell_text, get_column, get_string_column, to_utf8};
use crate::utils::logging::log_warning;

/// One row of the catalog table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Raw article code, possibly noisy or empty
    pub article: Option<String>,
    /// Free-text product description
    pub nomenclature: Option<String>,
    /// VTRAC code, if already known
    pub vtrac: Option<String>,
    /// Values already present in the row's variant columns
    #[serde(skip)]
    pub known_variants: Vec<String>,
}

impl Record {
    /// Create a record from its article code and description
    #[must_use]
    pub fn new(article: impl Into<String>, nomenclature: impl Into<String>) -> Self {
        Self {
            article: Some(article.into()),
            nomenclature: Some(nomenclature.into()),
            ..Self::default()
        }
    }

    /// Builder-style setter for the VTRAC code
    #[must_use]
    pub fn with_vtrac(mut self, vtrac: impl Into<String>) -> Self {
        self.vtrac = Some(vtrac.into());
        self
    }

    /// Builder-style setter for existing variant column values
    #[must_use]
    pub fn with_known_variants<I, S>(mut self, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.known_variants = variants.into_iter().map(Into::into).collect();
        self
    }

    /// Trimmed VTRAC value, `None` when absent or blank
    #[must_use]
    pub fn vtrac_value(&self) -> Option<&str> {
        self.vtrac.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Whether the record still needs a VTRAC value
    #[must_use]
    pub fn needs_vtrac(&self) -> bool {
        self.vtrac_value().is_none()
    }

    /// Name of the first text field that cannot be processed, if any
    ///
    /// Text holding replacement characters or control characters other than
    /// tabs and line breaks comes from a broken encoding upstream.
    #[must_use]
    pub fn malformed_field(&self) -> Option<&'static str> {
        if self.article.as_deref().is_some_and(is_malformed_text) {
            return Some("article");
        }
        if self.nomenclature.as_deref().is_some_and(is_malformed_text) {
            return Some("nomenclature");
        }
        None
    }

    /// Extract records from a record batch
    ///
    /// The article column is required; missing nomenclature or VTRAC columns
    /// are read as empty. Existing variant columns are collected in their
    /// numeric order.
    ///
    /// # Errors
    /// `MalformedSchema` when the article column is missing
    pub fn from_batch(batch: &RecordBatch, columns: &ColumnNames) -> Result<Vec<Self>> {
        let num_rows = batch.num_rows();
        let article = get_column(batch, &columns.article, true)?
            .ok_or_else(|| PipelineError::missing_column(&columns.article))?;
        let nomenclature = optional_text_column(batch, &columns.nomenclature)?;
        if nomenclature.is_none() {
            log_warning(
                &format!(
                    "Column '{}' not found, descriptions are treated as empty",
                    columns.nomenclature
                ),
                None,
            );
        }
        let vtrac = optional_text_column(batch, &columns.vtrac)?;

        let projected = RecordBatch::try_new(
            Arc::new(Schema::new(vec![
                Field::new("article", DataType::Utf8, true),
                Field::new("nomenclature", DataType::Utf8, true),
                Field::new("vtrac", DataType::Utf8, true),
            ])),
            vec![
                article,
                nomenclature.unwrap_or_else(|| new_null_array(&DataType::Utf8, num_rows)),
                vtrac.unwrap_or_else(|| new_null_array(&DataType::Utf8, num_rows)),
            ],
        )?;

        let mut records: Vec<Self> = serde_arrow::from_record_batch(&projected).map_err(|e| {
            PipelineError::MalformedSchema(format!("failed to deserialize records: {e}"))
        })?;

        let variant_columns = variant_column_names(batch, columns)
            .into_iter()
            .map(|name| get_string_column(batch, &name))
            .collect::<Result<Vec<_>>>()?;

        if !variant_columns.is_empty() {
            for (row, record) in records.iter_mut().enumerate() {
                record.known_variants = variant_columns
                    .iter()
                    .filter_map(|array| cell_text(array, row))
                    .map(str::to_string)
                    .collect();
            }
        }

        Ok(records)
    }
}

/// Names of the variant columns present in `batch`, ordered by their number
#[must_use]
pub fn variant_column_names(batch: &RecordBatch, columns: &ColumnNames) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .filter(|name| columns.is_variant_column(name))
        .sorted_by_key(|name| {
            name.rsplit(' ')
                .next()
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(usize::MAX)
        })
        .collect()
}

fn optional_text_column(batch: &RecordBatch, name: &str) -> Result<Option<ArrayRef>> {
    match batch.schema().index_of(name) {
        Ok(idx) => to_utf8(batch.column(idx)).map(Some),
        Err(_) => Ok(None),
    }
}

fn is_malformed_text(text: &str) -> bool {
    text.chars()
        .any(|c| c == '\u{FFFD}' || (c.is_control() && !matches!(c, '\t' | '\n' | '\r')))
}
