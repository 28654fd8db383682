//! Arrow data handling utilities
//!
//! Helpers for reading text cells out of record batches and for rebuilding
//! batches with derived columns.

pub mod array_utils;

// Re-export commonly used functions for convenience
pub use array_utils::{
    cell_text, drop_columns_where, get_column, get_string_column, string_array, stringify_batch,
    to_utf8, upsert_columns,
};
