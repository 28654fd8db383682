//! Data model of the catalog pipeline

pub mod code;
pub mod record;
pub mod variant_set;

pub use code::NormalizedCode;
pub use record::{Record, variant_column_names};
pub use variant_set::VariantSet;
