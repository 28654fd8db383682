//! Catalog transformations
//!
//! Each stage works on a whole in-memory table: duplicate removal, variant
//! column expansion and VTRAC filling. Code normalization is shared by all
//! of them.

pub mod dedup;
pub mod expand;
pub mod normalize;
pub mod variants;
pub mod vtrac;

pub use dedup::{DedupReport, dedup_rows};
pub use expand::{ExpandReport, VariantColumns, expand_variants};
pub use normalize::{canonical_key, normalize};
pub use variants::{MalformedRecord, VariantExtractor, extract_variants};
pub use vtrac::{
    FillOutcome, FillReport, FillSettings, MatchResult, VtracIndex, VtracIndexBuilder, common_prefix,
    fill_missing, fill_vtrac, resolve_record,
};
