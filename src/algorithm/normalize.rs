//! Article code normalization
//!
//! Codes arrive with arbitrary spacing and separators ("AB-12 3",
//! "AB/123", "AB 123"); the canonical form drops all of them so the same
//! product compares equal however it was typed.

use crate::models::NormalizedCode;

/// Characters removed from article codes besides whitespace
const SEPARATORS: [char; 2] = ['-', '/'];

/// Strip every whitespace character, dash and slash from `raw`
///
/// Total and pure: any text, including empty and non-ASCII input, yields a
/// code, and `normalize(normalize(x).as_str()) == normalize(x)`.
#[must_use]
pub fn normalize(raw: &str) -> NormalizedCode {
    NormalizedCode::from_normalized(
        raw.chars()
            .filter(|c| !c.is_whitespace() && !SEPARATORS.contains(c))
            .collect(),
    )
}

/// Normalize an optional cell value; absent input yields the empty code
#[must_use]
pub fn normalize_opt(raw: Option<&str>) -> NormalizedCode {
    raw.map(normalize).unwrap_or_default()
}

/// Lookup key for `raw`: the normalized code, upper-cased when `fold_case` is set
#[must_use]
pub fn canonical_key(raw: &str, fold_case: bool) -> NormalizedCode {
    let code = normalize(raw);
    if fold_case { code.to_folded() } else { code }
}
