//! Candidate codes derived from the article code itself

use smallvec::SmallVec;

/// Prefixes at least this long also yield a copy with the last two characters cut
const TRUNCATE_MIN_LEN: usize = 7;

/// Raw candidate pieces of an article code, before normalization
///
/// Dashed codes yield the part before the last dash (plus the same part
/// without its two-character suffix when it is long enough), the first two
/// dash-separated parts and the remainder after the second dash. Slashed
/// codes yield every slash-separated part.
#[must_use]
pub fn code_candidates(raw: &str) -> SmallVec<[String; 8]> {
    let code = raw.trim();
    let mut candidates = SmallVec::new();

    if code.contains('-') {
        if let Some((before_last, _)) = code.rsplit_once('-') {
            candidates.push(before_last.to_string());

            let len = before_last.chars().count();
            if len >= TRUNCATE_MIN_LEN {
                candidates.push(before_last.chars().take(len - 2).collect());
            }
        }

        let mut parts = code.splitn(3, '-');
        if let (Some(first), Some(second)) = (parts.next(), parts.next()) {
            candidates.push(format!("{first}-{second}"));
            if let Some(rest) = parts.next() {
                candidates.push(rest.to_string());
            }
        }
    }

    if code.contains('/') {
        candidates.extend(code.split('/').map(str::to_string));
    }

    candidates
}
