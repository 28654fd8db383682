//! Common prefix aggregation over VTRAC codes

/// Longest prefix shared by every code
///
/// A single code is returned unchanged. Comparison is character by
/// character, so a multi-byte character is never split. An empty input
/// yields an empty string, as does a set with no shared first character.
#[must_use]
pub fn common_prefix<I, S>(codes: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut codes = codes.into_iter();
    let Some(first) = codes.next() else {
        return String::new();
    };
    let first = first.as_ref();

    // Byte length of the prefix shared so far; always on a char boundary of `first`.
    let mut shared = first.len();
    for code in codes {
        let code = code.as_ref();
        shared = first[..shared]
            .char_indices()
            .zip(code.chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| shared.min(matched_len(first, code)), |((idx, _), _)| idx);
        if shared == 0 {
            break;
        }
    }

    first[..shared].to_string()
}

/// Byte length of `first` covered by the shorter of the two strings
fn matched_len(first: &str, other: &str) -> usize {
    first
        .char_indices()
        .nth(other.chars().count())
        .map_or(first.len(), |(idx, _)| idx)
}
