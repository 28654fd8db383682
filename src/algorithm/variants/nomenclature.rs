//! Candidate codes found in free-text descriptions
//!
//! Three sources are scanned in order: bracketed groups, `арт.` markers and
//! free tokens shaped like an article code.

use lazy_static::lazy_static;
use regex::Regex;

/// Free tokens made only of digits must be at least this long
const MIN_NUMERIC_TOKEN_LEN: usize = 6;

lazy_static! {
    static ref BRACKET_GROUP: Regex = Regex::new(r"\(([^)]*)\)").unwrap();
    static ref BRACKET_TOKEN: Regex = Regex::new(r"[A-Za-z0-9-]+").unwrap();
    static ref ART_MARKER: Regex = Regex::new(r"(?i)\bарт\b\.?\s*([^;]*)").unwrap();
    static ref CODE_SHAPE: Regex = Regex::new(r"[A-Za-z0-9]+(?:[-/][A-Za-z0-9]+)*").unwrap();
}

/// Raw candidate codes mentioned in `text`, in order of discovery
#[must_use]
pub fn nomenclature_candidates(text: &str) -> Vec<String> {
    let mut candidates = bracket_candidates(text);
    candidates.extend(marker_candidates(text));
    candidates.extend(shaped_tokens(text));
    candidates
}

/// First code-like token of every `/`- or `;`-separated piece inside brackets
fn bracket_candidates(text: &str) -> Vec<String> {
    BRACKET_GROUP
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .flat_map(|group| group.as_str().split(['/', ';']))
        .filter_map(|piece| BRACKET_TOKEN.find(piece.trim()))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// The word following each `арт.` marker
fn marker_candidates(text: &str) -> Vec<String> {
    ART_MARKER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|tail| {
            tail.as_str()
                .split(|c: char| c == '/' || c == '(' || c.is_whitespace())
                .next()
                .filter(|word| !word.is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// Standalone tokens that look like article codes
fn shaped_tokens(text: &str) -> Vec<String> {
    CODE_SHAPE
        .find_iter(text)
        .filter(|m| {
            let before = text[..m.start()].chars().next_back();
            let after = text[m.end()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
        .map(|m| m.as_str())
        .filter(|token| has_code_shape(token))
        .map(str::to_string)
        .collect()
}

fn has_code_shape(token: &str) -> bool {
    let digits = token.chars().filter(char::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    token.chars().any(|c| c.is_ascii_alphabetic()) || digits >= MIN_NUMERIC_TOKEN_LEN
}
