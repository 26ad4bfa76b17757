//! Query normalization.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize raw user input for matching.
///
/// Lower-cases, decomposes (NFD) and drops combining marks, collapses
/// whitespace runs to a single space and trims both ends. Idempotent.
///
/// # Example
/// ```
/// use wayfarer_search::normalize;
///
/// assert_eq!(normalize("  São   PAULO "), "sao paulo");
/// ```
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Length of a normalized query, in characters.
#[inline]
pub fn query_len(normalized: &str) -> usize {
    normalized.chars().count()
}
