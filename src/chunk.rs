//! Sentence-level chunking of input text.
//!
//! Text is cut on every literal `.` and the translated pieces are glued back
//! with `". "`. Decimal numbers and abbreviations get split too, and an input
//! ending in `.` yields a trailing empty segment. Callers rely on this exact
//! rule.

/// Inputs longer than this many characters are chunked for Bing.
pub const BING_MAX_CHARS: usize = 1000;

/// Separator inserted between translated segments.
pub const SEGMENT_SEPARATOR: &str = ". ";

/// Split text on every period. Always yields at least one segment.
pub fn split_segments(text: &str) -> Vec<&str> {
    text.split('.').collect()
}

/// Rejoin translated segments and trim trailing whitespace.
pub fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    let joined = segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR);
    joined.trim_end().to_string()
}

/// Whether a Bing request must be chunked.
pub fn exceeds_bing_limit(text: &str) -> bool {
    text.chars().count() > BING_MAX_CHARS
}
