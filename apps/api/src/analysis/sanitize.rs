//! Document sanitization applied before any prompt is built.

use regex::Regex;
use std::sync::LazyLock;

/// A markdown heading marker: 1–6 `#` characters at the start of a line,
/// followed by whitespace.
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+").unwrap());

/// Strips markdown heading markers from raw document text and trims the
/// surrounding whitespace. Total: always succeeds, including on empty input.
pub fn sanitize_document(raw: &str) -> String {
    HEADING_MARKER.replace_all(raw, "").trim().to_string()
}
