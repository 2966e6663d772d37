//! Keyword display-name normalization.
//!
//! The help project format quotes keyword names inside attributes and the
//! compiler chokes on stray markup characters, so names are simplified
//! lossily rather than escaped.

use std::sync::LazyLock;

use regex::Regex;

/// Parenthesized qualifier plus at most one leading space, e.g. ` (in module numpy)`.
static PAREN_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?\([^)]+\)").expect("valid regex"));

/// Normalize a raw index entry name.
///
/// Drops every `<` and `&`, removes all parenthesized groups (with a single
/// leading space), and trims surrounding whitespace. The result may be empty.
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '<' | '&')).collect();
    let without_groups = PAREN_SUFFIX_RE.replace_all(&stripped, "");
    without_groups.trim().to_string()
}
