//! Card draft extraction heuristics
//!
//! Shared text-surgery utilities plus the three extraction paths: context
//! synthesis for highlighted keywords, pattern fallbacks for pages without
//! a color signal, and the first-comma CSV import.

pub mod context;
pub mod csv;
pub mod patterns;

use regex::Regex;
use std::sync::LazyLock;

/// Delimiters recognized when splitting a highlighted keyword line in place,
/// in priority order.
pub const CONTEXT_DELIMITERS: &[&str] =
    &["：", ":", "→", "⇒", " - ", "＝", "=", "…", "─", "−"];

/// Delimiters recognized by the per-line fallback split, in priority order.
/// Deliberately shorter than [`CONTEXT_DELIMITERS`].
pub const PATTERN_DELIMITERS: &[&str] = &["：", ":", "→", "⇒", " - ", "＝", "="];

/// Leading enumeration marker: ASCII or full-width digits followed by
/// separators, punctuation, or whitespace.
static ENUMERATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9０-９]+[.．)）、\s]+").expect("enumeration prefix pattern is valid")
});

/// Split `line` on the first delimiter (in priority order) that appears in
/// it. The split is applied at every occurrence of that delimiter: the front
/// is the first part, the back is the remaining parts rejoined with the same
/// delimiter. Both sides are trimmed and must be non-empty; when
/// `max_front_len` is given, the front must not exceed it in characters.
///
/// Once a delimiter has been found in the line, later delimiters are not
/// tried: a line whose chosen split fails a constraint yields nothing.
pub fn split_on_first_delimiter(
    line: &str,
    delimiters: &[&str],
    max_front_len: Option<usize>,
) -> Option<(String, String)> {
    let delimiter = *delimiters.iter().find(|d| line.contains(**d))?;

    let parts: Vec<&str> = line.split(delimiter).collect();
    let front = parts[0].trim();
    let back = parts[1..].join(delimiter);
    let back = back.trim();

    if front.is_empty() || back.is_empty() {
        return None;
    }
    if let Some(max) = max_front_len {
        if front.chars().count() > max {
            return None;
        }
    }

    Some((front.to_string(), back.to_string()))
}

/// Strip a leading enumeration marker ("1. ", "１２）", "3、" ...) and trim
/// the remainder.
pub fn strip_enumeration_prefix(text: &str) -> &str {
    match ENUMERATION_PREFIX.find(text) {
        Some(found) => text[found.end()..].trim(),
        None => text.trim(),
    }
}
