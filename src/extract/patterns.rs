//! Pattern fallback extraction
//!
//! Used when a page carries no highlight signal: first a per-line delimiter
//! split, then, only if that found nothing, consecutive-line pairing.

use tracing::debug;

use crate::cards::CardDraft;

use super::{split_on_first_delimiter, strip_enumeration_prefix, PATTERN_DELIMITERS};

/// Run the fallback strategies over trimmed, non-empty line texts.
pub fn extract(lines: &[String], max_front_len: usize) -> Vec<CardDraft> {
    let drafts = split_lines(lines, max_front_len);
    if !drafts.is_empty() || lines.len() < 2 {
        return drafts;
    }

    debug!(lines = lines.len(), "no delimiter matches, pairing consecutive lines");
    pair_lines(lines)
}

/// Per-line delimiter split. A line that matches no delimiter yields nothing.
fn split_lines(lines: &[String], max_front_len: usize) -> Vec<CardDraft> {
    lines
        .iter()
        .filter_map(|line| {
            let (front, back) =
                split_on_first_delimiter(line, PATTERN_DELIMITERS, Some(max_front_len))?;
            CardDraft::new(&front, &back)
        })
        .collect()
}

/// Pair consecutive lines (0,1), (2,3), ... with enumeration markers
/// stripped from both sides. An odd trailing line is dropped.
fn pair_lines(lines: &[String]) -> Vec<CardDraft> {
    lines
        .chunks_exact(2)
        .filter_map(|pair| {
            let front = strip_enumeration_prefix(&pair[0]);
            let back = strip_enumeration_prefix(&pair[1]);
            CardDraft::new(front, back)
        })
        .collect()
}
