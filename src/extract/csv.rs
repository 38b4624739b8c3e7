//! Comma-separated import
//!
//! One card per line, split on the first comma only so the description side
//! may itself contain commas.

use crate::cards::CardDraft;

/// Parse file content into drafts. Lines without a comma, or with an empty
/// side, are dropped.
pub fn parse(content: &str) -> Vec<CardDraft> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let (front, back) = line.split_once(',')?;
            CardDraft::new(front, back)
        })
        .collect()
}
