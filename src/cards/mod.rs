//! Card entities
//!
//! Drafts are the editable staging objects produced by extraction; a draft
//! becomes a flashcard only on explicit user confirmation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An editable front/back pair staged for user confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDraft {
    /// Question side
    pub front: String,
    /// Answer side
    pub back: String,
    /// Whether the user has kept this draft selected for commitment
    pub selected: bool,
}

impl CardDraft {
    /// Build a draft from untrimmed sides.
    /// Returns `None` when either side trims to nothing.
    pub fn new(front: &str, back: &str) -> Option<Self> {
        let front = front.trim();
        let back = back.trim();
        if front.is_empty() || back.is_empty() {
            return None;
        }
        Some(Self {
            front: front.to_string(),
            back: back.to_string(),
            selected: true,
        })
    }
}

/// A committed flashcard handed to downstream consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flashcard {
    /// Stable card identifier
    pub id: Uuid,
    /// Question side
    pub front: String,
    /// Answer side
    pub back: String,
    /// Whether the card has been mastered in review
    pub mastered: bool,
}

impl Flashcard {
    /// Create a new, not-yet-mastered flashcard
    pub fn new(front: &str, back: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            front: front.to_string(),
            back: back.to_string(),
            mastered: false,
        }
    }
}

/// Convert the selected drafts into flashcards, consuming the staging list
pub fn commit_selected(drafts: Vec<CardDraft>) -> Vec<Flashcard> {
    drafts
        .into_iter()
        .filter(|draft| draft.selected)
        .map(|draft| Flashcard::new(&draft.front, &draft.back))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_trims_both_sides() {
        let draft = CardDraft::new("  Swift  ", " Apple language ").unwrap();
        assert_eq!(draft.front, "Swift");
        assert_eq!(draft.back, "Apple language");
        assert!(draft.selected);
    }

    #[test]
    fn draft_rejects_empty_sides() {
        assert!(CardDraft::new("", "back").is_none());
        assert!(CardDraft::new("front", "   ").is_none());
    }

    #[test]
    fn commit_keeps_only_selected_drafts() {
        let mut kept = CardDraft::new("a", "b").unwrap();
        let mut dropped = CardDraft::new("c", "d").unwrap();
        kept.selected = true;
        dropped.selected = false;

        let cards = commit_selected(vec![kept, dropped]);
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].front, "a");
        assert!(!cards[0].mastered);
    }
}
