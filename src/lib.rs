//! CardScan - flashcard draft extraction from photographed study material
//!
//! Turns OCR line output (text + normalized bounding boxes) or delimited
//! plain text into editable front/back card drafts. Highlighted keywords
//! are detected by classifying the glyph pixels under each recognized line
//! and paired with a definition from the same line or its neighbors; pages
//! without a color signal fall back to delimiter and pairing heuristics.

pub mod ai;
pub mod cards;
pub mod config;
pub mod extract;
pub mod imaging;
pub mod vision;

pub use cards::{commit_selected, CardDraft, Flashcard};
pub use config::ExtractionConfig;
pub use imaging::Bitmap;
pub use vision::{ExtractionOutcome, RecognitionPipeline};
