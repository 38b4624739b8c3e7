//! Text recognition seam
//!
//! The external OCR engine is abstracted behind [`TextRecognizer`]; this
//! module normalizes whatever the engine returns into positioned lines in
//! top-to-bottom document order.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::imaging::Bitmap;

/// Normalized bounding box in the unit square.
///
/// The origin is at the bottom-left of the source image, so a larger `y`
/// means physically higher on the page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One raw line as delivered by the recognizer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawObservation {
    /// Recognized text
    pub text: String,
    /// Normalized bounding box
    #[serde(rename = "box")]
    pub bounds: NormalizedRect,
}

/// Recognition request options
#[derive(Debug, Clone)]
pub struct RecognizeOptions {
    /// Language hints, in preference order
    pub languages: Vec<String>,
    /// Favor accuracy over speed
    pub accurate: bool,
    /// Let the engine apply language-model correction
    pub language_correction: bool,
}

impl Default for RecognizeOptions {
    fn default() -> Self {
        Self {
            languages: vec!["ja".to_string(), "en".to_string()],
            accurate: true,
            language_correction: true,
        }
    }
}

/// External text recognition engine.
///
/// One call is one single-shot request: the result is delivered exactly
/// once and there is no cancellation.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognize text lines in a decoded bitmap
    async fn recognize(
        &self,
        bitmap: &Bitmap,
        options: &RecognizeOptions,
    ) -> Result<Vec<RawObservation>>;
}

/// A recognized line in document order, with its highlight label
#[derive(Debug, Clone)]
pub struct PositionedLine {
    /// Recognized text
    pub text: String,
    /// Normalized bounding box
    pub bounds: NormalizedRect,
    /// Whether the glyph pixels under this line are classified as colored
    pub highlighted: bool,
}

/// Sort observations into document order (descending `y`, the bottom-left
/// origin puts higher lines at larger `y`) and label them not-highlighted.
pub fn into_document_order(mut observations: Vec<RawObservation>) -> Vec<PositionedLine> {
    observations.sort_by(|a, b| b.bounds.y.total_cmp(&a.bounds.y));
    observations
        .into_iter()
        .map(|observation| PositionedLine {
            text: observation.text,
            bounds: observation.bounds,
            highlighted: false,
        })
        .collect()
}

/// Run the recognizer and normalize its output. A recognizer failure is not
/// an extraction failure: the page simply has no lines.
pub async fn acquire_lines(
    recognizer: &dyn TextRecognizer,
    bitmap: &Bitmap,
    options: &RecognizeOptions,
) -> Vec<PositionedLine> {
    match recognizer.recognize(bitmap, options).await {
        Ok(observations) => into_document_order(observations),
        Err(err) => {
            warn!("recognizer failed, treating page as empty: {err:#}");
            Vec::new()
        }
    }
}
