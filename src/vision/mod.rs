//! Recognition pipeline
//!
//! Sequences line acquisition, highlight classification, and card draft
//! extraction. One recognition request is one pipeline run with no shared
//! state; a run never mixes the context and fallback strategies.

pub mod highlight;
pub mod recognizer;

pub use recognizer::{
    NormalizedRect, PositionedLine, RawObservation, RecognizeOptions, TextRecognizer,
};

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::cards::CardDraft;
use crate::config::ExtractionConfig;
use crate::extract::{context, patterns};
use crate::imaging::Bitmap;

/// Result of one pipeline run
#[derive(Debug, Serialize)]
pub struct ExtractionOutcome {
    /// All recognized text joined by newline in document order, shown to
    /// the user for manual card authoring when extraction found nothing
    pub raw_text: String,
    /// Extracted drafts, in document order
    pub drafts: Vec<CardDraft>,
}

/// Card extraction pipeline over an external text recognizer
pub struct RecognitionPipeline {
    recognizer: Box<dyn TextRecognizer>,
    config: ExtractionConfig,
}

impl RecognitionPipeline {
    /// Create a pipeline with default configuration
    pub fn new(recognizer: Box<dyn TextRecognizer>) -> Self {
        Self::with_config(recognizer, ExtractionConfig::default())
    }

    /// Create a pipeline with custom configuration
    pub fn with_config(recognizer: Box<dyn TextRecognizer>, config: ExtractionConfig) -> Self {
        Self { recognizer, config }
    }

    /// Run the full pipeline on a decoded bitmap
    pub async fn process(&self, bitmap: &Bitmap) -> ExtractionOutcome {
        let options = RecognizeOptions {
            languages: self.config.recognition.languages.clone(),
            accurate: self.config.recognition.accurate,
            language_correction: self.config.recognition.language_correction,
        };

        let lines = recognizer::acquire_lines(self.recognizer.as_ref(), bitmap, &options).await;
        debug!(lines = lines.len(), "acquired recognized lines");

        extract_from_lines(lines, Some(bitmap), &self.config)
    }
}

/// Classify already-acquired lines and select an extraction strategy.
///
/// With a bitmap, each line's region is classified for highlight; without
/// one, every line is treated as not-highlighted and the fallback
/// strategies apply.
pub fn extract_from_lines(
    mut lines: Vec<PositionedLine>,
    bitmap: Option<&Bitmap>,
    config: &ExtractionConfig,
) -> ExtractionOutcome {
    if let Some(bitmap) = bitmap {
        for line in &mut lines {
            line.highlighted = highlight::is_highlighted(bitmap, &line.bounds, &config.classifier);
        }
    }

    let raw_text = lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let highlighted = lines.iter().filter(|line| line.highlighted).count();

    let drafts = if highlighted > 0 {
        debug!(highlighted, "synthesizing context for highlighted keywords");
        context::synthesize(&lines, config.context.window, config.context.max_keyword_len)
    } else {
        let texts: Vec<String> = lines
            .iter()
            .map(|line| line.text.trim().to_string())
            .filter(|text| !text.is_empty())
            .collect();
        debug!(lines = texts.len(), "no highlight signal, using pattern fallback");
        patterns::extract(&texts, config.patterns.max_front_len)
    };

    info!(cards = drafts.len(), "extraction complete");

    ExtractionOutcome { raw_text, drafts }
}

/// Run recognition on a background task and deliver the outcome once.
///
/// The result is always delivered even if the receiver was dropped; the
/// send result is ignored so a late, now-irrelevant outcome is a no-op.
pub fn spawn_recognition(
    pipeline: Arc<RecognitionPipeline>,
    bitmap: Bitmap,
) -> oneshot::Receiver<ExtractionOutcome> {
    let (sender, receiver) = oneshot::channel();
    tokio::spawn(async move {
        let outcome = pipeline.process(&bitmap).await;
        let _ = sender.send(outcome);
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    /// Recognizer stub that replays a fixed set of observations
    struct FixedRecognizer {
        observations: Vec<RawObservation>,
    }

    #[async_trait]
    impl TextRecognizer for FixedRecognizer {
        async fn recognize(
            &self,
            _bitmap: &Bitmap,
            _options: &RecognizeOptions,
        ) -> Result<Vec<RawObservation>> {
            Ok(self.observations.clone())
        }
    }

    fn white_bitmap(width: u32, height: u32) -> Bitmap {
        Bitmap::new(vec![255; (width * height * 4) as usize], width, height)
    }

    fn plain_line(text: &str) -> PositionedLine {
        PositionedLine {
            text: text.to_string(),
            bounds: NormalizedRect {
                x: 0.0,
                y: 0.5,
                width: 1.0,
                height: 0.1,
            },
            highlighted: false,
        }
    }

    fn observation(text: &str, y: f64) -> RawObservation {
        RawObservation {
            text: text.to_string(),
            bounds: NormalizedRect {
                x: 0.1,
                y,
                width: 0.8,
                height: 0.05,
            },
        }
    }

    #[test]
    fn raw_text_joins_lines_in_document_order() {
        let lines = vec![plain_line("一行目"), plain_line("二行目")];
        let outcome = extract_from_lines(lines, None, &ExtractionConfig::default());
        assert_eq!(outcome.raw_text, "一行目\n二行目");
    }

    #[test]
    fn empty_input_yields_empty_outcome() {
        let outcome = extract_from_lines(Vec::new(), None, &ExtractionConfig::default());
        assert!(outcome.raw_text.is_empty());
        assert!(outcome.drafts.is_empty());
    }

    #[test]
    fn fallback_strategy_runs_without_highlights() {
        let lines = vec![plain_line("Swift：Appleの言語"), plain_line("脚注")];
        let outcome = extract_from_lines(lines, None, &ExtractionConfig::default());
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].front, "Swift");
    }

    #[test]
    fn highlight_path_is_exclusive() {
        // the third line would match Strategy A, but any highlight routes
        // the whole run through context synthesis
        let mut keyword = plain_line("光合成");
        keyword.highlighted = true;
        let lines = vec![
            keyword,
            plain_line("植物が養分を作る反応"),
            plain_line("別の用語：別の定義"),
        ];
        let outcome = extract_from_lines(lines, None, &ExtractionConfig::default());
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].front, "光合成");
        assert_eq!(
            outcome.drafts[0].back,
            "植物が養分を作る反応 別の用語：別の定義"
        );
    }

    #[test]
    fn classification_against_bitmap_marks_no_lines_on_white_pages() {
        let bitmap = white_bitmap(10, 10);
        let lines = vec![plain_line("用語A"), plain_line("定義A")];
        let outcome = extract_from_lines(lines, Some(&bitmap), &ExtractionConfig::default());
        // white page: no highlight, the two lines pair up
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].front, "用語A");
    }

    #[test]
    fn repeated_runs_are_identical() {
        let config = ExtractionConfig::default();
        let lines = vec![
            plain_line("1. 犬"),
            plain_line("A dog"),
            plain_line("2. 猫"),
            plain_line("A cat"),
        ];
        let first = extract_from_lines(lines.clone(), None, &config);
        let second = extract_from_lines(lines, None, &config);
        assert_eq!(first.raw_text, second.raw_text);
        assert_eq!(first.drafts, second.drafts);
    }

    #[tokio::test]
    async fn process_orders_lines_before_extraction() {
        let recognizer = FixedRecognizer {
            observations: vec![observation("定義A", 0.4), observation("用語A", 0.8)],
        };
        let pipeline = RecognitionPipeline::new(Box::new(recognizer));
        let outcome = pipeline.process(&white_bitmap(10, 10)).await;
        assert_eq!(outcome.raw_text, "用語A\n定義A");
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].front, "用語A");
        assert_eq!(outcome.drafts[0].back, "定義A");
    }

    #[tokio::test]
    async fn spawned_recognition_delivers_once() {
        let recognizer = FixedRecognizer {
            observations: vec![observation("猫：ネコ科の動物", 0.5)],
        };
        let pipeline = Arc::new(RecognitionPipeline::new(Box::new(recognizer)));
        let receiver = spawn_recognition(pipeline, white_bitmap(10, 10));
        let outcome = receiver.await.expect("outcome is always delivered");
        assert_eq!(outcome.drafts.len(), 1);
        assert_eq!(outcome.drafts[0].front, "猫");
    }
}
