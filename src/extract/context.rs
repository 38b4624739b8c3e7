//! Context synthesis for highlighted keywords
//!
//! Pairs each highlighted line with a definition taken from the line itself
//! or from the nearest run of non-highlighted neighbors.

use crate::cards::CardDraft;
use crate::vision::recognizer::PositionedLine;

use super::{split_on_first_delimiter, CONTEXT_DELIMITERS};

/// Derive one draft per eligible highlighted line, in document order.
///
/// A keyword longer than `max_keyword_len` characters (or empty after
/// trimming) is skipped. The definition comes from an in-line delimiter
/// split when possible, otherwise from up to `window` neighboring lines:
/// the lines after the keyword first, the lines before it only when the
/// forward scan found nothing. Either scan stops at the next highlighted
/// line. A keyword with no usable context yields no draft.
pub fn synthesize(
    lines: &[PositionedLine],
    window: usize,
    max_keyword_len: usize,
) -> Vec<CardDraft> {
    let mut drafts = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if !line.highlighted {
            continue;
        }

        let keyword = line.text.trim();
        if keyword.is_empty() || keyword.chars().count() > max_keyword_len {
            continue;
        }

        if let Some((front, back)) = split_on_first_delimiter(keyword, CONTEXT_DELIMITERS, None) {
            if back != front {
                if let Some(draft) = CardDraft::new(&front, &back) {
                    drafts.push(draft);
                    continue;
                }
            }
        }

        let mut context: Vec<&str> = Vec::new();
        for next in lines.iter().skip(index + 1).take(window) {
            if next.highlighted {
                break;
            }
            let text = next.text.trim();
            if !text.is_empty() {
                context.push(text);
            }
        }

        if context.is_empty() {
            for previous in lines[..index].iter().rev().take(window) {
                if previous.highlighted {
                    break;
                }
                let text = previous.text.trim();
                if !text.is_empty() {
                    context.insert(0, text);
                }
            }
        }

        let back = context.join(" ");
        if let Some(draft) = CardDraft::new(keyword, &back) {
            drafts.push(draft);
        }
    }

    drafts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::recognizer::NormalizedRect;

    fn line(text: &str, highlighted: bool) -> PositionedLine {
        PositionedLine {
            text: text.to_string(),
            bounds: NormalizedRect {
                x: 0.0,
                y: 0.0,
                width: 1.0,
                height: 0.1,
            },
            highlighted,
        }
    }

    #[test]
    fn same_line_split_takes_precedence() {
        let lines = vec![line("Swift：Appleの言語", true), line("unused context", false)];
        let drafts = synthesize(&lines, 3, 50);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].front, "Swift");
        assert_eq!(drafts[0].back, "Appleの言語");
    }

    #[test]
    fn forward_scan_collects_following_lines() {
        let lines = vec![
            line("光合成", true),
            line("植物が光から", false),
            line("養分を作る反応", false),
            line("", false),
            line("beyond the window", false),
        ];
        let drafts = synthesize(&lines, 3, 50);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].front, "光合成");
        assert_eq!(drafts[0].back, "植物が光から 養分を作る反応");
    }

    #[test]
    fn forward_scan_stops_at_next_highlight() {
        // highlights at indices 2 and 4: the scan for index 2 reads index 3
        // only and never index 4's text
        let lines = vec![
            line("intro", false),
            line("intro2", false),
            line("用語一", true),
            line("定義一", false),
            line("用語二", true),
            line("定義二", false),
        ];
        let drafts = synthesize(&lines, 3, 50);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].front, "用語一");
        assert_eq!(drafts[0].back, "定義一");
        assert_eq!(drafts[1].front, "用語二");
        assert_eq!(drafts[1].back, "定義二");
    }

    #[test]
    fn backward_scan_preserves_document_order() {
        let lines = vec![
            line("前の行その一", false),
            line("前の行その二", false),
            line("結論", true),
        ];
        let drafts = synthesize(&lines, 3, 50);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].back, "前の行その一 前の行その二");
    }

    #[test]
    fn backward_scan_stops_at_highlight() {
        let lines = vec![
            line("unreachable", false),
            line("other keyword", true),
            line("nearby", false),
            line("keyword", true),
        ];
        let drafts = synthesize(&lines, 3, 50);
        // "other keyword" pairs forward with "nearby"; "keyword" walks
        // backward, takes "nearby", then stops at "other keyword"
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[1].front, "keyword");
        assert_eq!(drafts[1].back, "nearby");
    }

    #[test]
    fn keyword_length_boundary() {
        let fifty = "あ".repeat(50);
        let fifty_one = "あ".repeat(51);
        let lines = vec![
            line(&fifty, true),
            line("定義", false),
            line(&fifty_one, true),
            line("定義", false),
        ];
        let drafts = synthesize(&lines, 3, 50);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].front, fifty);
    }

    #[test]
    fn keyword_without_context_is_skipped() {
        let lines = vec![line("孤立した用語", true)];
        assert!(synthesize(&lines, 3, 50).is_empty());
    }

    #[test]
    fn degenerate_split_falls_back_to_scan() {
        // the in-line split yields back == front, so the neighbor supplies
        // the definition for the full keyword text
        let lines = vec![line("X：X", true), line("説明", false)];
        let drafts = synthesize(&lines, 3, 50);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].front, "X：X");
        assert_eq!(drafts[0].back, "説明");
    }
}
