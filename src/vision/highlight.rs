//! Highlight detection
//!
//! Classifies whether the glyph pixels under a recognized line are colored
//! (red ink, marker, print emphasis) rather than plain black or gray text.
//! The classification is a pure function of the pixel data and thresholds.

use crate::config::HighlightThresholds;
use crate::imaging::Bitmap;
use crate::vision::recognizer::NormalizedRect;

const RED_MIN: u8 = 120;
const RED_DOMINANCE: f64 = 1.6;
const BLUE_MIN: u8 = 120;
const BLUE_OVER_RED: f64 = 1.4;
const BLUE_OVER_GREEN: f64 = 1.3;
const GREEN_MIN: u8 = 100;
const GREEN_DOMINANCE: f64 = 1.4;
const VIVID_MIN_SATURATION: f64 = 0.4;
const VIVID_MIN_CHANNEL: u8 = 100;

/// Tally of glyph-candidate pixels in one line's region
#[derive(Debug, Default, Clone, Copy)]
struct ColorSample {
    /// Pixels dark enough to be glyph candidates
    dark: usize,
    /// Dark pixels that also read as colored
    colored: usize,
}

/// Pixel-space rectangle after mapping and clamping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PixelRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Classify the region under `bounds`. Regions with too few dark pixels, or
/// that clamp to zero area, are never highlighted.
pub fn is_highlighted(
    bitmap: &Bitmap,
    bounds: &NormalizedRect,
    thresholds: &HighlightThresholds,
) -> bool {
    let Some(rect) = map_to_pixels(bounds, bitmap.width, bitmap.height) else {
        return false;
    };

    let region = bitmap.crop(rect.x, rect.y, rect.width, rect.height);
    let sample = sample_region(&region, thresholds);

    if sample.dark <= thresholds.min_dark_samples {
        return false;
    }

    sample.colored as f64 / sample.dark as f64 > thresholds.min_colored_ratio
}

/// Map a normalized box (unit square, bottom-left origin) onto the
/// top-left-origin pixel grid and clamp it to the image. Returns `None`
/// when the clamped rectangle has no area.
fn map_to_pixels(bounds: &NormalizedRect, image_width: u32, image_height: u32) -> Option<PixelRect> {
    if image_width == 0 || image_height == 0 {
        return None;
    }

    let w = f64::from(image_width);
    let h = f64::from(image_height);

    // The recognizer's origin is at the bottom-left, the pixel buffer's at
    // the top-left: flip the vertical axis.
    let x = bounds.x * w;
    let y = (1.0 - bounds.y - bounds.height) * h;
    let width = (bounds.width * w).max(1.0);
    let height = (bounds.height * h).max(1.0);

    let left = x.max(0.0) as u32;
    let top = y.max(0.0) as u32;
    let right = (x + width).min(w) as u32;
    let bottom = (y + height).min(h) as u32;

    if right <= left || bottom <= top {
        return None;
    }

    Some(PixelRect {
        x: left,
        y: top,
        width: right - left,
        height: bottom - top,
    })
}

/// Tally dark and colored pixels over the region, visiting at most roughly
/// `sample_budget` pixels via a uniform stride.
fn sample_region(region: &[u8], thresholds: &HighlightThresholds) -> ColorSample {
    let total = region.len() / 4;
    let stride = (total / thresholds.sample_budget).max(1);

    let mut sample = ColorSample::default();

    for index in (0..total).step_by(stride) {
        let offset = index * 4;
        let r = region[offset];
        let g = region[offset + 1];
        let b = region[offset + 2];

        let brightness =
            (u32::from(r) + u32::from(g) + u32::from(b)) as f64 / (3.0 * 255.0);
        if brightness >= thresholds.max_brightness {
            continue;
        }

        sample.dark += 1;
        if is_colored(r, g, b) {
            sample.colored += 1;
        }
    }

    sample
}

/// One of four predicates: red-like, blue-like, green-like, or vivid
/// (saturated catch-all).
fn is_colored(r: u8, g: u8, b: u8) -> bool {
    let rf = f64::from(r);
    let gf = f64::from(g);
    let bf = f64::from(b);

    let red_like = r > RED_MIN && rf > RED_DOMINANCE * gf && rf > RED_DOMINANCE * bf;
    let blue_like = b > BLUE_MIN && bf > BLUE_OVER_RED * rf && bf > BLUE_OVER_GREEN * gf;
    let green_like = g > GREEN_MIN && gf > GREEN_DOMINANCE * rf && gf > GREEN_DOMINANCE * bf;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let vivid = max > VIVID_MIN_CHANNEL
        && f64::from(max - min) / f64::from(max) > VIVID_MIN_SATURATION;

    red_like || blue_like || green_like || vivid
}
