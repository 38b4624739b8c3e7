//! Decoded bitmap handling
//!
//! Wraps raw RGBA pixel data with its dimensions and provides region
//! cropping for per-line color analysis.

use anyhow::{Context, Result};
use std::path::Path;

/// A decoded image held as raw RGBA pixels
#[derive(Debug, Clone)]
pub struct Bitmap {
    /// Raw RGBA pixel data, row-major from the top-left
    pub data: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Bitmap {
    /// Create a bitmap from raw RGBA data
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        debug_assert_eq!(data.len(), (width * height * 4) as usize);
        Self {
            data,
            width,
            height,
        }
    }

    /// Decode an image file into a bitmap
    pub fn open(path: &Path) -> Result<Self> {
        let image = image::open(path)
            .with_context(|| format!("failed to decode image {}", path.display()))?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Get dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copy a rectangular region into a tight RGBA buffer.
    /// The rectangle is clamped to the image bounds.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
        let x = x.min(self.width);
        let y = y.min(self.height);
        let width = width.min(self.width - x);
        let height = height.min(self.height - y);

        let mut region = Vec::with_capacity((width * height * 4) as usize);

        for row in y..(y + height) {
            let start = ((row * self.width + x) * 4) as usize;
            let end = start + (width * 4) as usize;
            if end <= self.data.len() {
                region.extend_from_slice(&self.data[start..end]);
            }
        }

        region
    }
}
