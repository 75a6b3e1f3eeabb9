use crate::pipeline::types::{LabPixel, PixelSet};
use tracing::debug;

/// Drops near-black and near-white pixels before clustering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LuminanceFilter {
    pub min_l: f64,
    pub max_l: f64,
}

impl Default for LuminanceFilter {
    fn default() -> Self {
        Self {
            min_l: 5.0,
            max_l: 95.0,
        }
    }
}

impl LuminanceFilter {
    pub fn new(min_l: f64, max_l: f64) -> Self {
        Self { min_l, max_l }
    }

    pub fn accepts(&self, pixel: &LabPixel) -> bool {
        pixel.l >= self.min_l && pixel.l <= self.max_l
    }

    /// Keeps pixels with `min_l <= L <= max_l`. When nothing qualifies the input
    /// is returned as is, so the result is only empty for empty input.
    pub fn filter(&self, pixels: &[LabPixel]) -> PixelSet {
        let kept = self.retain_strict(pixels);
        if kept.is_empty() && !pixels.is_empty() {
            debug!(
                "All {} pixels outside L [{}, {}], keeping unfiltered set",
                pixels.len(),
                self.min_l,
                self.max_l
            );
            return pixels.to_vec();
        }
        kept
    }

    /// Same range check as [`filter`](Self::filter) but without the fallback.
    pub fn retain_strict(&self, pixels: &[LabPixel]) -> PixelSet {
        pixels
            .iter()
            .filter(|pixel| self.accepts(pixel))
            .copied()
            .collect()
    }
}
