use super::kmeans::KMeans;
use crate::pipeline::types::{LabPixel, LuminanceBand, MoviePalettes, Palette, PixelSet};
use tracing::debug;

/// Pooled pixels split by [`LuminanceBand`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BandPartition {
    pub light: PixelSet,
    pub medium: PixelSet,
    pub dark: PixelSet,
}

impl BandPartition {
    pub fn len(&self) -> usize {
        self.light.len() + self.medium.len() + self.dark.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds the light/medium/dark/overall palettes from the pooled pixels of a run.
#[derive(Debug, Clone)]
pub struct MoviePaletteAggregator {
    kmeans: KMeans,
}

impl MoviePaletteAggregator {
    /// `kmeans` supplies seed and iteration limits; its `k` is overridden per call.
    pub fn new(kmeans: KMeans) -> Self {
        Self { kmeans }
    }

    pub fn partition(pixels: &[LabPixel]) -> BandPartition {
        let mut partition = BandPartition::default();
        for pixel in pixels {
            match LuminanceBand::of(pixel) {
                LuminanceBand::Light => partition.light.push(*pixel),
                LuminanceBand::Medium => partition.medium.push(*pixel),
                LuminanceBand::Dark => partition.dark.push(*pixel),
            }
        }
        partition
    }

    /// A band with fewer than `k` pixels gets an empty palette; there is no gray
    /// fallback at this level.
    pub fn aggregate(&self, pixels: &[LabPixel], k: usize) -> MoviePalettes {
        let bands = Self::partition(pixels);
        debug!(
            "Band sizes: light={} medium={} dark={} overall={}",
            bands.light.len(),
            bands.medium.len(),
            bands.dark.len(),
            pixels.len()
        );

        MoviePalettes {
            light: self.band_palette(LuminanceBand::Light.as_str(), &bands.light, k),
            medium: self.band_palette(LuminanceBand::Medium.as_str(), &bands.medium, k),
            dark: self.band_palette(LuminanceBand::Dark.as_str(), &bands.dark, k),
            overall: self.band_palette("overall", pixels, k),
        }
    }

    fn band_palette(&self, band: &str, pixels: &[LabPixel], k: usize) -> Palette {
        if k == 0 || pixels.len() < k {
            debug!(
                "Band '{}' has {} pixels, fewer than k={}, leaving palette empty",
                band,
                pixels.len(),
                k
            );
            return Palette::empty();
        }
        KMeans { k, ..self.kmeans }.fit(pixels).into_palette()
    }
}

impl Default for MoviePaletteAggregator {
    fn default() -> Self {
        Self::new(KMeans::new(6))
    }
}
