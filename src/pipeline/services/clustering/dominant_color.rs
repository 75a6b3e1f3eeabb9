use super::kmeans::KMeans;
use crate::pipeline::config::AnalysisConfig;
use crate::pipeline::services::color::LuminanceFilter;
use crate::pipeline::types::{FrameAnalysis, LabPixel, Palette};
use tracing::debug;

/// Per-frame palette, dominant color and mean color.
#[derive(Debug, Clone)]
pub struct DominantColorExtractor {
    filter: LuminanceFilter,
    seed: u64,
    max_iterations: usize,
    tolerance: f64,
}

impl Default for DominantColorExtractor {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl DominantColorExtractor {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            filter: LuminanceFilter::new(config.min_luminance, config.max_luminance),
            seed: config.seed,
            max_iterations: config.max_iterations,
            tolerance: config.tolerance,
        }
    }

    pub fn kmeans(&self, k: usize) -> KMeans {
        KMeans::new(k)
            .with_seed(self.seed)
            .with_max_iterations(self.max_iterations)
            .with_tolerance(self.tolerance)
    }

    /// Up to `k` colors, most populous first. An empty pixel set yields the
    /// single neutral gray entry.
    pub fn cluster(&self, pixels: &[LabPixel], k: usize) -> Palette {
        let filtered = self.filter.filter(pixels);
        if filtered.is_empty() || k == 0 {
            debug!("No pixels to cluster, using neutral gray palette");
            return Palette::fallback();
        }
        self.kmeans(k).fit(&filtered).into_palette()
    }

    pub fn dominant(&self, pixels: &[LabPixel], k: usize) -> LabPixel {
        self.cluster(pixels, k)
            .dominant()
            .unwrap_or(LabPixel::NEUTRAL_GRAY)
    }

    /// Mean of the pixels inside the luminance range, or neutral gray when
    /// none are.
    pub fn mean(&self, pixels: &[LabPixel]) -> LabPixel {
        let kept = self.filter.retain_strict(pixels);
        LabPixel::mean_of(&kept).unwrap_or_else(|| {
            debug!("No pixels within luminance range, using neutral gray mean");
            LabPixel::NEUTRAL_GRAY
        })
    }

    /// Clusters once and derives the dominant color from that palette.
    pub fn analyze_frame(
        &self,
        name: impl Into<String>,
        timestamp: f64,
        pixels: &[LabPixel],
        k: usize,
    ) -> FrameAnalysis {
        let palette = self.cluster(pixels, k);
        let dominant = palette.dominant().unwrap_or(LabPixel::NEUTRAL_GRAY);
        FrameAnalysis {
            name: name.into(),
            timestamp,
            dominant,
            palette,
            mean: self.mean(pixels),
        }
    }
}
