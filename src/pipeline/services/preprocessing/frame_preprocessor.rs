use super::letterbox::LetterboxDetector;
use crate::error::AnalysisError;
use crate::pipeline::config::AnalysisConfig;
use crate::pipeline::services::color::{rgb_to_lab, LuminanceFilter};
use crate::pipeline::types::PixelSet;
use image::{imageops::FilterType, Rgb32FImage};
use std::path::Path;

/// Turns a still image on disk into the Lab pixel set used for clustering.
#[derive(Debug, Clone)]
pub struct FramePreprocessor {
    frame_size: u32,
    letterbox: LetterboxDetector,
    filter: LuminanceFilter,
}

impl Default for FramePreprocessor {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl FramePreprocessor {
    pub fn new(frame_size: u32, letterbox: LetterboxDetector, filter: LuminanceFilter) -> Self {
        Self {
            frame_size,
            letterbox,
            filter,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.frame_size,
            LetterboxDetector::new(
                config.letterbox_band_ratio,
                config.letterbox_max_mean,
                config.letterbox_max_std,
            ),
            LuminanceFilter::new(config.min_luminance, config.max_luminance),
        )
    }

    /// Decodes and resamples a frame to a `frame_size` square of normalized RGB.
    pub fn load(&self, path: &Path) -> Result<Rgb32FImage, AnalysisError> {
        let image = image::open(path).map_err(|source| AnalysisError::FrameDecode {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(image
            .resize_exact(self.frame_size, self.frame_size, FilterType::Triangle)
            .to_rgb32f())
    }

    /// Letterbox removal, Lab conversion and luminance filtering, in that order.
    pub fn prepare(&self, image: &Rgb32FImage) -> PixelSet {
        let cropped = self.letterbox.remove(image);
        let lab: PixelSet = cropped
            .pixels()
            .map(|p| rgb_to_lab([f64::from(p[0]), f64::from(p[1]), f64::from(p[2])]))
            .collect();
        self.filter.filter(&lab)
    }

    pub fn load_and_prepare(&self, path: &Path) -> Result<PixelSet, AnalysisError> {
        let image = self.load(path)?;
        Ok(self.prepare(&image))
    }
}
