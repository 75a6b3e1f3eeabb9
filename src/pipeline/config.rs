use crate::error::AnalysisError;
use serde::Deserialize;

/// Tunable parameters of the color analysis.
///
/// The luminance band thresholds (70/30) are not part of this struct, they are
/// fixed by [`LuminanceBand`](crate::pipeline::LuminanceBand).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Clusters per frame palette and per movie-level band palette.
    pub k: usize,
    /// Frames are resampled to a `frame_size` x `frame_size` square.
    pub frame_size: u32,
    pub min_luminance: f64,
    pub max_luminance: f64,
    /// Upper bound on the pooled pixel count fed to the movie-level clustering.
    pub pool_cap: usize,
    /// Seed for k-means initialization and pool subsampling.
    pub seed: u64,
    pub max_iterations: usize,
    /// Convergence threshold, relative to the mean per-axis variance of the data.
    pub tolerance: f64,
    pub letterbox_band_ratio: f64,
    pub letterbox_max_mean: f32,
    pub letterbox_max_std: f32,
    pub fallback_fps: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            k: 5,
            frame_size: 64,
            min_luminance: 5.0,
            max_luminance: 95.0,
            pool_cap: 100_000,
            seed: 0,
            max_iterations: 300,
            tolerance: 1e-4,
            letterbox_band_ratio: 0.1,
            letterbox_max_mean: 0.05,
            letterbox_max_std: 0.02,
            fallback_fps: 24.0,
        }
    }
}

impl AnalysisConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.k == 0 {
            return Err(invalid("Cluster count k must be greater than 0"));
        }

        if self.frame_size == 0 {
            return Err(invalid("Frame size must be greater than 0"));
        }

        if !(self.min_luminance <= self.max_luminance) {
            return Err(invalid(
                "Minimum luminance must not exceed maximum luminance",
            ));
        }

        if self.pool_cap == 0 {
            return Err(invalid("Pool cap must be greater than 0"));
        }

        if self.max_iterations == 0 {
            return Err(invalid("Max iterations must be greater than 0"));
        }

        if !(self.tolerance >= 0.0) {
            return Err(invalid("Tolerance must be non-negative"));
        }

        if !(self.letterbox_band_ratio > 0.0 && self.letterbox_band_ratio <= 0.5) {
            return Err(invalid("Letterbox band ratio must be in (0.0, 0.5]"));
        }

        if !(self.fallback_fps.is_finite() && self.fallback_fps > 0.0) {
            return Err(invalid("Fallback FPS must be a positive number"));
        }

        Ok(())
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_frame_size(mut self, frame_size: u32) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn with_pool_cap(mut self, pool_cap: usize) -> Self {
        self.pool_cap = pool_cap;
        self
    }

    pub fn with_luminance_range(mut self, min_luminance: f64, max_luminance: f64) -> Self {
        self.min_luminance = min_luminance;
        self.max_luminance = max_luminance;
        self
    }
}

fn invalid(message: &str) -> AnalysisError {
    AnalysisError::InvalidConfig(message.to_string())
}
