use super::{LabPixel, Palette};
use serde::{Deserialize, Serialize};

/// Color summary of a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    #[serde(rename = "frame")]
    pub name: String,
    /// Seconds from the start of the film.
    #[serde(rename = "time")]
    pub timestamp: f64,
    #[serde(rename = "dominant_lab")]
    pub dominant: LabPixel,
    #[serde(rename = "palette_lab")]
    pub palette: Palette,
    #[serde(rename = "mean_lab")]
    pub mean: LabPixel,
}

/// Movie-level palettes, one per luminance band plus one over the whole pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoviePalettes {
    pub light: Palette,
    pub medium: Palette,
    pub dark: Palette,
    pub overall: Palette,
}

/// The analysis document consumed by renderers. All colors are Lab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub frames: Vec<FrameAnalysis>,
    pub palettes: MoviePalettes,
}
