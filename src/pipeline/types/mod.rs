pub mod analysis_result;
pub mod lab_pixel;
pub mod luminance_band;
pub mod palette;

pub use analysis_result::{AnalysisResult, FrameAnalysis, MoviePalettes};
pub use lab_pixel::{LabPixel, PixelSet};
pub use luminance_band::LuminanceBand;
pub use palette::Palette;
