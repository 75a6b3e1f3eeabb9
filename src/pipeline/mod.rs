pub mod config;
pub mod orchestration;
pub mod services;
pub mod types;

pub use config::AnalysisConfig;
pub use orchestration::{AnalysisPipeline, PipelinePhase, ProgressObserver, ResultWriter};
pub use types::{AnalysisResult, FrameAnalysis, LabPixel, LuminanceBand, MoviePalettes, Palette};
