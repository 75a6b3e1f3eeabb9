pub mod config;
pub mod error;
pub mod pipeline;

pub use config::Settings;
pub use error::{AnalysisError, AppError, ProbeError};
pub use pipeline::{AnalysisConfig, AnalysisPipeline, AnalysisResult};
