use std::path::PathBuf;
use thiserror::Error;

// Main Application Error Type

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Analysis Error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("Settings Error: {0}")]
    Settings(#[from] config::ConfigError),
}

// Analysis Error Type
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Failed to read frame directory {0}: {1}")]
    FrameDirectory(PathBuf, std::io::Error),
    #[error("No frames found in {0}. Run extract first.")]
    NoFrames(PathBuf),
    #[error("Failed to decode frame {path}: {source}")]
    FrameDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Failed to write analysis to {0}: {1}")]
    Output(PathBuf, std::io::Error),
    #[error("Failed to serialize analysis: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// Metadata probe errors never abort a run, the pipeline falls back to a fixed frame rate.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Failed to launch ffprobe: {0}")]
    Unavailable(std::io::Error),
    #[error("ffprobe exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("Failed to parse ffprobe output: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("No video stream found")]
    MissingStream,
    #[error("Invalid frame rate: {0}")]
    InvalidFrameRate(String),
}
