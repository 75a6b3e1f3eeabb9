use crate::error::AnalysisError;
use crate::pipeline::types::AnalysisResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// Destination for a finished analysis
pub trait ResultWriter {
    fn write(&mut self, result: &AnalysisResult) -> Result<(), AnalysisError>;
}

/// Pretty-printed JSON file, parent directories created on demand
#[derive(Debug, Clone)]
pub struct JsonFileWriter {
    path: PathBuf,
}

impl JsonFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultWriter for JsonFileWriter {
    fn write(&mut self, result: &AnalysisResult) -> Result<(), AnalysisError> {
        let bytes = serde_json::to_vec_pretty(result)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| AnalysisError::Output(parent.to_path_buf(), e))?;
        }
        std::fs::write(&self.path, bytes)
            .map_err(|e| AnalysisError::Output(self.path.clone(), e))?;

        info!("Analysis written to {}", self.path.display());
        Ok(())
    }
}

/// In-memory writer (for testing and embedding)
#[derive(Debug, Default)]
pub struct InMemoryResultWriter {
    results: Vec<AnalysisResult>,
}

impl InMemoryResultWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_results(&self) -> &[AnalysisResult] {
        &self.results
    }
}

impl ResultWriter for InMemoryResultWriter {
    fn write(&mut self, result: &AnalysisResult) -> Result<(), AnalysisError> {
        self.results.push(result.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::types::MoviePalettes;

    #[test]
    fn json_writer_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/output/analysis.json");
        let result = AnalysisResult {
            frames: Vec::new(),
            palettes: MoviePalettes::default(),
        };

        JsonFileWriter::new(&path).write(&result).unwrap();

        let written: AnalysisResult =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, result);
    }
}
