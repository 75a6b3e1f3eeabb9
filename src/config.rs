use crate::pipeline::AnalysisConfig;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const SETTINGS_FILE: &str = "cinechroma";
const ENV_PREFIX: &str = "CINECHROMA";

/// Run-level settings: where frames come from, where the analysis goes,
/// and the tunables handed to the analysis pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub frames_dir: PathBuf,
    pub output: PathBuf,
    /// Source video, only used to probe the frame rate for timestamps.
    pub video: Option<PathBuf>,
    pub log_level: String,
    pub analysis: AnalysisConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frames_dir: PathBuf::from("frames"),
            output: PathBuf::from("output/analysis.json"),
            video: None,
            log_level: "info".to_string(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Settings {
    /// Layers defaults, an optional settings file and `CINECHROMA_*` environment
    /// variables (`__` separates nested keys, e.g. `CINECHROMA_ANALYSIS__K=6`).
    ///
    /// Without an explicit path, `cinechroma.{toml,json,yaml,...}` in the working
    /// directory is picked up when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(SETTINGS_FILE).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn tracing_level(&self) -> tracing::Level {
        self.log_level
            .parse()
            .unwrap_or(tracing::Level::INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "frames_dir = \"stills\"\n[analysis]\nk = 6").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.frames_dir, PathBuf::from("stills"));
        assert_eq!(settings.output, PathBuf::from("output/analysis.json"));
        assert_eq!(settings.analysis.k, 6);
        assert_eq!(settings.analysis.pool_cap, 100_000);
        assert!(settings.video.is_none());
    }

    #[test]
    fn unknown_log_level_defaults_to_info() {
        let settings = Settings {
            log_level: "chatty".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.tracing_level(), tracing::Level::INFO);

        let settings = Settings {
            log_level: "debug".to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.tracing_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn environment_overrides_nested_analysis_keys() {
        // Keys not read by the other tests here, which load settings concurrently.
        std::env::set_var("CINECHROMA_ANALYSIS__SEED", "42");
        std::env::set_var("CINECHROMA_ANALYSIS__MAX_ITERATIONS", "17");

        let settings = Settings::load(None);

        std::env::remove_var("CINECHROMA_ANALYSIS__SEED");
        std::env::remove_var("CINECHROMA_ANALYSIS__MAX_ITERATIONS");

        let settings = settings.unwrap();
        assert_eq!(settings.analysis.seed, 42);
        assert_eq!(settings.analysis.max_iterations, 17);
    }
}
