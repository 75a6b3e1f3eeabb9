use super::phase_timings::PhaseTimings;
use super::pipeline_phase::PipelinePhase;
use super::progress::ProgressObserver;
use super::result_writer::ResultWriter;
use crate::error::AnalysisError;
use crate::pipeline::config::AnalysisConfig;
use crate::pipeline::services::clustering::{DominantColorExtractor, MoviePaletteAggregator};
use crate::pipeline::services::preprocessing::FramePreprocessor;
use crate::pipeline::services::probe::{resolve_fps, FfprobeProbe, MetadataProbe};
use crate::pipeline::types::{AnalysisResult, PixelSet};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Runs the whole analysis over a directory of frames: per-frame palettes,
/// pooling, then movie-level palettes.
pub struct AnalysisPipeline {
    config: AnalysisConfig,
    preprocessor: FramePreprocessor,
    extractor: DominantColorExtractor,
    aggregator: MoviePaletteAggregator,
    probe: Box<dyn MetadataProbe>,
    video: Option<PathBuf>,
}

impl AnalysisPipeline {
    pub fn builder(config: AnalysisConfig) -> AnalysisPipelineBuilder {
        AnalysisPipelineBuilder::new(config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// PNG files of `frames_dir`, sorted by file name.
    pub fn list_frames(frames_dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
        let entries = std::fs::read_dir(frames_dir)
            .map_err(|e| AnalysisError::FrameDirectory(frames_dir.to_path_buf(), e))?;

        let mut frames = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| AnalysisError::FrameDirectory(frames_dir.to_path_buf(), e))?
                .path();
            let is_png = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
            if is_png && path.is_file() {
                frames.push(path);
            }
        }

        if frames.is_empty() {
            return Err(AnalysisError::NoFrames(frames_dir.to_path_buf()));
        }
        frames.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(frames)
    }

    /// Uniform sample of `cap` pixels without replacement, kept in pool order.
    /// Pools at or below the cap are returned as is.
    pub fn subsample(pool: PixelSet, cap: usize, seed: u64) -> PixelSet {
        if pool.len() <= cap {
            return pool;
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut indices = rand::seq::index::sample(&mut rng, pool.len(), cap).into_vec();
        indices.sort_unstable();
        indices.into_iter().map(|i| pool[i]).collect()
    }

    pub fn run(
        &self,
        frames_dir: &Path,
        progress: &mut dyn ProgressObserver,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.run_inner(frames_dir, None, progress)
    }

    /// Runs the analysis and hands the result to `writer`. Nothing is written
    /// unless every frame was analyzed.
    pub fn run_to_writer(
        &self,
        frames_dir: &Path,
        writer: &mut dyn ResultWriter,
        progress: &mut dyn ProgressObserver,
    ) -> Result<AnalysisResult, AnalysisError> {
        self.run_inner(frames_dir, Some(writer), progress)
    }

    #[instrument(skip_all, fields(frames_dir = %frames_dir.display()))]
    fn run_inner(
        &self,
        frames_dir: &Path,
        writer: Option<&mut dyn ResultWriter>,
        progress: &mut dyn ProgressObserver,
    ) -> Result<AnalysisResult, AnalysisError> {
        progress.on_phase(PipelinePhase::Idle);
        let mut timings = PhaseTimings::new();
        let result = self.execute(frames_dir, writer, &mut timings, progress);

        // The error itself is reported by the caller.
        let terminal = if result.is_ok() {
            PipelinePhase::Done
        } else {
            PipelinePhase::Failed
        };
        timings.finish();
        progress.on_phase(terminal);

        for (phase, duration) in timings.get_all_phase_durations() {
            debug!("Phase {} took {}us", phase.as_str(), duration.as_micros());
        }
        debug!("Run finished as {} in {}us", terminal.as_str(), timings.total().as_micros());

        result
    }

    fn execute(
        &self,
        frames_dir: &Path,
        writer: Option<&mut dyn ResultWriter>,
        timings: &mut PhaseTimings,
        progress: &mut dyn ProgressObserver,
    ) -> Result<AnalysisResult, AnalysisError> {
        let k = self.config.k;

        enter(PipelinePhase::Listing, timings, progress);
        let frame_paths = Self::list_frames(frames_dir)?;
        let fps = resolve_fps(
            self.probe.as_ref(),
            self.video.as_deref(),
            self.config.fallback_fps,
        );
        info!(
            "Analyzing {} frames (k={}, fps={:.2})",
            frame_paths.len(),
            k,
            fps
        );
        progress.on_frames_listed(frame_paths.len());

        enter(PipelinePhase::PerFrame, timings, progress);
        let total = frame_paths.len();
        let mut frames = Vec::with_capacity(total);
        let mut pool: PixelSet = Vec::new();
        for (index, path) in frame_paths.iter().enumerate() {
            let pixels = self.preprocessor.load_and_prepare(path)?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let analysis =
                self.extractor
                    .analyze_frame(name, index as f64 / fps, &pixels, k);
            progress.on_frame_processed(index, total, &analysis);
            frames.push(analysis);
            pool.extend(pixels);
        }

        enter(PipelinePhase::Pooling, timings, progress);
        let pooled = pool.len();
        let pool = Self::subsample(pool, self.config.pool_cap, self.config.seed);
        if pool.len() < pooled {
            debug!("Subsampled pooled pixels from {} to {}", pooled, pool.len());
        }

        enter(PipelinePhase::Aggregating, timings, progress);
        let palettes = self.aggregator.aggregate(&pool, k);

        let result = AnalysisResult { frames, palettes };

        if let Some(writer) = writer {
            enter(PipelinePhase::Writing, timings, progress);
            writer.write(&result)?;
        }

        Ok(result)
    }
}

fn enter(phase: PipelinePhase, timings: &mut PhaseTimings, progress: &mut dyn ProgressObserver) {
    debug!("Entering phase {}", phase.as_str());
    timings.enter(phase);
    progress.on_phase(phase);
}

pub struct AnalysisPipelineBuilder {
    config: AnalysisConfig,
    probe: Option<Box<dyn MetadataProbe>>,
    video: Option<PathBuf>,
}

impl AnalysisPipelineBuilder {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            probe: None,
            video: None,
        }
    }

    // Source video used to probe the frame rate. Without one, timestamps use the fallback FPS.
    pub fn video(mut self, video: impl Into<PathBuf>) -> Self {
        self.video = Some(video.into());
        self
    }

    pub fn maybe_video(mut self, video: Option<PathBuf>) -> Self {
        self.video = video;
        self
    }

    // Replaces the default ffprobe-backed metadata probe.
    pub fn probe(mut self, probe: Box<dyn MetadataProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn build(self) -> Result<AnalysisPipeline, AnalysisError> {
        self.config.validate()?;

        let extractor = DominantColorExtractor::from_config(&self.config);
        let aggregator = MoviePaletteAggregator::new(extractor.kmeans(self.config.k));

        Ok(AnalysisPipeline {
            preprocessor: FramePreprocessor::from_config(&self.config),
            extractor,
            aggregator,
            probe: self
                .probe
                .unwrap_or_else(|| Box::new(FfprobeProbe::default())),
            video: self.video,
            config: self.config,
        })
    }
}
