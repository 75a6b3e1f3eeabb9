use super::pipeline_phase::PipelinePhase;
use crate::pipeline::types::FrameAnalysis;
use tracing::info;

/// Observer pattern for run progress. Implementations decide how to display it;
/// the pipeline keeps no progress state between runs.
pub trait ProgressObserver {
    fn on_phase(&mut self, _phase: PipelinePhase) {}
    fn on_frames_listed(&mut self, _total: usize) {}
    fn on_frame_processed(&mut self, _index: usize, _total: usize, _analysis: &FrameAnalysis) {}
}

/// Ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {}

/// Reports progress through `tracing`, roughly every `every` frames.
#[derive(Debug, Clone, Copy)]
pub struct LoggingProgress {
    every: usize,
}

impl LoggingProgress {
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
        }
    }
}

impl Default for LoggingProgress {
    fn default() -> Self {
        Self::new(25)
    }
}

impl ProgressObserver for LoggingProgress {
    fn on_phase(&mut self, phase: PipelinePhase) {
        match phase {
            PipelinePhase::Aggregating => info!("Computing movie-level palettes"),
            PipelinePhase::Writing => info!("Writing analysis"),
            phase if phase.is_terminal() => info!("Run finished: {}", phase.as_str()),
            _ => {}
        }
    }

    fn on_frames_listed(&mut self, total: usize) {
        info!("Processing {} frames", total);
    }

    fn on_frame_processed(&mut self, index: usize, total: usize, analysis: &FrameAnalysis) {
        let done = index + 1;
        if done % self.every == 0 || done == total {
            info!("Processed {}/{} frames ({})", done, total, analysis.name);
        }
    }
}

/// Counts notifications.
#[derive(Debug, Default, Clone)]
pub struct ProgressCounter {
    pub phases: Vec<PipelinePhase>,
    pub frames_listed: usize,
    pub frames_processed: usize,
}

impl ProgressObserver for ProgressCounter {
    fn on_phase(&mut self, phase: PipelinePhase) {
        self.phases.push(phase);
    }

    fn on_frames_listed(&mut self, total: usize) {
        self.frames_listed = total;
    }

    fn on_frame_processed(&mut self, _index: usize, _total: usize, _analysis: &FrameAnalysis) {
        self.frames_processed += 1;
    }
}
