use super::pipeline_phase::PipelinePhase;
use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// Tracks how long a run spends in each phase
#[derive(Debug, Clone, Default)]
pub struct PhaseTimings {
    /// Total duration per phase, in first-entered order
    phase_durations: IndexMap<PipelinePhase, Duration>,
    current: Option<(PipelinePhase, Instant)>,
}

impl PhaseTimings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Closes the running phase, if any, and starts timing `phase`
    pub fn enter(&mut self, phase: PipelinePhase) {
        self.close_current();
        self.current = Some((phase, Instant::now()));
    }

    /// Closes the running phase
    pub fn finish(&mut self) {
        self.close_current();
    }

    pub fn current_phase(&self) -> Option<PipelinePhase> {
        self.current.map(|(phase, _)| phase)
    }

    /// Get total duration for a phase
    pub fn get_phase_duration(&self, phase: &PipelinePhase) -> Duration {
        self.phase_durations
            .get(phase)
            .copied()
            .unwrap_or_default()
    }

    pub fn get_all_phase_durations(&self) -> &IndexMap<PipelinePhase, Duration> {
        &self.phase_durations
    }

    pub fn total(&self) -> Duration {
        self.phase_durations.values().sum()
    }

    fn close_current(&mut self) {
        if let Some((phase, started)) = self.current.take() {
            *self.phase_durations.entry(phase).or_default() += started.elapsed();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_phases_in_entry_order() {
        let mut timings = PhaseTimings::new();
        timings.enter(PipelinePhase::Listing);
        timings.enter(PipelinePhase::PerFrame);
        assert_eq!(timings.current_phase(), Some(PipelinePhase::PerFrame));
        timings.finish();

        let phases: Vec<_> = timings.get_all_phase_durations().keys().copied().collect();
        assert_eq!(phases, vec![PipelinePhase::Listing, PipelinePhase::PerFrame]);
        assert_eq!(timings.current_phase(), None);
        assert_eq!(timings.get_phase_duration(&PipelinePhase::Aggregating), Duration::ZERO);
    }

    #[test]
    fn reentering_a_phase_accumulates() {
        let mut timings = PhaseTimings::new();
        timings.enter(PipelinePhase::PerFrame);
        timings.enter(PipelinePhase::PerFrame);
        timings.finish();
        assert_eq!(timings.get_all_phase_durations().len(), 1);
        assert!(timings.total() >= timings.get_phase_duration(&PipelinePhase::PerFrame));
    }
}
