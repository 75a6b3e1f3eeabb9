/// States of an analysis run, in the order a successful run visits them.
/// `Done` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelinePhase {
    Idle,
    Listing,
    PerFrame,
    Pooling,
    Aggregating,
    Writing,
    Done,
    Failed,
}

impl PipelinePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelinePhase::Idle => "Idle",
            PipelinePhase::Listing => "Listing",
            PipelinePhase::PerFrame => "PerFrame",
            PipelinePhase::Pooling => "Pooling",
            PipelinePhase::Aggregating => "Aggregating",
            PipelinePhase::Writing => "Writing",
            PipelinePhase::Done => "Done",
            PipelinePhase::Failed => "Failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelinePhase::Done | PipelinePhase::Failed)
    }
}
