pub mod analysis_pipeline;
pub mod phase_timings;
pub mod pipeline_phase;
pub mod progress;
pub mod result_writer;

pub use analysis_pipeline::{AnalysisPipeline, AnalysisPipelineBuilder};
pub use phase_timings::PhaseTimings;
pub use pipeline_phase::PipelinePhase;
pub use progress::{LoggingProgress, NoProgress, ProgressCounter, ProgressObserver};
pub use result_writer::{InMemoryResultWriter, JsonFileWriter, ResultWriter};
