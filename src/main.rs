use cinechroma::config::Settings;
use cinechroma::error::AppError;
use cinechroma::pipeline::orchestration::{JsonFileWriter, LoggingProgress};
use cinechroma::pipeline::services::probe::FfprobeProbe;
use cinechroma::pipeline::AnalysisPipeline;
use std::path::PathBuf;
use tracing::{info, Level};

fn init_logging(level: Level) {
    tracing_subscriber::fmt().with_max_level(level).init();
}

// Usage: cinechroma [settings-file]
fn main() -> Result<(), AppError> {
    let settings_path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref())?;
    init_logging(settings.tracing_level());

    let pipeline = AnalysisPipeline::builder(settings.analysis.clone())
        .maybe_video(settings.video.clone())
        .probe(Box::new(FfprobeProbe::default()))
        .build()?;

    let mut writer = JsonFileWriter::new(&settings.output);
    let mut progress = LoggingProgress::default();
    let result = pipeline.run_to_writer(&settings.frames_dir, &mut writer, &mut progress)?;

    info!(
        "Analyzed {} frames into {}",
        result.frames.len(),
        writer.path().display()
    );
    Ok(())
}
