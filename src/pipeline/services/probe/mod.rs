pub mod ffprobe;
pub mod video_metadata;

pub use ffprobe::FfprobeProbe;
pub use video_metadata::{resolve_fps, FixedFrameRate, FrameRate, MetadataProbe, VideoMetadata};
