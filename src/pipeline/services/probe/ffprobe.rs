use super::video_metadata::{FrameRate, MetadataProbe, VideoMetadata};
use crate::error::ProbeError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
    format: Option<FfprobeFormat>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    width: Option<u32>,
    height: Option<u32>,
    codec_name: Option<String>,
    pix_fmt: Option<String>,
    color_primaries: Option<String>,
    color_transfer: Option<String>,
    avg_frame_rate: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    // ffprobe reports numbers as strings in its JSON writer.
    duration: Option<String>,
}

/// Reads stream metadata by running `ffprobe` on the source video.
#[derive(Debug, Clone)]
pub struct FfprobeProbe {
    binary: PathBuf,
}

impl Default for FfprobeProbe {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ffprobe"),
        }
    }
}

impl FfprobeProbe {
    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Parses the JSON printed by `ffprobe -of json`.
    pub fn parse_output(stdout: &[u8]) -> Result<VideoMetadata, ProbeError> {
        let output: FfprobeOutput = serde_json::from_slice(stdout)?;
        let stream = output
            .streams
            .into_iter()
            .next()
            .ok_or(ProbeError::MissingStream)?;

        let frame_rate = stream
            .avg_frame_rate
            .as_deref()
            .ok_or_else(|| ProbeError::InvalidFrameRate("missing avg_frame_rate".to_string()))
            .and_then(FrameRate::parse)?;

        let duration = output
            .format
            .and_then(|format| format.duration)
            .and_then(|duration| duration.trim().parse::<f64>().ok());

        Ok(VideoMetadata {
            width: stream.width,
            height: stream.height,
            codec: stream.codec_name,
            pixel_format: stream.pix_fmt,
            color_primaries: stream.color_primaries,
            color_transfer: stream.color_transfer,
            frame_rate,
            duration,
        })
    }
}

impl MetadataProbe for FfprobeProbe {
    fn probe(&self, video: &Path) -> Result<VideoMetadata, ProbeError> {
        debug!("Probing {} with {}", video.display(), self.binary.display());
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-select_streams",
                "v:0",
                "-show_entries",
                "stream=width,height,avg_frame_rate,codec_name,pix_fmt,color_primaries,color_transfer",
                "-show_entries",
                "format=duration",
                "-of",
                "json",
            ])
            .arg(video)
            .output()
            .map_err(ProbeError::Unavailable)?;

        if !output.status.success() {
            return Err(ProbeError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Self::parse_output(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_stream_and_format_entries() {
        let json = br#"{
            "programs": [],
            "streams": [{
                "width": 1920,
                "height": 800,
                "codec_name": "h264",
                "pix_fmt": "yuv420p",
                "color_primaries": "bt709",
                "avg_frame_rate": "24000/1001"
            }],
            "format": { "duration": "5400.125000" }
        }"#;

        let metadata = FfprobeProbe::parse_output(json).unwrap();
        assert_eq!(metadata.width, Some(1920));
        assert_eq!(metadata.height, Some(800));
        assert_eq!(metadata.codec.as_deref(), Some("h264"));
        assert_eq!(metadata.color_transfer, None);
        assert_eq!(metadata.frame_rate, FrameRate::new(24000, 1001));
        assert_eq!(metadata.duration, Some(5400.125));
    }

    #[test]
    fn missing_stream_is_an_error() {
        let result = FfprobeProbe::parse_output(br#"{"streams": [], "format": {}}"#);
        assert!(matches!(result, Err(ProbeError::MissingStream)));
    }

    #[test]
    fn garbage_output_is_a_parse_error() {
        let result = FfprobeProbe::parse_output(b"ffprobe version n6.0");
        assert!(matches!(result, Err(ProbeError::Parse(_))));
    }

    #[test]
    fn zero_denominator_rate_parses_but_has_no_fps() {
        let metadata =
            FfprobeProbe::parse_output(br#"{"streams": [{"avg_frame_rate": "0/0"}]}"#).unwrap();
        assert_eq!(metadata.frame_rate.fps(), None);
    }

    #[test]
    fn missing_binary_is_unavailable() {
        let probe = FfprobeProbe::with_binary("/nonexistent/ffprobe-binary");
        let result = probe.probe(Path::new("movie.mkv"));
        assert!(matches!(result, Err(ProbeError::Unavailable(_))));
    }
}
