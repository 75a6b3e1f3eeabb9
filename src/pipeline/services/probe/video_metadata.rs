use crate::error::ProbeError;
use std::fmt;
use std::path::Path;
use tracing::warn;

/// Rational frame rate as reported by container metadata, e.g. `24000/1001`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRate {
    pub numerator: u64,
    pub denominator: u64,
}

impl FrameRate {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Accepts `num/den` or a bare integer.
    pub fn parse(value: &str) -> Result<Self, ProbeError> {
        let value = value.trim();
        let invalid = || ProbeError::InvalidFrameRate(value.to_string());
        match value.split_once('/') {
            Some((num, den)) => Ok(Self::new(
                num.trim().parse().map_err(|_| invalid())?,
                den.trim().parse().map_err(|_| invalid())?,
            )),
            None => Ok(Self::new(value.parse().map_err(|_| invalid())?, 1)),
        }
    }

    /// Frames per second, `None` for a zero denominator or a zero rate.
    pub fn fps(&self) -> Option<f64> {
        if self.denominator == 0 {
            return None;
        }
        let fps = self.numerator as f64 / self.denominator as f64;
        (fps.is_finite() && fps > 0.0).then_some(fps)
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Properties of the first video stream of a file.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub codec: Option<String>,
    pub pixel_format: Option<String>,
    pub color_primaries: Option<String>,
    pub color_transfer: Option<String>,
    pub frame_rate: FrameRate,
    /// Seconds.
    pub duration: Option<f64>,
}

/// Source of video metadata for timestamping frames.
pub trait MetadataProbe {
    fn probe(&self, video: &Path) -> Result<VideoMetadata, ProbeError>;
}

/// Probe that reports a constant frame rate without touching the file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedFrameRate(pub FrameRate);

impl MetadataProbe for FixedFrameRate {
    fn probe(&self, _video: &Path) -> Result<VideoMetadata, ProbeError> {
        Ok(VideoMetadata {
            width: None,
            height: None,
            codec: None,
            pixel_format: None,
            color_primaries: None,
            color_transfer: None,
            frame_rate: self.0,
            duration: None,
        })
    }
}

/// Frames per second for timestamps. Falls back to `fallback` when there is no
/// video, the probe fails, or the reported rate is degenerate.
pub fn resolve_fps(probe: &dyn MetadataProbe, video: Option<&Path>, fallback: f64) -> f64 {
    let Some(video) = video else {
        warn!("No source video configured, assuming {} FPS", fallback);
        return fallback;
    };

    match probe.probe(video) {
        Ok(metadata) => match metadata.frame_rate.fps() {
            Some(fps) => fps,
            None => {
                warn!(
                    "Degenerate frame rate {} for {}, assuming {} FPS",
                    metadata.frame_rate,
                    video.display(),
                    fallback
                );
                fallback
            }
        },
        Err(e) => {
            warn!(
                "Could not detect FPS for {} ({}), assuming {} FPS",
                video.display(),
                e,
                fallback
            );
            fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingProbe;

    impl MetadataProbe for FailingProbe {
        fn probe(&self, _video: &Path) -> Result<VideoMetadata, ProbeError> {
            Err(ProbeError::MissingStream)
        }
    }

    #[test]
    fn parses_fractional_and_integer_rates() {
        assert_eq!(FrameRate::parse("24000/1001").unwrap(), FrameRate::new(24000, 1001));
        assert_eq!(FrameRate::parse("25").unwrap(), FrameRate::new(25, 1));
        assert!(FrameRate::parse("abc/1").is_err());
        assert!(FrameRate::parse("").is_err());
    }

    #[test]
    fn zero_denominator_has_no_fps() {
        assert_eq!(FrameRate::new(24, 0).fps(), None);
        assert_eq!(FrameRate::new(0, 1).fps(), None);
        let ntsc = FrameRate::new(30000, 1001).fps().unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn resolve_uses_probe_rate() {
        let probe = FixedFrameRate(FrameRate::new(25, 1));
        assert_eq!(resolve_fps(&probe, Some(Path::new("movie.mkv")), 24.0), 25.0);
    }

    #[test]
    fn resolve_falls_back_on_failure_or_degenerate_rate() {
        let video = Some(Path::new("movie.mkv"));
        assert_eq!(resolve_fps(&FailingProbe, video, 24.0), 24.0);
        assert_eq!(resolve_fps(&FixedFrameRate(FrameRate::new(0, 0)), video, 24.0), 24.0);
        assert_eq!(resolve_fps(&FixedFrameRate(FrameRate::new(25, 1)), None, 24.0), 24.0);
    }
}
