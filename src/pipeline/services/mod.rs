pub mod clustering;
pub mod color;
pub mod preprocessing;
pub mod probe;

pub use clustering::{DominantColorExtractor, KMeans, MoviePaletteAggregator};
pub use color::LuminanceFilter;
pub use preprocessing::{FramePreprocessor, LetterboxDetector};
pub use probe::{FfprobeProbe, MetadataProbe, VideoMetadata};
