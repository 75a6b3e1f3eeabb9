pub mod frame_preprocessor;
pub mod letterbox;

pub use frame_preprocessor::FramePreprocessor;
pub use letterbox::{LetterboxCrop, LetterboxDetector};
