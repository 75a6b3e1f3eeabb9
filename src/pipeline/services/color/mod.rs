pub mod color_space;
pub mod luminance_filter;

pub use color_space::{lab_to_rgb, rgb_to_lab, to_lab, to_rgb};
pub use luminance_filter::LuminanceFilter;
