pub mod dominant_color;
pub mod kmeans;
pub mod movie_palette;

pub use dominant_color::DominantColorExtractor;
pub use kmeans::{Clustering, KMeans};
pub use movie_palette::{BandPartition, MoviePaletteAggregator};
