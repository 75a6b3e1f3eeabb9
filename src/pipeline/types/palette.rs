use super::LabPixel;
use serde::{Deserialize, Serialize};

/// Cluster centers ordered by descending population, most representative first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(Vec<LabPixel>);

impl Palette {
    pub fn new(colors: Vec<LabPixel>) -> Self {
        Self(colors)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Single neutral gray entry used for frames without usable pixels.
    pub fn fallback() -> Self {
        Self(vec![LabPixel::NEUTRAL_GRAY])
    }

    pub fn dominant(&self) -> Option<LabPixel> {
        self.0.first().copied()
    }

    pub fn colors(&self) -> &[LabPixel] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<LabPixel>> for Palette {
    fn from(colors: Vec<LabPixel>) -> Self {
        Self(colors)
    }
}
