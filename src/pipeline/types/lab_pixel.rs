use serde::{Deserialize, Serialize};

/// A CIE Lab coordinate. Serialized as `[l, a, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct LabPixel {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

/// Unordered, non-unique collection of Lab pixels.
pub type PixelSet = Vec<LabPixel>;

impl LabPixel {
    /// Neutral mid gray, substituted whenever a frame has no usable pixels.
    pub const NEUTRAL_GRAY: LabPixel = LabPixel::new(50.0, 0.0, 0.0);

    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    pub fn distance_squared(&self, other: &LabPixel) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Exact bit pattern, used to deduplicate pixels without float equality pitfalls.
    pub(crate) fn bits(&self) -> [u64; 3] {
        [self.l.to_bits(), self.a.to_bits(), self.b.to_bits()]
    }

    /// Arithmetic mean, `None` for an empty slice.
    pub fn mean_of(pixels: &[LabPixel]) -> Option<LabPixel> {
        if pixels.is_empty() {
            return None;
        }
        let n = pixels.len() as f64;
        let (l, a, b) = pixels.iter().fold((0.0, 0.0, 0.0), |(l, a, b), p| {
            (l + p.l, a + p.a, b + p.b)
        });
        Some(LabPixel::new(l / n, a / n, b / n))
    }
}

impl From<[f64; 3]> for LabPixel {
    fn from([l, a, b]: [f64; 3]) -> Self {
        Self { l, a, b }
    }
}

impl From<LabPixel> for [f64; 3] {
    fn from(pixel: LabPixel) -> Self {
        [pixel.l, pixel.a, pixel.b]
    }
}
