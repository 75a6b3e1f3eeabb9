use super::LabPixel;

const LIGHT_ABOVE: f64 = 70.0;
const DARK_AT_OR_BELOW: f64 = 30.0;

/// Tonal range of a pooled pixel. Light is L > 70, medium 30 < L <= 70, dark L <= 30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LuminanceBand {
    Light,
    Medium,
    Dark,
}

impl LuminanceBand {
    pub fn of(pixel: &LabPixel) -> Self {
        if pixel.l > LIGHT_ABOVE {
            LuminanceBand::Light
        } else if pixel.l > DARK_AT_OR_BELOW {
            LuminanceBand::Medium
        } else {
            // NaN lands here too, which keeps the bands exhaustive.
            LuminanceBand::Dark
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LuminanceBand::Light => "light",
            LuminanceBand::Medium => "medium",
            LuminanceBand::Dark => "dark",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_exclusive_above_and_inclusive_below() {
        assert_eq!(LuminanceBand::of(&LabPixel::new(70.0001, 0.0, 0.0)), LuminanceBand::Light);
        assert_eq!(LuminanceBand::of(&LabPixel::new(70.0, 0.0, 0.0)), LuminanceBand::Medium);
        assert_eq!(LuminanceBand::of(&LabPixel::new(30.0001, 0.0, 0.0)), LuminanceBand::Medium);
        assert_eq!(LuminanceBand::of(&LabPixel::new(30.0, 0.0, 0.0)), LuminanceBand::Dark);
        assert_eq!(LuminanceBand::of(&LabPixel::new(0.0, 0.0, 0.0)), LuminanceBand::Dark);
    }
}
