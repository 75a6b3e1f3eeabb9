//! sRGB <-> CIE Lab (D65) conversion.
//!
//! RGB triples are normalized to `[0, 1]`. The transform goes through linear
//! sRGB and CIE XYZ with the D65 reference white, so the numbers line up with
//! other standard implementations.

use crate::pipeline::types::LabPixel;
use palette::{white_point::D65, FromColor, Lab, Srgb};

pub fn rgb_to_lab([r, g, b]: [f64; 3]) -> LabPixel {
    let lab: Lab<D65, f64> = Lab::from_color(Srgb::new(r, g, b));
    LabPixel::new(lab.l, lab.a, lab.b)
}

/// Back to display RGB. Out-of-gamut colors are clamped into `[0, 1]`.
pub fn lab_to_rgb(pixel: LabPixel) -> [f64; 3] {
    let rgb: Srgb<f64> = Srgb::from_color(Lab::<D65, f64>::new(pixel.l, pixel.a, pixel.b));
    [rgb.red, rgb.green, rgb.blue].map(|channel| {
        if channel.is_nan() {
            0.0
        } else {
            channel.clamp(0.0, 1.0)
        }
    })
}

pub fn to_lab(rgb_pixels: &[[f64; 3]]) -> Vec<LabPixel> {
    rgb_pixels.iter().copied().map(rgb_to_lab).collect()
}

pub fn to_rgb(lab_pixels: &[LabPixel]) -> Vec<[f64; 3]> {
    lab_pixels.iter().copied().map(lab_to_rgb).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn black_and_white_hit_the_lightness_extremes() {
        let black = rgb_to_lab([0.0, 0.0, 0.0]);
        assert_close(black.l, 0.0, 1e-9);
        assert_close(black.a, 0.0, 1e-9);
        assert_close(black.b, 0.0, 1e-9);

        let white = rgb_to_lab([1.0, 1.0, 1.0]);
        assert_close(white.l, 100.0, 1e-3);
        assert_close(white.a, 0.0, 1e-3);
        assert_close(white.b, 0.0, 1e-3);
    }

    #[test]
    fn pure_red_matches_reference_values() {
        let red = rgb_to_lab([1.0, 0.0, 0.0]);
        assert_close(red.l, 53.24, 0.05);
        assert_close(red.a, 80.09, 0.1);
        assert_close(red.b, 67.20, 0.1);
    }

    #[test]
    fn round_trip_is_close_for_in_gamut_colors() {
        let samples = [
            [0.2, 0.4, 0.6],
            [200.0 / 255.0, 50.0 / 255.0, 50.0 / 255.0],
            [0.5, 0.5, 0.5],
            [0.05, 0.9, 0.1],
        ];
        for rgb in samples {
            let back = lab_to_rgb(rgb_to_lab(rgb));
            for (original, converted) in rgb.iter().zip(back.iter()) {
                assert_close(*converted, *original, 1e-6);
            }
        }
    }

    #[test]
    fn out_of_gamut_lab_is_clamped() {
        let rgb = lab_to_rgb(LabPixel::new(50.0, 127.0, -127.0));
        assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)));
    }

    #[test]
    fn batch_conversion_preserves_order() {
        let lab = to_lab(&[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]);
        assert_eq!(lab.len(), 2);
        assert!(lab[0].l < lab[1].l);
        assert_eq!(to_rgb(&lab).len(), 2);
    }
}
