use image::{imageops, Rgb32FImage};
use std::ops::Range;
use tracing::debug;

/// Rows to drop from the top and bottom of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LetterboxCrop {
    pub top: u32,
    pub bottom: u32,
}

impl LetterboxCrop {
    pub fn is_none(&self) -> bool {
        self.top == 0 && self.bottom == 0
    }
}

/// Finds horizontal black bars by looking at the top and bottom bands of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LetterboxDetector {
    /// Fraction of the frame height inspected on each side.
    pub band_ratio: f64,
    pub max_mean: f32,
    pub max_std: f32,
}

impl Default for LetterboxDetector {
    fn default() -> Self {
        Self {
            band_ratio: 0.1,
            max_mean: 0.05,
            max_std: 0.02,
        }
    }
}

impl LetterboxDetector {
    pub fn new(band_ratio: f64, max_mean: f32, max_std: f32) -> Self {
        Self {
            band_ratio,
            max_mean,
            max_std,
        }
    }

    pub fn band_height(&self, height: u32) -> u32 {
        (f64::from(height) * self.band_ratio).floor() as u32
    }

    /// Top and bottom are judged independently; a side is cropped by the full
    /// band height when its band is uniformly dark.
    pub fn detect(&self, image: &Rgb32FImage) -> LetterboxCrop {
        let height = image.height();
        let band = self.band_height(height).min(height);
        if band == 0 {
            return LetterboxCrop::default();
        }

        let top = if self.is_bar(image, 0..band) { band } else { 0 };
        let bottom = if self.is_bar(image, height - band..height) {
            band
        } else {
            0
        };

        LetterboxCrop { top, bottom }
    }

    /// Crops detected bars. Returns the frame unchanged when nothing was found
    /// or when cropping would leave no rows.
    pub fn remove(&self, image: &Rgb32FImage) -> Rgb32FImage {
        let crop = self.detect(image);
        if crop.is_none() {
            return image.clone();
        }

        let height = image.height();
        let start = crop.top;
        let end = height.saturating_sub(crop.bottom);
        if end <= start {
            debug!(
                "Letterbox crop {:?} would remove all {} rows, keeping frame",
                crop, height
            );
            return image.clone();
        }

        debug!("Cropping letterbox bars: top={} bottom={}", crop.top, crop.bottom);
        imageops::crop_imm(image, 0, start, image.width(), end - start).to_image()
    }

    fn is_bar(&self, image: &Rgb32FImage, rows: Range<u32>) -> bool {
        match luminance_stats(image, rows) {
            Some((mean, std)) => mean < self.max_mean && std < self.max_std,
            None => false,
        }
    }
}

/// Mean and population standard deviation of per-pixel luminance (mean of R, G, B)
/// over a band of rows. `None` if the band holds no pixels.
fn luminance_stats(image: &Rgb32FImage, rows: Range<u32>) -> Option<(f32, f32)> {
    // One-pass mean/variance (Welford)
    let mut n = 0f64;
    let mut mean = 0f64;
    let mut m2 = 0f64;

    for y in rows {
        for x in 0..image.width() {
            let p = image.get_pixel(x, y);
            let v = (f64::from(p[0]) + f64::from(p[1]) + f64::from(p[2])) / 3.0;
            n += 1.0;
            let delta = v - mean;
            mean += delta / n;
            m2 += delta * (v - mean);
        }
    }

    if n == 0.0 {
        return None;
    }
    Some((mean as f32, (m2 / n).sqrt() as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn letterboxed(width: u32, height: u32, bar_rows: u32, bar_value: f32) -> Rgb32FImage {
        ImageBuffer::from_fn(width, height, |_, y| {
            if y < bar_rows || y >= height - bar_rows {
                Rgb([bar_value; 3])
            } else {
                Rgb([0.8, 0.6, 0.4])
            }
        })
    }

    #[test]
    fn detects_bars_on_both_sides() {
        let image = letterboxed(64, 64, 6, 0.01);
        let crop = LetterboxDetector::default().detect(&image);
        assert_eq!(crop, LetterboxCrop { top: 6, bottom: 6 });
    }

    #[test]
    fn detects_sides_independently() {
        let image: Rgb32FImage = ImageBuffer::from_fn(40, 50, |_, y| {
            if y < 5 {
                Rgb([0.0; 3])
            } else {
                Rgb([0.7, 0.7, 0.7])
            }
        });
        let crop = LetterboxDetector::default().detect(&image);
        assert_eq!(crop, LetterboxCrop { top: 5, bottom: 0 });

        let cropped = LetterboxDetector::default().remove(&image);
        assert_eq!(cropped.height(), 45);
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([0.7, 0.7, 0.7]));
    }

    #[test]
    fn noisy_dark_band_is_not_a_bar() {
        let image: Rgb32FImage = ImageBuffer::from_fn(64, 64, |x, _| {
            if x % 2 == 0 {
                Rgb([0.0; 3])
            } else {
                Rgb([0.09; 3])
            }
        });
        assert!(LetterboxDetector::default().detect(&image).is_none());
    }

    #[test]
    fn short_frames_have_no_band() {
        let image = letterboxed(16, 9, 1, 0.0);
        assert!(LetterboxDetector::default().detect(&image).is_none());
    }

    #[test]
    fn frame_without_bars_is_returned_unchanged() {
        let image: Rgb32FImage = ImageBuffer::from_pixel(32, 32, Rgb([0.3, 0.5, 0.2]));
        let result = LetterboxDetector::default().remove(&image);
        assert_eq!(result, image);
    }

    #[test]
    fn crop_removing_every_row_keeps_original() {
        let image: Rgb32FImage = ImageBuffer::from_pixel(8, 20, Rgb([0.0; 3]));
        let detector = LetterboxDetector::new(0.5, 0.05, 0.02);
        assert_eq!(detector.detect(&image), LetterboxCrop { top: 10, bottom: 10 });
        assert_eq!(detector.remove(&image), image);
    }
}
