//! Seeded k-means over Lab pixels.
//!
//! Identical pixels are merged into weighted points first, so the effective
//! cluster count is `min(k, distinct pixels)` and a flat frame collapses to a
//! single cluster. Initialization is weighted k-means++ driven by a
//! `StdRng` seeded from [`KMeans::seed`]; for a given input, `k` and seed the
//! result is identical from run to run.

use crate::pipeline::types::{LabPixel, Palette};
use indexmap::IndexMap;
use rand::distr::{weighted::WeightedIndex, Distribution};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::cmp::Reverse;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeans {
    pub k: usize,
    pub seed: u64,
    pub max_iterations: usize,
    /// Stop once the summed squared centroid shift drops to
    /// `tolerance * mean per-axis variance`.
    pub tolerance: f64,
}

/// Cluster centers with the number of input pixels assigned to each.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clustering {
    centroids: Vec<LabPixel>,
    populations: Vec<u64>,
}

impl Clustering {
    pub fn centroids(&self) -> &[LabPixel] {
        &self.centroids
    }

    pub fn populations(&self) -> &[u64] {
        &self.populations
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    /// Centers ordered by descending population. Equal populations keep
    /// ascending cluster index order.
    pub fn into_palette(self) -> Palette {
        let mut order: Vec<usize> = (0..self.centroids.len()).collect();
        order.sort_by_key(|&i| Reverse(self.populations[i]));
        order.into_iter().map(|i| self.centroids[i]).collect::<Vec<_>>().into()
    }
}

/// Deduplicated pixels, in first-occurrence order.
struct WeightedPoints {
    points: Vec<LabPixel>,
    weights: Vec<u64>,
}

impl WeightedPoints {
    fn from_pixels(pixels: &[LabPixel]) -> Self {
        let mut index: IndexMap<[u64; 3], usize> = IndexMap::new();
        let mut points = Vec::new();
        let mut weights: Vec<u64> = Vec::new();

        for pixel in pixels {
            let slot = *index.entry(pixel.bits()).or_insert_with(|| {
                points.push(*pixel);
                weights.push(0);
                points.len() - 1
            });
            weights[slot] += 1;
        }

        Self { points, weights }
    }

    fn len(&self) -> usize {
        self.points.len()
    }

    /// Mean of the per-axis weighted variances.
    fn mean_variance(&self) -> f64 {
        let total: f64 = self.weights.iter().map(|&w| w as f64).sum();
        if total == 0.0 {
            return 0.0;
        }

        let mut mean = [0.0f64; 3];
        for (p, &w) in self.points.iter().zip(&self.weights) {
            let w = w as f64;
            mean[0] += p.l * w;
            mean[1] += p.a * w;
            mean[2] += p.b * w;
        }
        let mean = mean.map(|m| m / total);

        let mut variance = 0.0;
        for (p, &w) in self.points.iter().zip(&self.weights) {
            let w = w as f64;
            variance += w * ((p.l - mean[0]).powi(2) + (p.a - mean[1]).powi(2) + (p.b - mean[2]).powi(2));
        }
        variance / total / 3.0
    }
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self {
            k,
            seed: 0,
            max_iterations: 300,
            tolerance: 1e-4,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn fit(&self, pixels: &[LabPixel]) -> Clustering {
        let data = WeightedPoints::from_pixels(pixels);
        let k = self.k.min(data.len());
        if k == 0 {
            return Clustering::default();
        }
        if k < self.k {
            debug!(
                "Only {} distinct colors for k={}, clamping cluster count",
                data.len(),
                self.k
            );
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut centroids = initial_centroids(&data, k, &mut rng);
        let threshold = self.tolerance * data.mean_variance();

        let mut iterations = 0;
        while iterations < self.max_iterations {
            iterations += 1;
            let labels = assign(&data, &centroids);
            let updated = update_centroids(&data, &centroids, &labels);
            let shift: f64 = centroids
                .iter()
                .zip(&updated)
                .map(|(old, new)| old.distance_squared(new))
                .sum();
            centroids = updated;
            if shift <= threshold {
                break;
            }
        }
        debug!("k-means converged after {} iterations (k={})", iterations, k);

        let labels = assign(&data, &centroids);
        let mut populations = vec![0u64; centroids.len()];
        for (&label, &weight) in labels.iter().zip(&data.weights) {
            populations[label] += weight;
        }

        Clustering {
            centroids,
            populations,
        }
    }
}

/// Weighted k-means++ seeding. Requires `k <= data.len()`.
fn initial_centroids(data: &WeightedPoints, k: usize, rng: &mut StdRng) -> Vec<LabPixel> {
    let mut centroids = Vec::with_capacity(k);

    let first = match WeightedIndex::<f64>::new(data.weights.iter().map(|&w| w as f64)) {
        Ok(dist) => dist.sample(rng),
        Err(_) => 0,
    };
    centroids.push(data.points[first]);

    let mut closest: Vec<f64> = data
        .points
        .iter()
        .map(|p| p.distance_squared(&data.points[first]))
        .collect();

    while centroids.len() < k {
        let scores = closest
            .iter()
            .zip(&data.weights)
            .map(|(&d, &w)| if d.is_finite() { d * w as f64 } else { 0.0 });
        let next = match WeightedIndex::<f64>::new(scores) {
            Ok(dist) => dist.sample(rng),
            Err(_) => match farthest(&closest) {
                Some(index) => index,
                None => break,
            },
        };

        let center = data.points[next];
        centroids.push(center);
        for (d, p) in closest.iter_mut().zip(&data.points) {
            *d = d.min(p.distance_squared(&center));
        }
    }

    centroids
}

/// Index of the point farthest from its nearest centroid, ignoring points
/// that already coincide with one.
fn farthest(distances: &[f64]) -> Option<usize> {
    distances
        .iter()
        .enumerate()
        .filter(|(_, d)| **d > 0.0)
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map(|(i, _)| i)
}

/// Nearest centroid per point; ties go to the lowest cluster index.
fn assign(data: &WeightedPoints, centroids: &[LabPixel]) -> Vec<usize> {
    data.points
        .iter()
        .map(|p| {
            let mut best = 0;
            let mut best_distance = f64::INFINITY;
            for (i, c) in centroids.iter().enumerate() {
                let d = p.distance_squared(c);
                if d < best_distance {
                    best = i;
                    best_distance = d;
                }
            }
            best
        })
        .collect()
}

/// Weighted means of each cluster. An emptied cluster is moved onto the
/// point lying farthest from its current centroid.
fn update_centroids(data: &WeightedPoints, centroids: &[LabPixel], labels: &[usize]) -> Vec<LabPixel> {
    let k = centroids.len();
    let mut sums = vec![[0.0f64; 3]; k];
    let mut totals = vec![0u64; k];

    for ((p, &w), &label) in data.points.iter().zip(&data.weights).zip(labels) {
        let wf = w as f64;
        sums[label][0] += p.l * wf;
        sums[label][1] += p.a * wf;
        sums[label][2] += p.b * wf;
        totals[label] += w;
    }

    let mut distances: Vec<f64> = data
        .points
        .iter()
        .zip(labels)
        .map(|(p, &label)| p.distance_squared(&centroids[label]))
        .collect();

    (0..k)
        .map(|i| {
            if totals[i] > 0 {
                let n = totals[i] as f64;
                return LabPixel::new(sums[i][0] / n, sums[i][1] / n, sums[i][2] / n);
            }
            match farthest(&distances) {
                Some(index) => {
                    // Claimed, so a second empty cluster picks another point.
                    distances[index] = 0.0;
                    data.points[index]
                }
                None => centroids[i],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cloud(center: LabPixel, count: usize, spread: f64) -> Vec<LabPixel> {
        (0..count)
            .map(|i| {
                let t = i as f64 / count as f64 - 0.5;
                LabPixel::new(center.l + t * spread, center.a - t * spread, center.b + t * spread / 2.0)
            })
            .collect()
    }

    #[test]
    fn separates_well_spaced_groups() {
        let mut pixels = cloud(LabPixel::new(20.0, 10.0, 10.0), 300, 2.0);
        pixels.extend(cloud(LabPixel::new(60.0, -30.0, 40.0), 200, 2.0));
        pixels.extend(cloud(LabPixel::new(85.0, 5.0, -40.0), 100, 2.0));

        let palette = KMeans::new(3).fit(&pixels).into_palette();
        assert_eq!(palette.len(), 3);
        let colors = palette.colors();
        assert!((colors[0].l - 20.0).abs() < 1.0);
        assert!((colors[1].l - 60.0).abs() < 1.0);
        assert!((colors[2].l - 85.0).abs() < 1.0);
    }

    #[test]
    fn populations_account_for_every_pixel() {
        let mut pixels = cloud(LabPixel::new(30.0, 0.0, 0.0), 50, 4.0);
        pixels.extend(cloud(LabPixel::new(70.0, 20.0, 20.0), 25, 4.0));
        pixels.extend(std::iter::repeat(LabPixel::new(50.0, 0.0, 0.0)).take(10));

        let clustering = KMeans::new(4).fit(&pixels);
        assert_eq!(clustering.populations().iter().sum::<u64>(), 85);
    }

    #[test]
    fn identical_pixels_collapse_to_one_cluster() {
        let pixels = vec![LabPixel::new(42.0, 12.0, -7.0); 500];
        let clustering = KMeans::new(5).fit(&pixels);
        assert_eq!(clustering.len(), 1);
        assert_eq!(clustering.populations(), &[500]);
        assert_eq!(clustering.centroids()[0], LabPixel::new(42.0, 12.0, -7.0));
    }

    #[test]
    fn k_is_clamped_to_distinct_colors() {
        let pixels = vec![
            LabPixel::new(10.0, 0.0, 0.0),
            LabPixel::new(10.0, 0.0, 0.0),
            LabPixel::new(90.0, 0.0, 0.0),
        ];
        let palette = KMeans::new(6).fit(&pixels).into_palette();
        assert_eq!(palette.colors(), &[LabPixel::new(10.0, 0.0, 0.0), LabPixel::new(90.0, 0.0, 0.0)]);
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        assert!(KMeans::new(3).fit(&[]).is_empty());
    }

    #[test]
    fn same_seed_gives_identical_output() {
        let pixels: Vec<LabPixel> = (0..400)
            .map(|i| {
                let f = i as f64;
                LabPixel::new((f * 7.3) % 100.0, (f * 3.1) % 60.0 - 30.0, (f * 5.7) % 80.0 - 40.0)
            })
            .collect();

        let first = KMeans::new(5).with_seed(7).fit(&pixels);
        let second = KMeans::new(5).with_seed(7).fit(&pixels);
        assert_eq!(first, second);
    }

    #[test]
    fn equal_populations_keep_cluster_index_order() {
        let clustering = Clustering {
            centroids: vec![
                LabPixel::new(1.0, 0.0, 0.0),
                LabPixel::new(2.0, 0.0, 0.0),
                LabPixel::new(3.0, 0.0, 0.0),
            ],
            populations: vec![5, 9, 5],
        };
        let palette = clustering.into_palette();
        assert_eq!(
            palette.colors(),
            &[
                LabPixel::new(2.0, 0.0, 0.0),
                LabPixel::new(1.0, 0.0, 0.0),
                LabPixel::new(3.0, 0.0, 0.0),
            ]
        );
    }
}
