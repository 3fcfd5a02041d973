//! Lloyd's K-Means with k-means++ seeding.
//!
//! Every run draws from one [`StdRng`] seeded with a fixed value, so the
//! same input always yields the same partition.

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};

/// K-Means settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KMeansConfig {
    /// Number of clusters.
    pub k: usize,
    /// Independent restarts; the lowest-inertia run wins.
    pub n_init: usize,
    /// Iteration cap per run.
    pub max_iter: usize,
    /// Convergence tolerance, relative to the mean feature variance.
    pub tol: f64,
    /// RNG seed.
    pub seed: u64,
}

impl KMeansConfig {
    /// Default settings for `k` clusters.
    #[must_use]
    pub const fn new(k: usize) -> Self {
        Self {
            k,
            n_init: 10,
            max_iter: 300,
            tol: 1e-4,
            seed: 42,
        }
    }
}

/// Outcome of a K-Means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeansFit {
    /// Cluster label per point.
    pub labels: Vec<usize>,
    /// Cluster centres.
    pub centroids: Vec<Vec<f64>>,
    /// Sum of squared distances to the assigned centre.
    pub inertia: f64,
    /// Lloyd iterations of the winning run.
    pub iterations: usize,
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(point, c)))
        .fold((0, f64::INFINITY), |best, cur| if cur.1 < best.1 { cur } else { best })
}

#[allow(clippy::cast_precision_loss)]
fn mean_feature_variance(points: &[Vec<f64>]) -> f64 {
    let n = points.len() as f64;
    let dims = points.first().map_or(0, Vec::len);
    if dims == 0 {
        return 0.0;
    }
    let total: f64 = (0..dims)
        .map(|d| {
            let mean = points.iter().map(|p| p[d]).sum::<f64>() / n;
            points.iter().map(|p| (p[d] - mean).powi(2)).sum::<f64>() / n
        })
        .sum();
    total / dims as f64
}

/// Index whose cumulative weight first exceeds `target`.
///
/// Rounding can leave the running sum at or below `target`; the last
/// positive weight is taken then, never an existing centre.
fn weighted_pick(weights: &[f64], target: f64) -> usize {
    let mut cumulative = 0.0;
    weights
        .iter()
        .position(|w| {
            cumulative += w;
            cumulative > target
        })
        .or_else(|| weights.iter().rposition(|w| *w > 0.0))
        .unwrap_or(weights.len().saturating_sub(1))
}

/// k-means++: the first centre is uniform, each next one is drawn with
/// probability proportional to the squared distance to the nearest
/// chosen centre.
fn seed_centroids(points: &[Vec<f64>], k: usize, rng: &mut StdRng) -> Vec<Vec<f64>> {
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.gen_range(0..points.len())].clone());

    let mut distances: Vec<f64> = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = distances.iter().sum();
        let chosen = if total > 0.0 {
            weighted_pick(&distances, rng.r#gen::<f64>() * total)
        } else {
            rng.gen_range(0..points.len())
        };

        let centre = points[chosen].clone();
        for (d, p) in distances.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centre));
        }
        centroids.push(centre);
    }

    centroids
}

#[allow(clippy::cast_precision_loss)]
fn recompute_centroids(points: &[Vec<f64>], labels: &mut [usize], previous: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let k = previous.len();
    let dims = points[0].len();
    let mut sums = vec![vec![0.0; dims]; k];
    let mut counts = vec![0_usize; k];

    for (p, &label) in points.iter().zip(labels.iter()) {
        counts[label] += 1;
        for (s, v) in sums[label].iter_mut().zip(p) {
            *s += v;
        }
    }

    let mut centroids: Vec<Vec<f64>> = sums
        .into_iter()
        .zip(&counts)
        .zip(previous)
        .map(|((sum, &count), prev)| {
            if count == 0 {
                prev.clone()
            } else {
                sum.into_iter().map(|s| s / count as f64).collect()
            }
        })
        .collect();

    // Empty clusters take the point farthest from its current centre.
    let empty: Vec<usize> = (0..k).filter(|&c| counts[c] == 0).collect();
    for cluster in empty {
        let farthest = points
            .iter()
            .enumerate()
            .filter(|(i, _)| counts[labels[*i]] > 1)
            .map(|(i, p)| (i, squared_distance(p, &centroids[labels[i]])))
            .fold(None, |best: Option<(usize, f64)>, cur| match best {
                Some(b) if b.1 >= cur.1 => Some(b),
                _ => Some(cur),
            });
        if let Some((i, _)) = farthest {
            counts[labels[i]] -= 1;
            counts[cluster] = 1;
            labels[i] = cluster;
            centroids[cluster] = points[i].clone();
        }
    }

    centroids
}

fn run_once(points: &[Vec<f64>], config: &KMeansConfig, tol: f64, rng: &mut StdRng) -> KMeansFit {
    let mut centroids = seed_centroids(points, config.k, rng);
    let mut labels = vec![0; points.len()];
    let mut iterations = 0;

    while iterations < config.max_iter {
        iterations += 1;
        for (label, p) in labels.iter_mut().zip(points) {
            *label = nearest(p, &centroids).0;
        }

        let next = recompute_centroids(points, &mut labels, &centroids);
        let shift: f64 = centroids
            .iter()
            .zip(&next)
            .map(|(a, b)| squared_distance(a, b))
            .sum();
        centroids = next;

        if shift <= tol {
            break;
        }
    }

    let mut inertia = 0.0;
    for (label, p) in labels.iter_mut().zip(points) {
        let (best, distance) = nearest(p, &centroids);
        *label = best;
        inertia += distance;
    }

    KMeansFit {
        labels,
        centroids,
        inertia,
        iterations,
    }
}

/// Fits K-Means on `points` (rows of equal length).
///
/// The caller guarantees `1 <= config.k <= points.len()`.
#[must_use]
pub fn kmeans(points: &[Vec<f64>], config: &KMeansConfig) -> KMeansFit {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let tol = config.tol * mean_feature_variance(points);

    let mut best: Option<KMeansFit> = None;
    for run in 0..config.n_init.max(1) {
        let fit = run_once(points, config, tol, &mut rng);
        log::trace!("K-Means run {run}: inertia {:.6} after {} iterations", fit.inertia, fit.iterations);
        if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
            best = Some(fit);
        }
    }

    best.unwrap_or_else(|| KMeansFit {
        labels: vec![0; points.len()],
        centroids: Vec::new(),
        inertia: 0.0,
        iterations: 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.0, 1.0],
            vec![10.0, 11.0],
        ]
    }

    #[test]
    fn separates_obvious_pairs() {
        let fit = kmeans(&pairs(), &KMeansConfig::new(2));
        assert_eq!(fit.labels[0], fit.labels[2]);
        assert_eq!(fit.labels[1], fit.labels[3]);
        assert_ne!(fit.labels[0], fit.labels[1]);
        assert!((fit.inertia - 1.0).abs() < 1e-9, "two pairs at distance 1");
    }

    #[test]
    fn deterministic() {
        let a = kmeans(&pairs(), &KMeansConfig::new(2));
        let b = kmeans(&pairs(), &KMeansConfig::new(2));
        assert_eq!(a, b);
    }

    #[test]
    fn k_equals_n_gives_zero_inertia() {
        let fit = kmeans(&pairs(), &KMeansConfig::new(4));
        let mut labels = fit.labels.clone();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 4);
        assert!(fit.inertia.abs() < 1e-12);
    }

    #[test]
    fn duplicate_points_do_not_break_seeding() {
        let points = vec![vec![1.0], vec![1.0], vec![1.0], vec![5.0]];
        let fit = kmeans(&points, &KMeansConfig::new(3));
        assert!(fit.labels.iter().all(|&l| l < 3));
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_ne!(fit.labels[0], fit.labels[3]);
    }

    #[test]
    fn weighted_pick_skips_zero_weight_tail() {
        let weights = [0.0, 0.3, 0.7, 0.0, 0.0];
        assert_eq!(weighted_pick(&weights, 0.1), 1);
        assert_eq!(weighted_pick(&weights, 0.5), 2);
        // target at the total: no running sum exceeds it
        assert_eq!(weighted_pick(&weights, 1.0), 2);
        assert_eq!(weighted_pick(&[0.0, 0.0], 0.0), 1);
    }

    #[test]
    fn single_cluster() {
        let fit = kmeans(&pairs(), &KMeansConfig::new(1));
        assert!(fit.labels.iter().all(|&l| l == 0));
        assert_eq!(fit.centroids, vec![vec![5.0, 5.5]]);
    }
}
