//! Clustering quality measures over a labeled dataset.
//!
//! | Metric | Meaning |
//! |--------|---------|
//! | [`inertia`] | Within-cluster sum of squared distances to the centroid |
//! | [`cluster_sizes`] | Points per cluster (zero marks an empty cluster) |
//!
//! Lloyd steps never increase inertia, so it is a useful progress signal
//! alongside centroid movement.

use crate::point::Point;

/// Within-cluster sum of squares.
///
/// ```text
/// WCSS = Σₖ Σᵢ∈Cₖ ||xᵢ - μₖ||²
/// ```
///
/// Points whose label has no centroid are skipped.
///
/// ```rust
/// use kstep::metrics::inertia;
/// use kstep::Point;
///
/// let data = [Point::new(0.0, 0.0), Point::new(0.0, 2.0)];
/// let centroids = [Point::new(0.0, 1.0)];
/// assert_eq!(inertia(&data, &centroids, &[0, 0]), 2.0);
/// ```
pub fn inertia(data: &[Point], centroids: &[Point], labels: &[usize]) -> f64 {
    data.iter()
        .zip(labels)
        .filter_map(|(p, &l)| centroids.get(l).map(|c| p.squared_distance(c)))
        .sum()
}

/// Number of points carrying each label in `0..k`.
///
/// Labels `>= k` are ignored.
pub fn cluster_sizes(labels: &[usize], k: usize) -> Vec<usize> {
    let mut sizes = vec![0usize; k];
    for &l in labels {
        if let Some(s) = sizes.get_mut(l) {
            *s += 1;
        }
    }
    sizes
}
