//! Assignment step: each point goes to its nearest centroid.

use crate::error::{Error, Result};
use crate::point::Point;
use crate::session::Phase;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Index of the centroid nearest to `p`; ties go to the lowest index.
///
/// `centroids` must be non-empty.
#[inline]
pub fn nearest_centroid(p: &Point, centroids: &[Point]) -> usize {
    let mut best_cluster = 0;
    let mut best_dist = f64::INFINITY;
    for (j, c) in centroids.iter().enumerate() {
        let dist = p.squared_distance(c);
        if dist < best_dist {
            best_dist = dist;
            best_cluster = j;
        }
    }
    best_cluster
}

/// Label every point with its nearest centroid.
///
/// Fails with [`Error::InvalidState`] when there are no centroids yet.
pub fn assign(data: &[Point], centroids: &[Point]) -> Result<Vec<usize>> {
    if centroids.is_empty() {
        return Err(Error::InvalidState {
            operation: "assign",
            phase: Phase::Uninitialized,
        });
    }

    #[cfg(feature = "parallel")]
    let labels = data
        .par_iter()
        .map(|p| nearest_centroid(p, centroids))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let labels = data.iter().map(|p| nearest_centroid(p, centroids)).collect();

    Ok(labels)
}
