//! Update step: centroids move to the mean of their assigned points.
//!
//! A centroid that captured no points keeps its previous coordinates
//! verbatim. It is not re-seeded, so an empty cluster can never be the sole
//! reason a run fails to converge.

use crate::error::{Error, Result};
use crate::point::Point;

/// Recompute centroids from `labels`.
///
/// `previous` supplies k (its length) and the fallback for empty clusters.
pub fn update(data: &[Point], labels: &[usize], previous: &[Point]) -> Result<Vec<Point>> {
    let k = previous.len();
    if labels.len() != data.len() {
        return Err(Error::invalid_parameter(
            "labels",
            format!("expected {} labels, got {}", data.len(), labels.len()),
        ));
    }

    let mut sums = vec![(0.0f64, 0.0f64); k];
    let mut counts = vec![0usize; k];
    for (p, &label) in data.iter().zip(labels) {
        let Some(sum) = sums.get_mut(label) else {
            return Err(Error::invalid_parameter(
                "labels",
                format!("label {label} out of range for k = {k}"),
            ));
        };
        sum.0 += p.x;
        sum.1 += p.y;
        counts[label] += 1;
    }

    Ok(sums
        .into_iter()
        .zip(counts)
        .zip(previous)
        .map(|(((sx, sy), count), prev)| {
            if count > 0 {
                Point::new(sx / count as f64, sy / count as f64)
            } else {
                *prev
            }
        })
        .collect())
}
