//! Convergence test between consecutive centroid sets.

use crate::point::Point;

/// True when no coordinate of any centroid moved by more than `tol`.
///
/// Sets of different length never count as converged.
pub fn has_converged(old: &[Point], new: &[Point], tol: f64) -> bool {
    old.len() == new.len()
        && old
            .iter()
            .zip(new)
            .all(|(a, b)| (a.x - b.x).abs() <= tol && (a.y - b.y).abs() <= tol)
}

/// Total squared centroid movement, for diagnostics.
pub fn shift(old: &[Point], new: &[Point]) -> f64 {
    old.iter().zip(new).map(|(a, b)| a.squared_distance(b)).sum()
}
