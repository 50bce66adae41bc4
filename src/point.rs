//! 2-D points and the fixed dataset a session clusters.

use serde::{Deserialize, Serialize};
use std::ops::{Deref, Range};

/// A point (or centroid) in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to `other`.
    ///
    /// Only relative magnitudes matter for assignment and seeding, so the
    /// square root is never taken.
    #[inline]
    pub fn squared_distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle `[x.start, x.end) × [y.start, y.end)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    /// Horizontal extent.
    pub x: Range<f64>,
    /// Vertical extent.
    pub y: Range<f64>,
}

impl Domain {
    /// Square domain `[low, high)²`.
    pub fn square(low: f64, high: f64) -> Self {
        Self {
            x: low..high,
            y: low..high,
        }
    }

    /// True when both extents are finite and non-empty.
    pub fn is_valid(&self) -> bool {
        let ok = |r: &Range<f64>| r.start.is_finite() && r.end.is_finite() && r.start < r.end;
        ok(&self.x) && ok(&self.y)
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::square(-100.0, 100.0)
    }
}

/// Ordered, immutable collection of points.
///
/// Order is significant: `labels[i]` always refers to `dataset[i]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    points: Vec<Point>,
}

impl Dataset {
    /// Wrap a list of points.
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Borrow the points.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Smallest domain containing every point, or `None` when empty.
    ///
    /// The upper bounds are inclusive here, so a single point yields a
    /// degenerate (zero-width) box.
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = *self.points.first()?;
        Some(self.points.iter().fold((first, first), |(lo, hi), p| {
            (
                Point::new(lo.x.min(p.x), lo.y.min(p.y)),
                Point::new(hi.x.max(p.x), hi.y.max(p.y)),
            )
        }))
    }
}

impl Deref for Dataset {
    type Target = [Point];

    fn deref(&self) -> &[Point] {
        &self.points
    }
}

impl From<Vec<Point>> for Dataset {
    fn from(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl FromIterator<Point> for Dataset {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
