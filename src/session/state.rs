use crate::cluster::InitMethod;
use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a session is in its lifecycle.
///
/// ```text
/// Uninitialized ──initialize──▶ Initialized ──step──▶ Stepping ──step──▶ Converged
///       ▲                                                                    │
///       └──────────────────────── reset / generate ──────────────────────────┘
/// ```
///
/// A manual initialization still collecting centroids stays `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No usable centroids.
    Uninitialized,
    /// Centroids set, no step taken yet.
    Initialized,
    /// At least one step taken, not finished.
    Stepping,
    /// Finished, either converged or stopped by the iteration cap
    /// (see [`Termination`]).
    Converged,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Initialized => "initialized",
            Phase::Stepping => "stepping",
            Phase::Converged => "converged",
        })
    }
}

/// Why a run finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The last update left every centroid in place.
    Converged,
    /// `max_iter` steps ran without convergence.
    IterationCap,
}

/// Plain record of session state returned by every operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    /// Lifecycle phase.
    pub phase: Phase,
    /// Cluster count of the current (or pending manual) initialization.
    pub k: Option<usize>,
    /// Initialization method in effect.
    pub method: Option<InitMethod>,
    /// Current centroids; partial while manual seeds are being collected.
    pub centroids: Vec<Point>,
    /// One label per dataset point, empty before the first step.
    pub labels: Vec<usize>,
    /// True once no further step will change anything.
    pub finished: bool,
    /// Steps taken since the last initialization.
    pub iteration: usize,
    /// Set once `finished` is true.
    pub termination: Option<Termination>,
    /// Within-cluster sum of squares, once labels exist.
    pub inertia: Option<f64>,
}
