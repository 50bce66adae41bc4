//! The pieces of one Lloyd iteration, plus seeding.
//!
//! ```text
//! initialize ──▶ assign ──▶ update ──▶ has_converged ──┐
//!                  ▲                                   │ no
//!                  └───────────────────────────────────┘
//! ```
//!
//! Each piece is a pure function over slices of [`Point`](crate::Point);
//! [`ClusteringSession`](crate::ClusteringSession) owns the state and
//! sequences them.
//!
//! **Objective**: every step weakly decreases within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use kstep::cluster::{assign, has_converged, update};
//! use kstep::Point;
//!
//! let data = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.0, 1.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 1.0),
//! ];
//! let centroids = vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
//!
//! let labels = assign(&data, &centroids).unwrap();
//! assert_eq!(labels, vec![0, 0, 1, 1]);
//!
//! let next = update(&data, &labels, &centroids).unwrap();
//! assert_eq!(next, vec![Point::new(0.0, 0.5), Point::new(10.0, 0.5)]);
//! assert!(!has_converged(&centroids, &next, 1e-9));
//! ```

mod assign;
mod convergence;
mod init;
mod update;

pub use assign::{assign, nearest_centroid};
pub use convergence::{has_converged, shift};
pub use init::{
    farthest_first_indices, init_random, initialize, kmeans_plus_plus_indices, parse_k,
    validate_k, InitMethod, Seeding,
};
pub use update::update;
