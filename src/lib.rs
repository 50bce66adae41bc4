//! # kstep
//!
//! Stepwise K-means over a fixed 2-D dataset: seed centroids with one of four
//! strategies, then advance Lloyd's algorithm one iteration at a time (or to
//! convergence) while observing centroids and labels after every step.
//!
//! - [`cluster`]: pure building blocks (seeding, assignment, update, convergence).
//! - [`ClusteringSession`]: the state machine that sequences them.
//! - [`SharedSession`]: the same session behind a lock, for multi-threaded hosts.
//!
//! The `parallel` feature runs the assignment step on rayon.
//!
//! ```rust
//! use kstep::{ClusteringSession, SessionConfig};
//!
//! let mut session = ClusteringSession::new(SessionConfig::default().with_seed(1)).unwrap();
//! session.generate_dataset(300).unwrap();
//! session.initialize(3, "kmeans++", None).unwrap();
//!
//! while !session.step().unwrap().finished {}
//! assert_eq!(session.labels().len(), 300);
//! ```

pub mod cluster;
pub mod config;
/// Error types used across `kstep`.
pub mod error;
pub mod generate;
pub mod metrics;
pub mod point;
pub mod session;

pub use cluster::InitMethod;
pub use config::SessionConfig;
pub use error::{Error, ErrorKind, Result};
pub use generate::{BlobGenerator, DatasetGenerator, UniformGenerator};
pub use point::{Dataset, Domain, Point};
pub use session::{CancelToken, ClusteringSession, Phase, SharedSession, Snapshot, Termination};
