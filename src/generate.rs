//! Synthetic dataset generators.
//!
//! The session treats generated data as opaque input; these exist so a
//! session can produce its own dataset on request. Any other source can be
//! plugged in by implementing [`DatasetGenerator`] or by calling
//! [`ClusteringSession::load_dataset`](crate::ClusteringSession::load_dataset).

use crate::error::{Error, Result};
use crate::point::{Dataset, Domain, Point};
use rand::{Rng, RngCore};
use rand_distr::{Distribution, Normal};

/// Produces a dataset of `n` points.
pub trait DatasetGenerator: Send {
    /// Generate `n` points using `rng` as the only source of randomness.
    fn generate(&self, n: usize, rng: &mut dyn RngCore) -> Dataset;
}

/// Points drawn uniformly from a rectangular domain.
#[derive(Debug, Clone, Default)]
pub struct UniformGenerator {
    domain: Domain,
}

impl UniformGenerator {
    /// Uniform over `domain`.
    pub fn new(domain: Domain) -> Result<Self> {
        if !domain.is_valid() {
            return Err(Error::invalid_parameter(
                "domain",
                "extents must be finite and non-empty",
            ));
        }
        Ok(Self { domain })
    }
}

impl DatasetGenerator for UniformGenerator {
    fn generate(&self, n: usize, rng: &mut dyn RngCore) -> Dataset {
        (0..n)
            .map(|_| {
                Point::new(
                    rng.random_range(self.domain.x.clone()),
                    rng.random_range(self.domain.y.clone()),
                )
            })
            .collect()
    }
}

/// Isotropic Gaussian blobs, one per center, filled round-robin.
#[derive(Debug, Clone)]
pub struct BlobGenerator {
    centers: Vec<Point>,
    noise: Normal<f64>,
}

impl BlobGenerator {
    /// Blobs around `centers` with per-axis standard deviation `std_dev`.
    pub fn new(centers: Vec<Point>, std_dev: f64) -> Result<Self> {
        if centers.is_empty() {
            return Err(Error::invalid_parameter(
                "centers",
                "at least one blob center is required",
            ));
        }
        let noise = Normal::new(0.0, std_dev).map_err(|e| {
            Error::invalid_parameter("std_dev", format!("{e} (got {std_dev})"))
        })?;
        Ok(Self { centers, noise })
    }
}

impl DatasetGenerator for BlobGenerator {
    fn generate(&self, n: usize, rng: &mut dyn RngCore) -> Dataset {
        (0..n)
            .map(|i| {
                let c = self.centers[i % self.centers.len()];
                Point::new(c.x + self.noise.sample(rng), c.y + self.noise.sample(rng))
            })
            .collect()
    }
}
