//! Session configuration.

use crate::error::{Error, Result};
use crate::point::Domain;
use serde::{Deserialize, Serialize};

/// Default iteration cap for `run` (and for repeated `step` calls).
pub const DEFAULT_MAX_ITER: usize = 300;
/// Default per-coordinate convergence tolerance.
pub const DEFAULT_TOL: f64 = 1e-9;
/// Default number of points produced by `generate` when the caller has no preference.
pub const DEFAULT_SAMPLES: usize = 300;

/// Tunables for a [`ClusteringSession`](crate::ClusteringSession).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use kstep::SessionConfig;
///
/// let config = SessionConfig::default().with_max_iter(50).with_seed(42);
/// assert_eq!(config.max_iter, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Hard cap on Lloyd iterations per initialization.
    pub max_iter: usize,
    /// Largest per-coordinate centroid movement still counted as "unchanged".
    pub tol: f64,
    /// Seed for the session RNG. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Sample count used by callers that do not specify one.
    pub default_samples: usize,
    /// Domain of the built-in uniform generator.
    pub domain: Domain,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            tol: DEFAULT_TOL,
            seed: None,
            default_samples: DEFAULT_SAMPLES,
            domain: Domain::default(),
        }
    }
}

impl SessionConfig {
    /// Set the iteration cap.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the default sample count.
    pub fn with_default_samples(mut self, n: usize) -> Self {
        self.default_samples = n;
        self
    }

    /// Set the uniform generator's domain.
    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    /// Check field ranges.
    pub fn validate(&self) -> Result<()> {
        if self.max_iter == 0 {
            return Err(Error::invalid_parameter("max_iter", "must be at least 1"));
        }
        if !(self.tol >= 0.0 && self.tol.is_finite()) {
            return Err(Error::invalid_parameter(
                "tol",
                format!("must be finite and non-negative, got {}", self.tol),
            ));
        }
        if self.default_samples == 0 {
            return Err(Error::invalid_parameter(
                "default_samples",
                "must be at least 1",
            ));
        }
        if !self.domain.is_valid() {
            return Err(Error::invalid_parameter(
                "domain",
                "extents must be finite and non-empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SessionConfig::default();
        assert_eq!(config.max_iter, 300);
        assert_eq!(config.tol, 1e-9);
        assert_eq!(config.default_samples, 300);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        assert!(SessionConfig::default().with_max_iter(0).validate().is_err());
        assert!(SessionConfig::default().with_tol(-1.0).validate().is_err());
        assert!(SessionConfig::default().with_tol(f64::NAN).validate().is_err());
        assert!(SessionConfig::default()
            .with_default_samples(0)
            .validate()
            .is_err());
        assert!(SessionConfig::default()
            .with_domain(Domain::square(1.0, 0.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"max_iter": 10, "seed": 5}"#).unwrap();
        assert_eq!(config.max_iter, 10);
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.tol, DEFAULT_TOL);
        assert_eq!(config.domain, Domain::default());
    }
}
