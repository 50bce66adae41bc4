//! The stateful clustering session.
//!
//! A [`ClusteringSession`] owns one dataset and at most one in-progress run.
//! It exposes the five operations a front end needs:
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`generate_dataset`](ClusteringSession::generate_dataset) | new dataset, run discarded |
//! | [`initialize`](ClusteringSession::initialize) | seed k centroids (or collect manual ones) |
//! | [`step`](ClusteringSession::step) | one assign + update + convergence check |
//! | [`run`](ClusteringSession::run) | step until finished or `max_iter` |
//! | [`reset`](ClusteringSession::reset) | discard the run, keep the dataset |
//!
//! Every operation validates before it mutates: an `Err` leaves the session
//! exactly as it was. Each returns a [`Snapshot`].
//!
//! ```rust
//! use kstep::{ClusteringSession, Point, SessionConfig};
//!
//! let mut session = ClusteringSession::new(SessionConfig::default().with_seed(7)).unwrap();
//! session
//!     .load_dataset(vec![
//!         Point::new(0.0, 0.0),
//!         Point::new(0.0, 1.0),
//!         Point::new(10.0, 0.0),
//!         Point::new(10.0, 1.0),
//!     ].into())
//!     .unwrap();
//!
//! session.initialize(2, "farthest", None).unwrap();
//! let done = session.run().unwrap();
//! assert!(done.finished);
//! assert_eq!(done.labels[0], done.labels[1]);
//! assert_ne!(done.labels[0], done.labels[2]);
//! ```

mod shared;
mod state;

#[cfg(test)]
mod tests;

pub use shared::{CancelToken, SharedSession};
pub use state::{Phase, Snapshot, Termination};

use crate::cluster::{self, InitMethod, Seeding};
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::generate::{DatasetGenerator, UniformGenerator};
use crate::metrics::{cluster_sizes, inertia};
use crate::point::{Dataset, Point};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument, warn};

/// k and method of the current (or pending manual) initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunParams {
    k: usize,
    method: InitMethod,
}

/// Stepwise K-means over a fixed 2-D dataset.
pub struct ClusteringSession<R = StdRng> {
    config: SessionConfig,
    rng: R,
    generator: Box<dyn DatasetGenerator>,
    dataset: Dataset,
    params: Option<RunParams>,
    centroids: Vec<Point>,
    labels: Vec<usize>,
    phase: Phase,
    iteration: usize,
    termination: Option<Termination>,
}

impl ClusteringSession<StdRng> {
    /// Session with a `StdRng` seeded from `config.seed`, or from OS
    /// entropy when unset.
    pub fn new(config: SessionConfig) -> Result<Self> {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> ClusteringSession<R> {
    /// Session drawing all randomness from `rng`.
    ///
    /// `config.seed` is ignored here; seed `rng` instead.
    pub fn with_rng(config: SessionConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let generator = UniformGenerator::new(config.domain.clone())?;
        Ok(Self {
            config,
            rng,
            generator: Box::new(generator),
            dataset: Dataset::default(),
            params: None,
            centroids: Vec::new(),
            labels: Vec::new(),
            phase: Phase::Uninitialized,
            iteration: 0,
            termination: None,
        })
    }

    /// Replace the dataset generator used by [`generate_dataset`](Self::generate_dataset).
    pub fn with_generator(mut self, generator: impl DatasetGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Current dataset (empty until generated or loaded).
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Current centroids, including partially collected manual ones.
    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    /// Current labels, empty before the first step.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the current run has finished.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Converged
    }

    /// Manual centroids collected so far while awaiting the rest.
    pub fn pending_seeds(&self) -> &[Point] {
        if self.is_awaiting() {
            &self.centroids
        } else {
            &[]
        }
    }

    fn is_awaiting(&self) -> bool {
        self.phase == Phase::Uninitialized
            && matches!(self.params, Some(p) if p.method == InitMethod::Manual)
    }

    /// Replace the dataset with `n` generated points and discard any run.
    #[instrument(level = "debug", skip(self))]
    pub fn generate_dataset(&mut self, n: usize) -> Result<Snapshot> {
        if n == 0 {
            return Err(Error::invalid_parameter("n", "must generate at least one point"));
        }
        let dataset = self.generator.generate(n, &mut self.rng);
        info!(points = dataset.len(), "generated dataset");
        self.install(dataset);
        Ok(self.snapshot())
    }

    /// Generate [`SessionConfig::default_samples`] points.
    pub fn generate_default(&mut self) -> Result<Snapshot> {
        self.generate_dataset(self.config.default_samples)
    }

    /// Install an externally supplied dataset, discarding any run.
    #[instrument(level = "debug", skip_all, fields(points = dataset.len()))]
    pub fn load_dataset(&mut self, dataset: Dataset) -> Result<Snapshot> {
        if dataset.is_empty() {
            return Err(Error::invalid_parameter("dataset", "must not be empty"));
        }
        if let Some(i) = dataset
            .iter()
            .position(|p| !(p.x.is_finite() && p.y.is_finite()))
        {
            return Err(Error::invalid_parameter(
                "dataset",
                format!("point {i} has non-finite coordinates"),
            ));
        }
        info!(points = dataset.len(), "loaded dataset");
        self.install(dataset);
        Ok(self.snapshot())
    }

    fn install(&mut self, dataset: Dataset) {
        self.dataset = dataset;
        self.clear_run();
    }

    fn clear_run(&mut self) {
        self.params = None;
        self.centroids.clear();
        self.labels.clear();
        self.phase = Phase::Uninitialized;
        self.iteration = 0;
        self.termination = None;
    }

    /// Seed centroids with the method named `method`.
    ///
    /// For `manual`, a follow-up call with the same k either resends the
    /// whole collection (the pending seeds as a prefix, or exactly k points)
    /// or sends only the new points, which are appended. Once k are present
    /// the session moves to [`Phase::Initialized`]. Other methods ignore
    /// `seeds`.
    pub fn initialize(&mut self, k: i64, method: &str, seeds: Option<&[Point]>) -> Result<Snapshot> {
        let method: InitMethod = method.parse()?;
        self.initialize_with(k, method, seeds.unwrap_or(&[]))
    }

    /// Typed variant of [`initialize`](Self::initialize).
    #[instrument(level = "debug", skip(self, seeds), fields(seeds = seeds.len()))]
    pub fn initialize_with(
        &mut self,
        k: i64,
        method: InitMethod,
        seeds: &[Point],
    ) -> Result<Snapshot> {
        let k_valid = cluster::validate_k(k, self.dataset.len())?;
        let params = RunParams {
            k: k_valid,
            method,
        };

        // A different k or method drops any manual collection in progress.
        let collected: Vec<Point> = if self.is_awaiting() && self.params == Some(params) {
            merge_manual_seeds(&self.centroids, seeds, k_valid)
        } else {
            seeds.to_vec()
        };

        let seeding = cluster::initialize(&self.dataset, k, method, &collected, &mut self.rng)?;

        self.clear_run();
        self.params = Some(params);
        match seeding {
            Seeding::Complete(centroids) => {
                info!(k = k_valid, %method, "initialized centroids");
                self.centroids = centroids;
                self.phase = Phase::Initialized;
            }
            Seeding::Partial(centroids) => {
                debug!(
                    collected = centroids.len(),
                    k = k_valid,
                    "awaiting manual centroids"
                );
                self.centroids = centroids;
            }
        }
        Ok(self.snapshot())
    }

    /// One Lloyd iteration.
    ///
    /// Fails with [`Error::InvalidState`] before initialization. Once the
    /// run has finished this is a no-op returning the unchanged state.
    pub fn step(&mut self) -> Result<Snapshot> {
        match self.phase {
            Phase::Uninitialized => Err(Error::InvalidState {
                operation: "step",
                phase: self.phase,
            }),
            Phase::Converged => Ok(self.snapshot()),
            Phase::Initialized | Phase::Stepping => {
                self.advance()?;
                Ok(self.snapshot())
            }
        }
    }

    /// Step until the run finishes.
    ///
    /// Always terminates: after `max_iter` steps the run stops with
    /// [`Termination::IterationCap`].
    pub fn run(&mut self) -> Result<Snapshot> {
        self.run_until(|| false)
    }

    /// Like [`run`](Self::run), but checks `token` before every iteration
    /// and returns [`Error::Cancelled`] once it is set. State reflects the
    /// last completed step.
    pub fn run_cancellable(&mut self, token: &CancelToken) -> Result<Snapshot> {
        self.run_until(|| token.is_cancelled())
    }

    #[instrument(level = "debug", skip_all)]
    fn run_until(&mut self, cancelled: impl Fn() -> bool) -> Result<Snapshot> {
        if self.phase == Phase::Uninitialized {
            return Err(Error::InvalidState {
                operation: "run",
                phase: self.phase,
            });
        }

        let start = self.iteration;
        while self.phase != Phase::Converged {
            if cancelled() {
                let iterations = self.iteration - start;
                info!(iterations, "run cancelled");
                return Err(Error::Cancelled { iterations });
            }
            self.advance()?;
        }
        info!(
            iterations = self.iteration,
            termination = ?self.termination,
            "run finished"
        );
        Ok(self.snapshot())
    }

    /// Assign, update, check convergence. Only called while stepping is valid.
    fn advance(&mut self) -> Result<()> {
        let labels = cluster::assign(&self.dataset, &self.centroids)?;
        let next = cluster::update(&self.dataset, &labels, &self.centroids)?;
        let converged = cluster::has_converged(&self.centroids, &next, self.config.tol);

        self.iteration += 1;
        let empty = cluster_sizes(&labels, next.len())
            .iter()
            .filter(|&&s| s == 0)
            .count();
        if empty > 0 {
            warn!(
                iteration = self.iteration,
                empty, "clusters without points kept their centroids"
            );
        }
        debug!(
            iteration = self.iteration,
            shift = cluster::shift(&self.centroids, &next),
            converged,
            "step"
        );

        self.centroids = next;
        self.labels = labels;

        if converged {
            self.phase = Phase::Converged;
            self.termination = Some(Termination::Converged);
            info!(iteration = self.iteration, "converged");
        } else if self.iteration >= self.config.max_iter {
            self.phase = Phase::Converged;
            self.termination = Some(Termination::IterationCap);
            warn!(
                max_iter = self.config.max_iter,
                "stopped at iteration cap without converging"
            );
        } else {
            self.phase = Phase::Stepping;
        }
        Ok(())
    }

    /// Clear centroids, labels and the finished flag; keep the dataset.
    pub fn reset(&mut self) -> Snapshot {
        self.clear_run();
        info!("session reset");
        self.snapshot()
    }

    /// Current state as a plain record.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            k: self.params.map(|p| p.k),
            method: self.params.map(|p| p.method),
            centroids: self.centroids.clone(),
            labels: self.labels.clone(),
            finished: self.is_finished(),
            iteration: self.iteration,
            termination: self.termination,
            inertia: (!self.labels.is_empty())
                .then(|| inertia(&self.dataset, &self.centroids, &self.labels)),
        }
    }
}

/// Combine pending manual seeds with a follow-up request.
///
/// `incoming` replaces `pending` when it already starts with them or holds
/// exactly `k` points; otherwise it is appended.
fn merge_manual_seeds(pending: &[Point], incoming: &[Point], k: usize) -> Vec<Point> {
    if incoming.starts_with(pending) || incoming.len() == k {
        incoming.to_vec()
    } else {
        pending.iter().chain(incoming).copied().collect()
    }
}
