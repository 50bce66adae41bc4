//! Lock-guarded handle for sharing one session across threads.

use super::{ClusteringSession, Snapshot};
use crate::config::SessionConfig;
use crate::error::Result;
use crate::point::{Dataset, Point};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative stop flag for [`ClusteringSession::run_cancellable`].
///
/// Checked between iterations, never mid-step.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Clear the flag so the token can be reused.
    pub fn clear(&self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// One process-wide session behind a mutex.
///
/// Each method holds the lock for the whole operation, so a `run` is never
/// interleaved with a concurrent `step` or `reset`.
pub struct SharedSession<R = StdRng> {
    inner: Arc<Mutex<ClusteringSession<R>>>,
}

impl<R> Clone for SharedSession<R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedSession<StdRng> {
    /// Shared session with a `StdRng` seeded from `config`.
    pub fn new(config: SessionConfig) -> Result<Self> {
        Ok(Self::from_session(ClusteringSession::new(config)?))
    }
}

impl<R: Rng> SharedSession<R> {
    /// Share an existing session.
    pub fn from_session(session: ClusteringSession<R>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /// Replace the dataset with `n` generated points.
    pub fn generate(&self, n: usize) -> Result<Snapshot> {
        self.inner.lock().generate_dataset(n)
    }

    /// Install an externally supplied dataset.
    pub fn load_dataset(&self, dataset: Dataset) -> Result<Snapshot> {
        self.inner.lock().load_dataset(dataset)
    }

    /// See [`ClusteringSession::initialize`].
    pub fn initialize(&self, k: i64, method: &str, seeds: Option<&[Point]>) -> Result<Snapshot> {
        self.inner.lock().initialize(k, method, seeds)
    }

    /// One Lloyd iteration.
    pub fn step(&self) -> Result<Snapshot> {
        self.inner.lock().step()
    }

    /// Iterate to convergence or the iteration cap.
    pub fn run(&self) -> Result<Snapshot> {
        self.inner.lock().run()
    }

    /// Like [`run`](Self::run), stopping early once `token` is cancelled.
    pub fn run_cancellable(&self, token: &CancelToken) -> Result<Snapshot> {
        self.inner.lock().run_cancellable(token)
    }

    /// Clear centroids and labels, keep the dataset.
    pub fn reset(&self) -> Snapshot {
        self.inner.lock().reset()
    }

    /// Current state.
    pub fn snapshot(&self) -> Snapshot {
        self.inner.lock().snapshot()
    }

    /// Copy of the current dataset.
    pub fn dataset(&self) -> Dataset {
        self.inner.lock().dataset().clone()
    }

    /// Run `f` with exclusive access to the session.
    pub fn with_session<T>(&self, f: impl FnOnce(&mut ClusteringSession<R>) -> T) -> T {
        f(&mut self.inner.lock())
    }
}
