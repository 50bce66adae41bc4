//! Initial centroid selection.
//!
//! Four strategies:
//!
//! | Method | Picks | Randomness |
//! |--------|-------|------------|
//! | [`InitMethod::Random`] | k distinct points, uniformly | sampling without replacement |
//! | [`InitMethod::FarthestFirst`] | first at random, then the point farthest from all chosen | first pick only |
//! | [`InitMethod::KmeansPlusPlus`] | first at random, then D²-weighted | every pick |
//! | [`InitMethod::Manual`] | caller-supplied coordinates | none |
//!
//! ## K-means++ (Arthur & Vassilvitskii, 2007)
//!
//! 1. Choose first centroid uniformly at random
//! 2. Choose each next centroid with probability proportional to D(x)²
//!    (squared distance to nearest already-chosen centroid)
//!
//! Farthest-first replaces the sampling in step 2 with an argmax over D(x)²,
//! ties going to the earliest point in dataset order. Both strategies pick
//! dataset indices and never the same index twice.

use crate::error::{Error, Result};
use crate::point::Point;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Initialization strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum InitMethod {
    /// k distinct dataset points chosen uniformly.
    #[default]
    #[serde(rename = "random")]
    Random,
    /// Greedy farthest-point traversal.
    #[serde(rename = "farthest")]
    FarthestFirst,
    /// D²-weighted seeding.
    #[serde(rename = "kmeans++")]
    KmeansPlusPlus,
    /// Centroids supplied by the caller.
    #[serde(rename = "manual")]
    Manual,
}

impl InitMethod {
    /// Canonical name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            InitMethod::Random => "random",
            InitMethod::FarthestFirst => "farthest",
            InitMethod::KmeansPlusPlus => "kmeans++",
            InitMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for InitMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InitMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(InitMethod::Random),
            "farthest" | "farthest-first" | "farthest_first" => Ok(InitMethod::FarthestFirst),
            "kmeans++" | "kmeans-plus-plus" | "kmeanspp" => Ok(InitMethod::KmeansPlusPlus),
            "manual" => Ok(InitMethod::Manual),
            _ => Err(Error::UnknownMethod(s.to_string())),
        }
    }
}

/// Outcome of an initialization request.
#[derive(Debug, Clone, PartialEq)]
pub enum Seeding {
    /// Exactly k centroids are available.
    Complete(Vec<Point>),
    /// Manual seeding with fewer than k centroids so far.
    Partial(Vec<Point>),
}

impl Seeding {
    /// The centroids, complete or not.
    pub fn centroids(&self) -> &[Point] {
        match self {
            Seeding::Complete(c) | Seeding::Partial(c) => c,
        }
    }
}

/// Validate a requested cluster count against the dataset size.
///
/// Accepts `1 <= k <= n_items`.
pub fn validate_k(k: i64, n_items: usize) -> Result<usize> {
    match usize::try_from(k) {
        Ok(k) if k >= 1 && k <= n_items => Ok(k),
        _ => Err(Error::InvalidClusterCount {
            requested: k,
            n_items,
        }),
    }
}

/// Parse a cluster count typed by a user.
///
/// Rejects empty, non-numeric, fractional and non-positive input.
pub fn parse_k(s: &str) -> Result<i64> {
    let s = s.trim();
    let k: i64 = s
        .parse()
        .map_err(|_| Error::invalid_parameter("k", format!("'{s}' is not an integer")))?;
    if k <= 0 {
        return Err(Error::invalid_parameter(
            "k",
            format!("must be positive, got {k}"),
        ));
    }
    Ok(k)
}

/// Produce initial centroids for `data`.
///
/// `seeds` is only consulted for [`InitMethod::Manual`]; it holds every
/// manual centroid collected so far.
pub fn initialize<R: Rng + ?Sized>(
    data: &[Point],
    k: i64,
    method: InitMethod,
    seeds: &[Point],
    rng: &mut R,
) -> Result<Seeding> {
    let k = validate_k(k, data.len())?;
    let centroids = match method {
        InitMethod::Random => init_random(data, k, rng),
        InitMethod::FarthestFirst => pick(data, farthest_first_indices(data, k, rng)),
        InitMethod::KmeansPlusPlus => pick(data, kmeans_plus_plus_indices(data, k, rng)),
        InitMethod::Manual => return manual(seeds, k),
    };
    Ok(Seeding::Complete(centroids))
}

fn pick(data: &[Point], indices: Vec<usize>) -> Vec<Point> {
    indices.into_iter().map(|i| data[i]).collect()
}

fn manual(seeds: &[Point], k: usize) -> Result<Seeding> {
    if seeds.len() > k {
        return Err(Error::SeedCountMismatch {
            expected: k,
            found: seeds.len(),
        });
    }
    if let Some(bad) = seeds.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(Error::invalid_parameter(
            "centroids",
            format!("manual centroid {bad:?} is not finite"),
        ));
    }
    if seeds.len() == k {
        Ok(Seeding::Complete(seeds.to_vec()))
    } else {
        Ok(Seeding::Partial(seeds.to_vec()))
    }
}

/// k distinct dataset points, uniformly without replacement.
///
/// Caller guarantees `k <= data.len()`.
pub fn init_random<R: Rng + ?Sized>(data: &[Point], k: usize, rng: &mut R) -> Vec<Point> {
    index::sample(rng, data.len(), k)
        .into_iter()
        .map(|i| data[i])
        .collect()
}

/// Dataset indices chosen by farthest-first traversal.
pub fn farthest_first_indices<R: Rng + ?Sized>(
    data: &[Point],
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut seeds = SeedState::start(data, k, rng);
    while seeds.chosen.len() < k {
        let Some(next) = seeds.farthest() else { break };
        seeds.take(data, next);
    }
    seeds.chosen
}

/// Dataset indices chosen by D²-weighted sampling.
pub fn kmeans_plus_plus_indices<R: Rng + ?Sized>(
    data: &[Point],
    k: usize,
    rng: &mut R,
) -> Vec<usize> {
    let mut seeds = SeedState::start(data, k, rng);
    while seeds.chosen.len() < k {
        let next = match seeds.weighted(rng) {
            Some(j) => Some(j),
            // Every remaining point coincides with a chosen one.
            None => seeds.uniform_free(rng),
        };
        let Some(next) = next else { break };
        seeds.take(data, next);
    }
    seeds.chosen
}

/// Shared bookkeeping for the sequential seeding strategies.
struct SeedState {
    chosen: Vec<usize>,
    taken: Vec<bool>,
    /// D(x)² to the nearest chosen centroid.
    nearest: Vec<f64>,
}

impl SeedState {
    fn start<R: Rng + ?Sized>(data: &[Point], k: usize, rng: &mut R) -> Self {
        let mut state = Self {
            chosen: Vec::with_capacity(k),
            taken: vec![false; data.len()],
            nearest: vec![f64::INFINITY; data.len()],
        };
        if k > 0 && !data.is_empty() {
            let first = rng.random_range(0..data.len());
            state.take(data, first);
        }
        state
    }

    fn take(&mut self, data: &[Point], idx: usize) {
        self.chosen.push(idx);
        self.taken[idx] = true;
        let c = data[idx];
        for (d, p) in self.nearest.iter_mut().zip(data) {
            *d = d.min(p.squared_distance(&c));
        }
    }

    /// Untaken point with the largest D², earliest index on ties.
    fn farthest(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (j, &d) in self.nearest.iter().enumerate() {
            if self.taken[j] {
                continue;
            }
            if best.map_or(true, |(_, bd)| d > bd) {
                best = Some((j, d));
            }
        }
        best.map(|(j, _)| j)
    }

    fn weighted<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let (nearest, taken) = (&self.nearest, &self.taken);
        let free = move || {
            nearest
                .iter()
                .enumerate()
                .filter(move |&(j, &d)| !taken[j] && d > 0.0)
        };
        let total: f64 = free().map(|(_, d)| d).sum();
        if !(total > 0.0) {
            return None;
        }

        let threshold = rng.random::<f64>() * total;
        let mut cumsum = 0.0;
        let mut selected = None;
        for (j, &d) in free() {
            cumsum += d;
            selected = Some(j);
            if cumsum >= threshold {
                break;
            }
        }
        selected
    }

    fn uniform_free<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let free: Vec<usize> = (0..self.taken.len()).filter(|&j| !self.taken[j]).collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.random_range(0..free.len())])
    }
}
