//! # Random
//!
//! The `Random` struct is the random module owned by a single worker. Each worker holds
//! its own generator so that one worker's sampling sequence never depends on how the
//! other workers were scheduled.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::rng::Random;
//!
//! let mut random = Random::from_seed(7);
//! let u = random.sample();
//! assert!((0.0..1.0).contains(&u));
//!
//! let index = random.sample_weighted_index(&[2.0, 5.0, 0.0]).unwrap();
//! assert!(index < 2);
//! ```

use rand::{
    distributions::{Distribution, WeightedError, WeightedIndex},
    rngs::StdRng,
    Rng, SeedableRng,
};
use tracing::warn;

use crate::error::{EvolutionError, Result, ResultExt};

/// Golden-ratio increment used to spread worker seeds derived from one run seed.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// A wrapper around the `rand` crate's `StdRng` providing the samplers used by
/// builders, selection operators and breeding operators.
#[derive(Debug, Clone)]
pub struct Random {
    rng: StdRng,
}

impl Random {
    /// Creates a new `Random` instance seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Creates a new `Random` instance with a specific seed.
    ///
    /// This is useful for reproducible tests and benchmarks.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates the random module of the worker at position `index` in its phase.
    ///
    /// With a run seed every worker receives a distinct, reproducible stream; without
    /// one each worker is seeded from entropy.
    pub fn for_worker(seed: Option<u64>, index: usize) -> Self {
        match seed {
            Some(seed) => Self::from_seed(seed ^ SEED_STRIDE.wrapping_mul(index as u64 + 1)),
            None => Self::new(),
        }
    }

    /// Samples a real number from `[0.0, 1.0)`.
    pub fn sample(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    /// Returns `true` with probability `p`.
    pub fn chance(&mut self, p: f64) -> bool {
        self.sample() < p
    }

    /// Samples an integer from the discrete uniform distribution over `[0, n)`.
    ///
    /// # Errors
    ///
    /// Returns a sampling error if `n` is zero.
    pub fn sample_uniform_index(&mut self, n: usize) -> Result<usize> {
        if n == 0 {
            return Err(EvolutionError::Sampling(
                "Cannot sample an index from an empty range".to_string(),
            ));
        }
        Ok(self.rng.gen_range(0..n))
    }

    /// Samples index `i` with probability `weights[i] / sum(weights)`.
    ///
    /// The cumulative distribution is built once per call and the caller's weights are
    /// left untouched. When every weight is zero the draw falls back to a uniform pick
    /// over all candidates.
    ///
    /// # Errors
    ///
    /// Returns a sampling error if `weights` is empty or contains a negative, NaN or
    /// infinite weight.
    pub fn sample_weighted_index(&mut self, weights: &[f32]) -> Result<usize> {
        if weights.is_empty() {
            return Err(EvolutionError::Sampling(
                "Cannot sample from an empty weight sequence".to_string(),
            ));
        }
        if let Some(bad) = weights.iter().find(|w| !w.is_finite()) {
            return Err(EvolutionError::Sampling(format!(
                "Weights must be finite, found {}",
                bad
            )));
        }

        match WeightedIndex::<f32>::new(weights) {
            Ok(distribution) => Ok(distribution.sample(&mut self.rng)),
            Err(WeightedError::AllWeightsZero) => {
                warn!(
                    candidates = weights.len(),
                    "all selection weights are zero, falling back to uniform sampling"
                );
                self.sample_uniform_index(weights.len())
            }
            Err(WeightedError::InvalidWeight) => Err(EvolutionError::Sampling(
                "Weights must be non-negative".to_string(),
            )),
            Err(e) => Err(e).context("Weighted sampling failed"),
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_in_unit_interval() {
        let mut random = Random::new();
        for _ in 0..1000 {
            let u = random.sample();
            assert!((0.0..1.0).contains(&u));
        }
    }

    #[test]
    fn test_sample_uniform_index() {
        let mut random = Random::from_seed(1);
        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[random.sample_uniform_index(4).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
        assert!(random.sample_uniform_index(0).is_err());
    }

    #[test]
    fn test_weighted_distribution() {
        let mut random = Random::from_seed(42);
        let weights = vec![2.0, 5.0, 0.0];
        let samples = 70_000;
        let mut counts = [0usize; 3];
        for _ in 0..samples {
            counts[random.sample_weighted_index(&weights).unwrap()] += 1;
        }

        assert_eq!(counts[2], 0);
        let first = counts[0] as f64 / samples as f64;
        let second = counts[1] as f64 / samples as f64;
        assert!((first - 2.0 / 7.0).abs() < 0.01, "index 0 frequency {}", first);
        assert!((second - 5.0 / 7.0).abs() < 0.01, "index 1 frequency {}", second);

        // The caller's weights are not mutated
        assert_eq!(weights, vec![2.0, 5.0, 0.0]);
    }

    #[test]
    fn test_weighted_all_zero_falls_back_to_uniform() {
        let mut random = Random::from_seed(3);
        let mut counts = [0usize; 3];
        for _ in 0..3000 {
            counts[random.sample_weighted_index(&[0.0, 0.0, 0.0]).unwrap()] += 1;
        }
        assert!(counts.iter().all(|c| *c > 800));
    }

    #[test]
    fn test_weighted_rejects_invalid_weights() {
        let mut random = Random::from_seed(3);
        assert!(matches!(
            random.sample_weighted_index(&[]),
            Err(EvolutionError::Sampling(_))
        ));
        assert!(random.sample_weighted_index(&[1.0, -0.5]).is_err());
        assert!(random.sample_weighted_index(&[1.0, f32::NAN]).is_err());
        assert!(random.sample_weighted_index(&[f32::INFINITY]).is_err());
    }

    #[test]
    fn test_clone_reproduces_sequence() {
        let mut first = Random::from_seed(42);
        let mut second = first.clone();
        let a: Vec<f64> = (0..5).map(|_| first.sample()).collect();
        let b: Vec<f64> = (0..5).map(|_| second.sample()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_worker_streams_differ() {
        let mut w0 = Random::for_worker(Some(9), 0);
        let mut w1 = Random::for_worker(Some(9), 1);
        let a: Vec<f64> = (0..5).map(|_| w0.sample()).collect();
        let b: Vec<f64> = (0..5).map(|_| w1.sample()).collect();
        assert_ne!(a, b);

        let mut again = Random::for_worker(Some(9), 0);
        let c: Vec<f64> = (0..5).map(|_| again.sample()).collect();
        assert_eq!(a, c);
    }
}
