//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct is the immutable configuration snapshot of a run: the
//! population size, the three nested iteration counters, the per-phase thread counts,
//! and the hyperparameters of the adaptive network.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::evolution::options::EvolutionOptions;
//!
//! let options = EvolutionOptions::builder()
//!     .population_size(64)
//!     .epochs(2)
//!     .episodes(5)
//!     .generations(10)
//!     .evaluator_threads(4)
//!     .seed(7)
//!     .build();
//!
//! assert!(options.validate().is_ok());
//! assert_eq!(options.total_generations(), 100);
//! ```
//!
//! ## Fields
//!
//! - `population_size`: The number of individuals, fixed for the whole run.
//! - `epochs`, `episodes`, `generations`: Nested counters. A run performs at most
//!   `epochs * episodes * generations` generations.
//! - `builder_threads`, `evaluator_threads`, `breeder_threads`: Worker counts of the
//!   initialization, evaluation and variation phases.
//! - `relevance_fraction`: The cost/fitness blend used for selection weights.
//! - `learning_rate`, `discount_factor`: Hyperparameters of the adaptive network.
//! - `seed`: Seed for every worker's random module; entropy when absent.

use crate::error::{EvolutionError, Result};

fn default_threads() -> usize {
    std::thread::available_parallelism().map_or(1, |threads| threads.get())
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionOptions {
    population_size: usize,
    epochs: usize,
    episodes: usize,
    generations: usize,
    builder_threads: usize,
    evaluator_threads: usize,
    breeder_threads: usize,
    relevance_fraction: f32,
    learning_rate: f32,
    discount_factor: f32,
    seed: Option<u64>,
}

impl EvolutionOptions {
    /// Creates options with the given size and counters and default everything else.
    pub fn new(population_size: usize, epochs: usize, episodes: usize, generations: usize) -> Self {
        Self {
            population_size,
            epochs,
            episodes,
            generations,
            ..Self::default()
        }
    }

    /// Checks that the options describe a runnable configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the population size, a counter or a thread
    /// count is zero, or if the relevance fraction, learning rate or discount factor
    /// lie outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(EvolutionError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        for (name, count) in [
            ("epochs", self.epochs),
            ("episodes", self.episodes),
            ("generations", self.generations),
            ("builder threads", self.builder_threads),
            ("evaluator threads", self.evaluator_threads),
            ("breeder threads", self.breeder_threads),
        ] {
            if count == 0 {
                return Err(EvolutionError::Configuration(format!(
                    "Number of {} cannot be zero",
                    name
                )));
            }
        }

        for (name, value) in [
            ("Relevance fraction", self.relevance_fraction),
            ("Learning rate", self.learning_rate),
            ("Discount factor", self.discount_factor),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(EvolutionError::Configuration(format!(
                    "{} must lie in [0, 1], got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_epochs(&self) -> usize {
        self.epochs
    }

    pub fn get_episodes(&self) -> usize {
        self.episodes
    }

    pub fn get_generations(&self) -> usize {
        self.generations
    }

    /// Returns the upper bound on generations: `epochs * episodes * generations`.
    pub fn total_generations(&self) -> usize {
        self.epochs
            .saturating_mul(self.episodes)
            .saturating_mul(self.generations)
    }

    pub fn get_builder_threads(&self) -> usize {
        self.builder_threads
    }

    pub fn get_evaluator_threads(&self) -> usize {
        self.evaluator_threads
    }

    pub fn get_breeder_threads(&self) -> usize {
        self.breeder_threads
    }

    pub fn get_relevance_fraction(&self) -> f32 {
        self.relevance_fraction
    }

    pub fn get_learning_rate(&self) -> f32 {
        self.learning_rate
    }

    pub fn get_discount_factor(&self) -> f32 {
        self.discount_factor
    }

    pub fn get_seed(&self) -> Option<u64> {
        self.seed
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        let threads = default_threads();
        Self {
            population_size: 100,
            epochs: 1,
            episodes: 1,
            generations: 100,
            builder_threads: threads,
            evaluator_threads: threads,
            breeder_threads: threads,
            relevance_fraction: 0.5,
            learning_rate: 0.1,
            discount_factor: 0.9,
            seed: None,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset fields fall back to [`EvolutionOptions::default`].
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    population_size: Option<usize>,
    epochs: Option<usize>,
    episodes: Option<usize>,
    generations: Option<usize>,
    builder_threads: Option<usize>,
    evaluator_threads: Option<usize>,
    breeder_threads: Option<usize>,
    relevance_fraction: Option<f32>,
    learning_rate: Option<f32>,
    discount_factor: Option<f32>,
    seed: Option<u64>,
}

impl EvolutionOptionsBuilder {
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn epochs(mut self, value: usize) -> Self {
        self.epochs = Some(value);
        self
    }

    pub fn episodes(mut self, value: usize) -> Self {
        self.episodes = Some(value);
        self
    }

    pub fn generations(mut self, value: usize) -> Self {
        self.generations = Some(value);
        self
    }

    pub fn builder_threads(mut self, value: usize) -> Self {
        self.builder_threads = Some(value);
        self
    }

    pub fn evaluator_threads(mut self, value: usize) -> Self {
        self.evaluator_threads = Some(value);
        self
    }

    pub fn breeder_threads(mut self, value: usize) -> Self {
        self.breeder_threads = Some(value);
        self
    }

    /// Sets the builder, evaluator and breeder thread counts at once.
    pub fn threads(self, value: usize) -> Self {
        self.builder_threads(value)
            .evaluator_threads(value)
            .breeder_threads(value)
    }

    pub fn relevance_fraction(mut self, value: f32) -> Self {
        self.relevance_fraction = Some(value);
        self
    }

    pub fn learning_rate(mut self, value: f32) -> Self {
        self.learning_rate = Some(value);
        self
    }

    pub fn discount_factor(mut self, value: f32) -> Self {
        self.discount_factor = Some(value);
        self
    }

    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Builds the `EvolutionOptions` instance. Call [`EvolutionOptions::validate`]
    /// before running with it.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();
        EvolutionOptions {
            population_size: self.population_size.unwrap_or(defaults.population_size),
            epochs: self.epochs.unwrap_or(defaults.epochs),
            episodes: self.episodes.unwrap_or(defaults.episodes),
            generations: self.generations.unwrap_or(defaults.generations),
            builder_threads: self.builder_threads.unwrap_or(defaults.builder_threads),
            evaluator_threads: self.evaluator_threads.unwrap_or(defaults.evaluator_threads),
            breeder_threads: self.breeder_threads.unwrap_or(defaults.breeder_threads),
            relevance_fraction: self.relevance_fraction.unwrap_or(defaults.relevance_fraction),
            learning_rate: self.learning_rate.unwrap_or(defaults.learning_rate),
            discount_factor: self.discount_factor.unwrap_or(defaults.discount_factor),
            seed: self.seed.or(defaults.seed),
        }
    }
}
