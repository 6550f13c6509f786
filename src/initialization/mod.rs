//! # Initialization
//!
//! A [`Builder`] produces the initial population one individual at a time: it clones
//! an immutable prototype, resets its scores, and hands the clone to a strategy-specific
//! [`Initializer`]. Population initialization issues one `build` call per slot, split
//! across the builder workers exactly like every other phase.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::initialization::Builder;
//! use ratatoskr::representation::Individual;
//!
//! let builder = Builder::from_fn(Individual::new(0u32), |individual, worker| {
//!     *individual.featuremap_mut() = worker.onset() as u32;
//!     Ok(())
//! });
//!
//! let population = builder.populate(8, 2, Some(1)).unwrap();
//! assert_eq!(population.len(), 8);
//! assert_eq!(*population.get(5).unwrap().featuremap(), 4);
//! ```

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::error::{EvolutionError, Result};
use crate::representation::{FeatureMap, Individual, Population};
use crate::worker::{thread_pool, Worker};

/// Strategy-specific initialization of a freshly cloned individual.
///
/// Implementations may draw from the worker's random module and must not touch any
/// individual other than the one passed in. Closures with the matching signature
/// implement this trait.
pub trait Initializer<F: FeatureMap>: Send + Sync {
    /// Initializes `individual`, typically by rewriting its feature map.
    fn initialize(&self, individual: &mut Individual<F>, worker: &mut Worker) -> Result<()>;
}

impl<F, T> Initializer<F> for T
where
    F: FeatureMap,
    T: Fn(&mut Individual<F>, &mut Worker) -> Result<()> + Send + Sync,
{
    fn initialize(&self, individual: &mut Individual<F>, worker: &mut Worker) -> Result<()> {
        self(individual, worker)
    }
}

/// Builds individuals from a prototype.
pub struct Builder<F: FeatureMap> {
    prototype: Individual<F>,
    initializer: Box<dyn Initializer<F>>,
}

impl<F: FeatureMap> Builder<F> {
    pub fn new<I>(prototype: Individual<F>, initializer: I) -> Self
    where
        I: Initializer<F> + 'static,
    {
        Self {
            prototype,
            initializer: Box::new(initializer),
        }
    }

    /// Creates a builder whose initializer is the closure `initialize`.
    pub fn from_fn<C>(prototype: Individual<F>, initialize: C) -> Self
    where
        C: Fn(&mut Individual<F>, &mut Worker) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(prototype, initialize)
    }

    pub fn prototype(&self) -> &Individual<F> {
        &self.prototype
    }

    /// Clones the prototype, resets it to the unevaluated state and initializes it.
    ///
    /// # Errors
    ///
    /// Propagates the initializer's error.
    pub fn build(&self, worker: &mut Worker) -> Result<Individual<F>> {
        let mut individual = self.prototype.clone();
        individual.reset();
        individual.set_lineage(None);
        self.initializer.initialize(&mut individual, worker)?;
        Ok(individual)
    }

    /// Builds a population of `population_size` individuals on `threads` workers.
    ///
    /// Worker `k` builds the individuals of its own chunk; results are concatenated in
    /// chunk order.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero size or thread count, and propagates
    /// the first initializer error once every worker has finished.
    #[instrument(skip(self), name = "initialize")]
    pub fn populate(
        &self,
        population_size: usize,
        threads: usize,
        seed: Option<u64>,
    ) -> Result<Population<F>> {
        if population_size == 0 {
            return Err(EvolutionError::Configuration(
                "Population size cannot be zero".to_string(),
            ));
        }

        let mut workers = Worker::partitioned(population_size, threads, seed)?;
        let pool = thread_pool("builder", threads)?;

        let chunks: Vec<Result<Vec<Individual<F>>>> = pool.install(|| {
            workers
                .par_iter_mut()
                .map(|worker| (0..worker.len()).map(|_| self.build(worker)).collect())
                .collect()
        });

        let mut individuals = Vec::with_capacity(population_size);
        for chunk in chunks {
            individuals.extend(chunk?);
        }
        debug!(population_size = individuals.len(), "population built");

        Population::new(individuals)
    }
}
