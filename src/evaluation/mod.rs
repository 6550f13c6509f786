//! # Evaluation
//!
//! The [`Evaluator`] drives the evaluation phase. It splits the population into one
//! chunk per evaluation worker, scores every unevaluated individual of a chunk on that
//! chunk's worker, and returns only after every worker has finished.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::evaluation::Evaluator;
//! use ratatoskr::representation::{Individual, Population};
//!
//! let individuals = (0..6).map(|x| Individual::new(x as f32)).collect();
//! let mut population = Population::new(individuals).unwrap();
//! let mut evaluator = Evaluator::<f32>::from_fn(6, 3, None, |individual, _| {
//!     let x = *individual.featuremap();
//!     individual.score(x, x * x);
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(evaluator.evaluate_population(&mut population).unwrap(), 6);
//! assert!(population.is_evaluated());
//! assert_eq!(population.get(3).unwrap().fitness().value(), 9.0);
//! ```

use std::ops::Range;

use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::error::{EvolutionError, Result};
use crate::representation::{FeatureMap, Individual, Population};
use crate::worker::{partition, split_chunks, thread_pool, Worker};

/// A problem definition: scores individuals and decides when a run is complete.
///
/// `evaluate` is called concurrently from several workers and must only touch the
/// individual it receives. Closures with the matching signature implement this trait
/// and never report completion.
pub trait Problem<F: FeatureMap>: Send + Sync {
    /// Writes cost and fitness into `individual`.
    fn evaluate(&self, individual: &mut Individual<F>, worker: &mut Worker) -> Result<()>;

    /// Returns `true` once `population` solves the problem. Checked once per generation.
    fn is_complete(&self, _population: &Population<F>) -> bool {
        false
    }
}

impl<F, T> Problem<F> for T
where
    F: FeatureMap,
    T: Fn(&mut Individual<F>, &mut Worker) -> Result<()> + Send + Sync,
{
    fn evaluate(&self, individual: &mut Individual<F>, worker: &mut Worker) -> Result<()> {
        self(individual, worker)
    }
}

/// Scores populations concurrently on a fixed set of evaluation workers.
pub struct Evaluator<F: FeatureMap> {
    problem: Box<dyn Problem<F>>,
    ranges: Vec<Range<usize>>,
    workers: Vec<Worker>,
    pool: rayon::ThreadPool,
}

impl<F: FeatureMap> Evaluator<F> {
    /// Creates an evaluator for populations of `population_size` on `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `threads` is zero, or a thread pool error if the
    /// workers cannot be spawned.
    pub fn new<P>(
        problem: P,
        population_size: usize,
        threads: usize,
        seed: Option<u64>,
    ) -> Result<Self>
    where
        P: Problem<F> + 'static,
    {
        Self::from_boxed(Box::new(problem), population_size, threads, seed)
    }

    /// Creates an evaluator around an already boxed problem.
    pub fn from_boxed(
        problem: Box<dyn Problem<F>>,
        population_size: usize,
        threads: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            problem,
            ranges: partition(population_size, threads)?,
            workers: Worker::partitioned(population_size, threads, seed)?,
            pool: thread_pool("evaluator", threads)?,
        })
    }

    /// Creates an evaluator whose scoring function is the closure `eval`.
    pub fn from_fn<C>(
        population_size: usize,
        threads: usize,
        seed: Option<u64>,
        eval: C,
    ) -> Result<Self>
    where
        C: Fn(&mut Individual<F>, &mut Worker) -> Result<()> + Send + Sync + 'static,
    {
        Self::new(eval, population_size, threads, seed)
    }

    pub fn problem(&self) -> &dyn Problem<F> {
        self.problem.as_ref()
    }

    /// Returns the number of evaluation workers.
    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    /// Scores every unevaluated individual of `population` in place.
    ///
    /// Individuals are neither reordered nor replaced. Each one is visited by exactly
    /// one worker, and the call returns after all workers have joined.
    ///
    /// # Returns
    ///
    /// The number of individuals scored by this call.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the population size differs from the one the
    /// evaluator was partitioned for, and otherwise the first error raised by the
    /// scoring function or a non-finite score.
    #[instrument(skip_all, name = "evaluate")]
    pub fn evaluate_population(&mut self, population: &mut Population<F>) -> Result<usize> {
        let expected = self.ranges.last().map_or(0, |range| range.end);
        if population.len() != expected {
            return Err(EvolutionError::Configuration(format!(
                "Evaluator was partitioned for {} individuals but the population has {}",
                expected,
                population.len()
            )));
        }

        let Self {
            problem,
            ranges,
            workers,
            pool,
        } = self;
        let problem: &dyn Problem<F> = &**problem;
        let chunks = split_chunks(population.individuals_mut(), ranges);

        let results: Vec<Result<usize>> = pool.install(|| {
            workers
                .par_iter_mut()
                .zip(chunks.into_par_iter())
                .map(|(worker, chunk)| evaluate_chunk(problem, chunk, worker))
                .collect()
        });

        let mut evaluated = 0;
        for result in results {
            evaluated += result?;
        }
        debug!(evaluated, "population evaluated");

        Ok(evaluated)
    }
}

fn evaluate_chunk<F: FeatureMap>(
    problem: &dyn Problem<F>,
    chunk: &mut [Individual<F>],
    worker: &mut Worker,
) -> Result<usize> {
    let mut evaluated = 0;
    for individual in chunk.iter_mut().filter(|individual| !individual.is_evaluated()) {
        problem.evaluate(individual, worker)?;

        let (cost, fitness) = (individual.cost().value(), individual.fitness().value());
        if !cost.is_finite() || !fitness.is_finite() {
            return Err(EvolutionError::InvalidNumericValue(format!(
                "Non-finite score encountered (cost {}, fitness {})",
                cost, fitness
            )));
        }

        individual.set_evaluated(true);
        evaluated += 1;
    }
    trace!(onset = worker.onset(), offset = worker.offset(), evaluated, "chunk evaluated");

    Ok(evaluated)
}
