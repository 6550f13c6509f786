//! The driver of the variation phase.
//!
//! Every breeder worker owns one slice of the offspring buffer. It invokes the tree
//! root over the whole current population, which all workers share read-only, and
//! writes the results into its own slice until the slice is full. Surplus offspring
//! of the last invocation are dropped.

use std::ops::Range;

use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use super::VariationSource;
use crate::error::{EvolutionError, Result};
use crate::representation::{FeatureMap, Individual, Population};
use crate::worker::{partition, split_chunks, thread_pool, Worker};

pub struct Breeder<F: FeatureMap> {
    root: VariationSource<F>,
    ranges: Vec<Range<usize>>,
    workers: Vec<Worker>,
    pool: rayon::ThreadPool,
}

impl<F: FeatureMap> Breeder<F> {
    /// Creates a breeder that produces `population_size` offspring per call on
    /// `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `threads` is zero, or a thread pool error if the
    /// workers cannot be spawned.
    pub fn new(
        root: VariationSource<F>,
        population_size: usize,
        threads: usize,
        seed: Option<u64>,
    ) -> Result<Self> {
        Ok(Self {
            root,
            ranges: partition(population_size, threads)?,
            workers: Worker::partitioned(population_size, threads, seed)?,
            pool: thread_pool("breeder", threads)?,
        })
    }

    pub fn root(&self) -> &VariationSource<F> {
        &self.root
    }

    /// Produces a full generation of offspring from `population`.
    ///
    /// `population` is not modified. The offspring are returned in buffer order, one
    /// contiguous block per worker.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the population size differs from the one the
    /// breeder was partitioned for, and otherwise the first operator error.
    #[instrument(skip_all, name = "vary")]
    pub fn vary(&mut self, population: &Population<F>) -> Result<Vec<Individual<F>>> {
        let size = self.ranges.last().map_or(0, |range| range.end);
        if population.len() != size {
            return Err(EvolutionError::Configuration(format!(
                "Breeder was partitioned for {} individuals but the population has {}",
                size,
                population.len()
            )));
        }

        let mut buffer: Vec<Option<Individual<F>>> = (0..size).map(|_| None).collect();
        let Self {
            root,
            ranges,
            workers,
            pool,
        } = self;
        let root: &VariationSource<F> = root;
        let parents = population.individuals();
        let chunks = split_chunks(&mut buffer, ranges);

        let results: Vec<Result<()>> = pool.install(|| {
            workers
                .par_iter_mut()
                .zip(chunks.into_par_iter())
                .map(|(worker, chunk)| fill_chunk(root, parents, chunk, worker))
                .collect()
        });
        for result in results {
            result?;
        }

        let offspring: Vec<Individual<F>> = buffer.into_iter().flatten().collect();
        if offspring.len() != size {
            return Err(EvolutionError::Breeding(format!(
                "Offspring buffer holds {} of {} individuals",
                offspring.len(),
                size
            )));
        }
        debug!(offspring = offspring.len(), "offspring bred");

        Ok(offspring)
    }
}

fn fill_chunk<F: FeatureMap>(
    root: &VariationSource<F>,
    parents: &[Individual<F>],
    chunk: &mut [Option<Individual<F>>],
    worker: &mut Worker,
) -> Result<()> {
    let mut filled = 0;
    let mut invocations = 0usize;
    while filled < chunk.len() {
        for child in root.perform(parents, worker)? {
            if filled == chunk.len() {
                break;
            }
            chunk[filled] = Some(child);
            filled += 1;
        }
        invocations += 1;
    }
    trace!(onset = worker.onset(), offset = worker.offset(), invocations, "chunk bred");

    Ok(())
}
