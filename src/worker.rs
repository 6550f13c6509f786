//! # Worker
//!
//! A `Worker` is the execution context of one chunk of the population. It owns the
//! half-open index range `[onset, offset)` it is responsible for and a private random
//! module. The workers of a phase partition the population exactly: ranges are
//! disjoint, contiguous and cover every index once, and their lengths differ by at
//! most one.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::worker::partition;
//!
//! let ranges = partition(10, 4).unwrap();
//! assert_eq!(ranges, vec![0..3, 3..6, 6..8, 8..10]);
//! ```

use std::ops::Range;

use crate::error::{EvolutionError, Result};
use crate::rng::Random;

/// Splits `[0, population_size)` into `threads` contiguous chunks.
///
/// The first `population_size % threads` chunks receive one extra element. When there
/// are more threads than individuals the trailing chunks are empty.
///
/// # Errors
///
/// Returns a configuration error if `threads` is zero.
pub fn partition(population_size: usize, threads: usize) -> Result<Vec<Range<usize>>> {
    if threads == 0 {
        return Err(EvolutionError::Configuration(
            "Thread count cannot be zero".to_string(),
        ));
    }

    let base = population_size / threads;
    let remainder = population_size % threads;
    let mut ranges = Vec::with_capacity(threads);
    let mut onset = 0;
    for chunk in 0..threads {
        let len = base + usize::from(chunk < remainder);
        ranges.push(onset..onset + len);
        onset += len;
    }

    Ok(ranges)
}

/// Splits `slice` into the disjoint mutable chunks described by `ranges`.
///
/// `ranges` must be the output of [`partition`] for `slice.len()`.
pub(crate) fn split_chunks<'a, T>(
    mut slice: &'a mut [T],
    ranges: &[Range<usize>],
) -> Vec<&'a mut [T]> {
    let mut chunks = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = slice.split_at_mut(range.len());
        chunks.push(head);
        slice = tail;
    }
    chunks
}

/// Creates the fixed-size pool that runs one phase's workers.
pub(crate) fn thread_pool(phase: &'static str, threads: usize) -> Result<rayon::ThreadPool> {
    Ok(rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |index| format!("{}-{}", phase, index))
        .build()?)
}

/// The execution context of one chunk of the population.
#[derive(Debug, Clone)]
pub struct Worker {
    onset: usize,
    offset: usize,
    /// The worker's private random module.
    pub random: Random,
}

impl Worker {
    /// Creates a worker responsible for `[onset, offset)`.
    pub fn new(onset: usize, offset: usize, random: Random) -> Self {
        Self {
            onset,
            offset,
            random,
        }
    }

    /// Creates one worker per chunk of `population_size` split across `threads`.
    ///
    /// Each worker gets its own random module derived from `seed` and its position.
    pub fn partitioned(
        population_size: usize,
        threads: usize,
        seed: Option<u64>,
    ) -> Result<Vec<Worker>> {
        Ok(partition(population_size, threads)?
            .into_iter()
            .enumerate()
            .map(|(index, range)| {
                Worker::new(range.start, range.end, Random::for_worker(seed, index))
            })
            .collect())
    }

    /// Returns the first index of the worker's chunk.
    pub fn onset(&self) -> usize {
        self.onset
    }

    /// Returns one past the last index of the worker's chunk.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the index range of the worker's chunk.
    pub fn range(&self) -> Range<usize> {
        self.onset..self.offset
    }

    /// Returns the number of individuals in the worker's chunk.
    pub fn len(&self) -> usize {
        self.offset - self.onset
    }

    /// Returns `true` if the worker's chunk is empty.
    pub fn is_empty(&self) -> bool {
        self.onset == self.offset
    }
}
