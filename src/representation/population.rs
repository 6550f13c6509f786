//! # Population
//!
//! A fixed-length, ordered collection of individuals. The length is set when the
//! population is created and never changes: scores are written in place through
//! [`Population::individuals_mut`], and a new generation swaps in through
//! [`Population::replace`], which rejects buffers of the wrong size.

use super::{FeatureMap, Individual};
use crate::error::{EvolutionError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Population<F: FeatureMap> {
    individuals: Vec<Individual<F>>,
}

impl<F: FeatureMap> Population<F> {
    /// Wraps `individuals` into a population.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` if `individuals` is empty.
    pub fn new(individuals: Vec<Individual<F>>) -> Result<Self> {
        if individuals.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }
        Ok(Self { individuals })
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    /// Always `false`; kept for parity with `len`.
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individuals(&self) -> &[Individual<F>] {
        &self.individuals
    }

    /// Mutable access to the individuals. The slice cannot change the population's length.
    pub fn individuals_mut(&mut self) -> &mut [Individual<F>] {
        &mut self.individuals
    }

    pub fn get(&self, index: usize) -> Option<&Individual<F>> {
        self.individuals.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Individual<F>> {
        self.individuals.iter()
    }

    pub fn into_individuals(self) -> Vec<Individual<F>> {
        self.individuals
    }

    /// Returns `true` if every individual has been scored.
    pub fn is_evaluated(&self) -> bool {
        self.individuals.iter().all(Individual::is_evaluated)
    }

    /// Replaces every individual with `offspring` and returns the previous generation.
    ///
    /// # Errors
    ///
    /// Returns a breeding error if `offspring` does not match the population size.
    pub fn replace(&mut self, offspring: Vec<Individual<F>>) -> Result<Vec<Individual<F>>> {
        if offspring.len() != self.individuals.len() {
            return Err(EvolutionError::Breeding(format!(
                "Offspring count ({}) doesn't match population size ({})",
                offspring.len(),
                self.individuals.len()
            )));
        }
        Ok(std::mem::replace(&mut self.individuals, offspring))
    }

    /// Returns the individual with the highest relevance at `fraction`.
    pub fn best_individual(&self, fraction: f32) -> &Individual<F> {
        self.extreme(fraction, |candidate, current| candidate > current)
    }

    /// Returns the individual with the lowest relevance at `fraction`.
    pub fn worst_individual(&self, fraction: f32) -> &Individual<F> {
        self.extreme(fraction, |candidate, current| candidate < current)
    }

    /// Returns the individual whose relevance at `fraction` is closest to the mean.
    pub fn average_individual(&self, fraction: f32) -> &Individual<F> {
        let mean = self.mean_relevance(fraction);
        self.extreme(fraction, |candidate, current| {
            (candidate - mean).abs() < (current - mean).abs()
        })
    }

    /// Returns the mean relevance at `fraction`.
    pub fn mean_relevance(&self, fraction: f32) -> f32 {
        let total: f32 = self.individuals.iter().map(|i| i.relevance(fraction)).sum();
        total / self.individuals.len() as f32
    }

    // Returns the first individual that `prefer` ranks above every other one.
    fn extreme<P>(&self, fraction: f32, prefer: P) -> &Individual<F>
    where
        P: Fn(f32, f32) -> bool,
    {
        let mut chosen = &self.individuals[0];
        let mut chosen_relevance = chosen.relevance(fraction);
        for individual in &self.individuals[1..] {
            let relevance = individual.relevance(fraction);
            if prefer(relevance, chosen_relevance) {
                chosen = individual;
                chosen_relevance = relevance;
            }
        }
        chosen
    }
}

impl<'a, F: FeatureMap> IntoIterator for &'a Population<F> {
    type Item = &'a Individual<F>;
    type IntoIter = std::slice::Iter<'a, Individual<F>>;

    fn into_iter(self) -> Self::IntoIter {
        self.individuals.iter()
    }
}
