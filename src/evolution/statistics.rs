//! Per-generation summaries of a run.
//!
//! Every recorded generation appends one best/average/worst triple for cost, fitness
//! and relevance. Best and worst are taken per metric: the lowest cost, the lowest
//! fitness and the highest relevance are "best".

use crate::representation::{FeatureMap, Population};

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
struct Series {
    best: Vec<f32>,
    average: Vec<f32>,
    worst: Vec<f32>,
}

impl Series {
    fn push(&mut self, values: impl Iterator<Item = f32>, lower_is_better: bool) {
        let (mut min, mut max) = (f32::INFINITY, f32::NEG_INFINITY);
        let (mut sum, mut count) = (0.0, 0usize);
        for value in values {
            min = min.min(value);
            max = max.max(value);
            sum += value;
            count += 1;
        }
        let (best, worst) = if lower_is_better { (min, max) } else { (max, min) };
        self.best.push(best);
        self.average.push(sum / count.max(1) as f32);
        self.worst.push(worst);
    }
}

/// Time series of best, average and worst cost, fitness and relevance.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Statistics {
    fraction: f32,
    costs: Series,
    fitnesses: Series,
    relevances: Series,
}

impl Statistics {
    /// Creates empty statistics that compute relevance at `fraction`.
    pub fn new(fraction: f32) -> Self {
        Self {
            fraction,
            ..Self::default()
        }
    }

    /// Appends one entry summarizing `population`.
    pub fn record<F: FeatureMap>(&mut self, population: &Population<F>) {
        self.costs.push(population.iter().map(|i| i.cost().value()), true);
        self.fitnesses.push(population.iter().map(|i| i.fitness().value()), true);
        self.relevances
            .push(population.iter().map(|i| i.relevance(self.fraction)), false);
    }

    /// Returns the number of recorded generations.
    pub fn len(&self) -> usize {
        self.costs.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn best_costs(&self) -> &[f32] {
        &self.costs.best
    }

    pub fn average_costs(&self) -> &[f32] {
        &self.costs.average
    }

    pub fn worst_costs(&self) -> &[f32] {
        &self.costs.worst
    }

    pub fn best_fitnesses(&self) -> &[f32] {
        &self.fitnesses.best
    }

    pub fn average_fitnesses(&self) -> &[f32] {
        &self.fitnesses.average
    }

    pub fn worst_fitnesses(&self) -> &[f32] {
        &self.fitnesses.worst
    }

    pub fn best_relevances(&self) -> &[f32] {
        &self.relevances.best
    }

    pub fn average_relevances(&self) -> &[f32] {
        &self.relevances.average
    }

    pub fn worst_relevances(&self) -> &[f32] {
        &self.relevances.worst
    }
}
