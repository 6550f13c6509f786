//! # Individual
//!
//! An `Individual` owns one [`Cost`], one [`Fitness`] and one feature map. Both scores
//! follow the "lower is better" convention, and they are blended into a single
//! relevance value that drives selection pressure:
//!
//! ```text
//! relevance(fraction) = 1 / (1 + (1 - fraction) * fitness + fraction * cost)
//! ```
//!
//! `fraction` is clamped to `[0, 1]` before use.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::representation::Individual;
//!
//! let mut individual = Individual::new(vec![true, false, true]);
//! individual.fitness_mut().set(2.5);
//! individual.cost_mut().set(5.0);
//!
//! assert_eq!(individual.relevance(0.0), 1.0 / 3.5);
//! assert_eq!(individual.relevance(7.0), individual.relevance(1.0));
//! ```

use std::cmp::Ordering;

use super::FeatureMap;

/// The cost of an individual. Lower is better.
///
/// Comparisons treat the better cost as the greater one, so `Cost::new(2.0) >
/// Cost::new(5.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cost(f32);

impl Cost {
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn set(&mut self, value: f32) {
        self.0 = value;
    }
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        other.0.partial_cmp(&self.0)
    }
}

/// The fitness of an individual. Lower is better and zero is ideal.
///
/// Comparisons treat the better fitness as the greater one, so `Fitness::new(2.0) >
/// Fitness::new(5.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness(f32);

impl Fitness {
    pub fn new(value: f32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn set(&mut self, value: f32) {
        self.0 = value;
    }

    /// Returns `true` if no better fitness exists.
    pub fn is_ideal(&self) -> bool {
        self.0 == 0.0
    }
}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        other.0.partial_cmp(&self.0)
    }
}

/// A candidate solution.
///
/// Cloning an individual deep-copies its scores and feature map. Variation operators
/// always hand out clones, never references into the current population.
#[derive(Debug, Clone, PartialEq)]
pub struct Individual<F: FeatureMap> {
    cost: Cost,
    fitness: Fitness,
    featuremap: F,
    evaluated: bool,
    adjusted_relevance: f32,
    lineage: Option<usize>,
}

impl<F: FeatureMap> Individual<F> {
    /// Creates an unevaluated individual around `featuremap`.
    pub fn new(featuremap: F) -> Self {
        Self {
            cost: Cost::default(),
            fitness: Fitness::default(),
            featuremap,
            evaluated: false,
            adjusted_relevance: 0.0,
            lineage: None,
        }
    }

    /// Creates an individual with the given scores, not yet marked evaluated.
    pub fn with_scores(featuremap: F, cost: f32, fitness: f32) -> Self {
        Self {
            cost: Cost::new(cost),
            fitness: Fitness::new(fitness),
            ..Self::new(featuremap)
        }
    }

    pub fn cost(&self) -> &Cost {
        &self.cost
    }

    pub fn cost_mut(&mut self) -> &mut Cost {
        &mut self.cost
    }

    pub fn fitness(&self) -> &Fitness {
        &self.fitness
    }

    pub fn fitness_mut(&mut self) -> &mut Fitness {
        &mut self.fitness
    }

    pub fn featuremap(&self) -> &F {
        &self.featuremap
    }

    pub fn featuremap_mut(&mut self) -> &mut F {
        &mut self.featuremap
    }

    /// Returns `true` if the individual has been scored since it was last reset.
    pub fn is_evaluated(&self) -> bool {
        self.evaluated
    }

    pub fn set_evaluated(&mut self, evaluated: bool) {
        self.evaluated = evaluated;
    }

    /// Sets both scores and marks the individual evaluated.
    pub fn score(&mut self, cost: f32, fitness: f32) {
        self.cost.set(cost);
        self.fitness.set(fitness);
        self.evaluated = true;
    }

    /// Returns the population slot of the parent this individual descends from.
    ///
    /// Set when a selection leaf clones a parent out of the current population and
    /// carried through breeding operators that keep the individual. `None` for
    /// built individuals and for offspring a breeding operator creates from scratch.
    pub fn lineage(&self) -> Option<usize> {
        self.lineage
    }

    pub fn set_lineage(&mut self, lineage: Option<usize>) {
        self.lineage = lineage;
    }

    /// Clears scores and marks the individual unevaluated. Lineage is kept.
    pub fn reset(&mut self) {
        self.cost = Cost::default();
        self.fitness = Fitness::default();
        self.evaluated = false;
        self.adjusted_relevance = 0.0;
    }

    /// Blends cost and fitness into a relevance score in `(0, 1]` for non-negative scores.
    ///
    /// `fraction` is clamped to `[0, 1]`; `0` weighs fitness only, `1` cost only.
    pub fn relevance(&self, fraction: f32) -> f32 {
        let fraction = fraction.clamp(0.0, 1.0);
        1.0 / (1.0 + (1.0 - fraction) * self.fitness.value() + fraction * self.cost.value())
    }

    /// Returns the relevance used as selection weight, as last set by [`Self::adjust`].
    pub fn adjusted_relevance(&self) -> f32 {
        self.adjusted_relevance
    }

    /// Sets the adjusted relevance to `relevance(fraction) * signal`.
    pub fn adjust(&mut self, fraction: f32, signal: f32) {
        self.adjusted_relevance = self.relevance(fraction) * signal;
    }
}
