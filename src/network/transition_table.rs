//! A tabular TD(0) model over relevance bins.
//!
//! Individuals are mapped to one of `states` bins by their relevance. The table keeps
//! a value per bin, learned from how the offspring a bin produced compare with the
//! rest of their generation:
//!
//! ```text
//! V[s] += learning_rate * mean(reward + discount_factor * V[s'] - V[s])
//! ```
//!
//! Offspring are credited to the bin of the parent named by their lineage. Offspring
//! without a lineage credit nothing, and bins that produced no offspring keep their
//! value. Offspring are still unevaluated when `update` runs, so each round is
//! recorded as pending and credited on the next update, once those offspring have
//! been scored and come back as parents. The reward of one offspring is its
//! relevance minus the mean relevance of its generation. The signal for bin `s` is
//! `max(MIN_SIGNAL, 1 + V[s])`.

use tracing::trace;

use super::EvolutionaryNetwork;
use crate::error::{EvolutionError, Result};
use crate::representation::{FeatureMap, Individual};

/// The smallest multiplier the table hands out, so no bin is ever excluded.
pub const MIN_SIGNAL: f32 = 0.05;

/// Returns the TD error `reward + discount * next_value - value`.
pub fn temporal_difference(value: f32, next_value: f32, discount: f32, reward: f32) -> f32 {
    reward + discount * next_value - value
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    state: usize,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionTable {
    values: Vec<f32>,
    learning_rate: f32,
    discount_factor: f32,
    fraction: f32,
    // one entry per offspring slot, `None` when the offspring has no lineage
    #[cfg_attr(feature = "serde", serde(skip))]
    pending: Vec<Option<Transition>>,
}

impl TransitionTable {
    /// Creates a table of `states` bins, all valued zero.
    ///
    /// `fraction` is the cost/fitness blend used to compute relevance.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `states` is zero or if the learning rate or
    /// discount factor lie outside `[0, 1]`.
    pub fn new(
        states: usize,
        learning_rate: f32,
        discount_factor: f32,
        fraction: f32,
    ) -> Result<Self> {
        if states == 0 {
            return Err(EvolutionError::Configuration(
                "Transition table needs at least one state".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&learning_rate) {
            return Err(EvolutionError::Configuration(format!(
                "Learning rate must lie in [0, 1], got {}",
                learning_rate
            )));
        }
        if !(0.0..=1.0).contains(&discount_factor) {
            return Err(EvolutionError::Configuration(format!(
                "Discount factor must lie in [0, 1], got {}",
                discount_factor
            )));
        }

        Ok(Self {
            values: vec![0.0; states],
            learning_rate,
            discount_factor,
            fraction,
            pending: Vec::new(),
        })
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Returns the bin of `individual`.
    pub fn state<F: FeatureMap>(&self, individual: &Individual<F>) -> usize {
        let relevance = individual.relevance(self.fraction).clamp(0.0, 1.0);
        ((relevance * self.values.len() as f32) as usize).min(self.values.len() - 1)
    }

    /// Returns the number of transitions waiting for credit.
    pub fn pending(&self) -> usize {
        self.pending.iter().flatten().count()
    }

    // Credits every pending transition against the offspring now scored in its slot.
    // Errors are averaged per bin so the order of offspring does not matter.
    fn credit<F: FeatureMap>(&mut self, successors: &[Individual<F>]) {
        let baseline = successors
            .iter()
            .map(|successor| successor.relevance(self.fraction))
            .sum::<f32>()
            / successors.len() as f32;

        let mut errors = vec![(0.0f32, 0usize); self.values.len()];
        for (transition, successor) in self.pending.iter().zip(successors) {
            let Some(transition) = transition else {
                continue;
            };
            let reward = successor.relevance(self.fraction) - baseline;
            let error = temporal_difference(
                self.values[transition.state],
                self.values[self.state(successor)],
                self.discount_factor,
                reward,
            );
            let (sum, count) = &mut errors[transition.state];
            *sum += error;
            *count += 1;
        }

        for (value, (sum, count)) in self.values.iter_mut().zip(errors) {
            if count > 0 {
                *value += self.learning_rate * sum / count as f32;
            }
        }
    }
}

impl<F: FeatureMap> EvolutionaryNetwork<F> for TransitionTable {
    fn output(&self, individuals: &[Individual<F>]) -> Vec<f32> {
        individuals
            .iter()
            .map(|individual| (1.0 + self.values[self.state(individual)]).max(MIN_SIGNAL))
            .collect()
    }

    fn update(&mut self, parents: &[Individual<F>], offspring: &[Individual<F>]) {
        if !parents.is_empty() && self.pending.len() == parents.len() {
            self.credit(parents);
            trace!(credited = self.pending(), "transitions credited");
        }

        self.pending = offspring
            .iter()
            .map(|child| {
                child
                    .lineage()
                    .and_then(|slot| parents.get(slot))
                    .map(|parent| Transition {
                        state: self.state(parent),
                    })
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(value: f32) -> Individual<()> {
        let mut individual = Individual::new(());
        individual.score(value, value);
        individual
    }

    fn descending(lineage: &[usize]) -> Vec<Individual<()>> {
        lineage
            .iter()
            .map(|&slot| {
                let mut child = Individual::new(());
                child.set_lineage(Some(slot));
                child
            })
            .collect()
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_temporal_difference() {
        assert_eq!(temporal_difference(2.0, 1.0, 0.5, 0.0), -1.5);
        assert_eq!(temporal_difference(5.0, 1.0, 0.5, 2.0), -2.5);
        assert_eq!(temporal_difference(0.0, 1.0, 0.5, 0.0), 0.5);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(TransitionTable::new(0, 0.1, 0.9, 0.5).is_err());
        assert!(TransitionTable::new(4, 1.1, 0.9, 0.5).is_err());
        assert!(TransitionTable::new(4, 0.1, -0.1, 0.5).is_err());
    }

    #[test]
    fn test_states() {
        let table = TransitionTable::new(4, 0.5, 0.5, 0.5).unwrap();
        // relevance 1 / (1 + x)
        assert_eq!(table.state(&scored(0.0)), 3);
        assert_eq!(table.state(&scored(1.0)), 2);
        assert_eq!(table.state(&scored(9.0)), 0);
    }

    #[test]
    fn test_untrained_output_is_neutral() {
        let table = TransitionTable::new(4, 0.5, 0.5, 0.5).unwrap();
        let individuals = vec![scored(0.0), scored(3.0)];
        assert_eq!(table.output(&individuals), vec![1.0, 1.0]);
    }

    #[test]
    fn test_only_breeding_bins_are_credited() {
        let mut table = TransitionTable::new(4, 0.5, 0.5, 0.5).unwrap();
        let parents = vec![scored(0.0), scored(9.0), scored(9.0), scored(9.0)];

        // every offspring is a clone of the good parent in slot 0
        table.update(&parents, &descending(&[0, 0, 0, 0]));
        assert_eq!(table.pending(), 4);

        let successors = vec![scored(0.0); 4];
        table.update(&successors, &descending(&[0, 1, 2, 3]));

        assert_eq!(&table.values()[..3], &[0.0; 3]);
        let signals = table.output(&[scored(0.0), scored(9.0)]);
        assert_eq!(signals[1], 1.0);
        assert!(signals[1] <= signals[0]);
    }

    #[test]
    fn test_offspring_without_lineage_credit_nothing() {
        let mut table = TransitionTable::new(4, 0.5, 0.0, 0.5).unwrap();
        let parents = vec![scored(0.0), scored(9.0)];
        table.update(&parents, &[Individual::new(()), Individual::new(())]);
        assert_eq!(table.pending(), 0);

        table.update(&[scored(0.0), scored(9.0)], &descending(&[0, 1]));
        assert_eq!(table.values(), &[0.0; 4]);
        assert_eq!(table.pending(), 2);
    }

    #[test]
    fn test_better_offspring_reinforce_their_bin() {
        let mut table = TransitionTable::new(4, 0.5, 0.0, 0.5).unwrap();

        // first round only records where each offspring came from
        let parents = vec![scored(0.0), scored(9.0), scored(9.0), scored(9.0)];
        table.update(&parents, &descending(&[0, 0, 1, 1]));
        assert_eq!(table.values(), &[0.0; 4]);

        // relevances 1.0, 1.0, 0.1, 0.1 around a mean of 0.55
        let successors = vec![scored(0.0), scored(0.0), scored(9.0), scored(9.0)];
        table.update(&successors, &descending(&[0, 1, 2, 3]));

        let values = table.values();
        assert!(close(values[3], 0.225), "good bin value {}", values[3]);
        assert!(close(values[0], -0.225), "bad bin value {}", values[0]);
        assert_eq!(values[1], 0.0);
        assert_eq!(values[2], 0.0);

        let signals = table.output(&[scored(0.0), scored(9.0)]);
        assert!(signals[0] > 1.0);
        assert!(signals[1] < 1.0);
        assert!(signals[1] >= MIN_SIGNAL);
    }

    #[test]
    fn test_decline_is_penalized_but_bounded() {
        let mut table = TransitionTable::new(2, 1.0, 0.0, 0.5).unwrap();
        let parents = vec![scored(0.0), scored(1000.0)];
        // the good parent's offspring ends up worst of its generation and vice versa
        let successors = vec![scored(1000.0), scored(0.0)];

        for _ in 0..10 {
            table.update(&parents, &descending(&[0, 1]));
            table.update(&successors, &descending(&[0, 1]));
        }

        let signal = table.output(&[scored(0.0)])[0];
        assert!(signal >= MIN_SIGNAL);
        assert!(signal < 1.0);
    }
}
