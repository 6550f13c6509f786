//! # Evolutionary Network
//!
//! An optional learned component that adjusts selection pressure. Before every
//! variation phase the system asks the network for one signal per individual and
//! multiplies it into the individual's relevance; after breeding the network sees the
//! parents and their offspring and may update itself. Without a network every signal
//! is `1.0` ([`NeutralNetwork`]).
pub mod transition_table;

use crate::representation::{FeatureMap, Individual};

pub use transition_table::TransitionTable;

/// A model that re-weights relevance based on observed parent to offspring transitions.
pub trait EvolutionaryNetwork<F: FeatureMap>: Send + Sync {
    /// Returns one non-negative relevance multiplier per individual, in order.
    fn output(&self, individuals: &[Individual<F>]) -> Vec<f32>;

    /// Learns from one breeding round. Called once per generation, after breeding.
    fn update(&mut self, parents: &[Individual<F>], offspring: &[Individual<F>]);
}

/// Leaves relevance unadjusted and never learns.
#[derive(Debug, Clone, Default)]
pub struct NeutralNetwork;

impl<F: FeatureMap> EvolutionaryNetwork<F> for NeutralNetwork {
    fn output(&self, individuals: &[Individual<F>]) -> Vec<f32> {
        vec![1.0; individuals.len()]
    }

    fn update(&mut self, _parents: &[Individual<F>], _offspring: &[Individual<F>]) {}
}
