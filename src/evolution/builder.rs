use crate::{
    error::{EvolutionError, OptionExt, Result},
    evaluation::Problem,
    initialization::Builder,
    network::{EvolutionaryNetwork, NeutralNetwork},
    representation::{FeatureMap, Individual},
    variation::VariationSource,
    worker::Worker,
};

use super::{EvolutionOptions, EvolutionarySystem};

/// Assembles an [`EvolutionarySystem`].
///
/// The builder, problem and variation tree are required. Without a network the
/// system uses [`NeutralNetwork`]; without options it uses
/// [`EvolutionOptions::default`].
pub struct EvolutionarySystemBuilder<F: FeatureMap> {
    builder: Option<Builder<F>>,
    problem: Option<Box<dyn Problem<F>>>,
    variation: Option<VariationSource<F>>,
    network: Option<Box<dyn EvolutionaryNetwork<F>>>,
    options: EvolutionOptions,
}

impl<F: FeatureMap> EvolutionarySystemBuilder<F> {
    pub fn new() -> Self {
        Self {
            builder: None,
            problem: None,
            variation: None,
            network: None,
            options: EvolutionOptions::default(),
        }
    }

    pub fn with_builder(mut self, builder: Builder<F>) -> Self {
        self.builder = Some(builder);
        self
    }

    pub fn with_problem<P>(mut self, problem: P) -> Self
    where
        P: Problem<F> + 'static,
    {
        self.problem = Some(Box::new(problem));
        self
    }

    /// Uses the closure `eval` as scoring function. The run never completes early.
    pub fn with_problem_fn<C>(self, eval: C) -> Self
    where
        C: Fn(&mut Individual<F>, &mut Worker) -> Result<()> + Send + Sync + 'static,
    {
        self.with_problem(eval)
    }

    pub fn with_variation(mut self, variation: VariationSource<F>) -> Self {
        self.variation = Some(variation);
        self
    }

    pub fn with_network<N>(mut self, network: N) -> Self
    where
        N: EvolutionaryNetwork<F> + 'static,
    {
        self.network = Some(Box::new(network));
        self
    }

    pub fn with_options(mut self, options: EvolutionOptions) -> Self {
        self.options = options;
        self
    }

    /// # Errors
    ///
    /// Returns a configuration error if a required component is missing or the
    /// options do not validate, or a thread pool error if workers cannot be spawned.
    pub fn build(self) -> Result<EvolutionarySystem<F>> {
        let builder = self.builder.ok_or_else_evolution(|| {
            EvolutionError::Configuration("Builder not specified".to_string())
        })?;

        let problem = self.problem.ok_or_else_evolution(|| {
            EvolutionError::Configuration("Problem not specified".to_string())
        })?;

        let variation = self.variation.ok_or_else_evolution(|| {
            EvolutionError::Configuration("Variation tree not specified".to_string())
        })?;

        let network: Box<dyn EvolutionaryNetwork<F>> = match self.network {
            Some(network) => network,
            None => Box::new(NeutralNetwork),
        };

        EvolutionarySystem::new(self.options, builder, problem, variation, network)
    }
}

impl<F: FeatureMap> Default for EvolutionarySystemBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}
