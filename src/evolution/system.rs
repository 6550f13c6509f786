//! # EvolutionarySystem
//!
//! The control loop of a run. One run moves through these phases:
//!
//! ```text
//! Idle -> Initializing -> { Evaluating -> Varying -> NetworkUpdating -> Recording } -> Terminal
//! ```
//!
//! The braced cycle is one generation. Generations nest inside episodes and episodes
//! inside epochs, so a run performs at most `epochs * episodes * generations` of them.
//! A run ends early only when the problem reports the evaluated population complete.
//! Every phase joins all of its workers before the next one starts.
//!
//! Each generation's offspring replace the whole population. When the counters run
//! out the last offspring are evaluated once more, so the returned population is
//! always fully scored.

use std::fmt;

use tracing::{debug, info, instrument, trace};

use super::options::EvolutionOptions;
use super::statistics::Statistics;
use crate::error::{EvolutionError, Result};
use crate::evaluation::{Evaluator, Problem};
use crate::initialization::Builder;
use crate::network::EvolutionaryNetwork;
use crate::representation::{FeatureMap, Individual, Population};
use crate::variation::{Breeder, VariationSource};

// Offsets the configured seed per phase so builder, evaluator and breeder workers
// never share a stream.
const PHASE_STRIDE: u64 = 0xA076_1D64_78BD_642F;

fn phase_seed(seed: Option<u64>, phase: u64) -> Option<u64> {
    seed.map(|seed| seed.wrapping_add(PHASE_STRIDE.wrapping_mul(phase)))
}

fn last(series: &[f32]) -> f32 {
    series.last().copied().unwrap_or_default()
}

/// The phase a system is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Initializing,
    Evaluating,
    Varying,
    NetworkUpdating,
    Recording,
    Terminal,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Initializing => "initializing",
            Phase::Evaluating => "evaluating",
            Phase::Varying => "varying",
            Phase::NetworkUpdating => "network updating",
            Phase::Recording => "recording",
            Phase::Terminal => "terminal",
        };
        f.write_str(name)
    }
}

/// The outcome of a run.
#[derive(Debug, Clone)]
pub struct EvolutionResult<F: FeatureMap> {
    /// The final, fully evaluated population.
    pub population: Population<F>,
    /// One entry per completed generation.
    pub statistics: Statistics,
    /// The number of generations that ran.
    pub generations: usize,
    /// Whether the problem reported the population complete.
    pub completed: bool,
    fraction: f32,
}

impl<F: FeatureMap> EvolutionResult<F> {
    /// Returns the most relevant individual of the final population.
    pub fn best(&self) -> &Individual<F> {
        self.population.best_individual(self.fraction)
    }
}

/// Owns every component of a run and drives the generation loop.
///
/// Assemble one with [`EvolutionarySystemBuilder`](super::EvolutionarySystemBuilder).
pub struct EvolutionarySystem<F: FeatureMap> {
    options: EvolutionOptions,
    builder: Builder<F>,
    evaluator: Evaluator<F>,
    breeder: Breeder<F>,
    network: Box<dyn EvolutionaryNetwork<F>>,
    phase: Phase,
}

impl<F: FeatureMap> EvolutionarySystem<F> {
    /// Wires the components together, sizing the evaluator and breeder from `options`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `options` do not validate, or a thread pool
    /// error if a phase's workers cannot be spawned.
    pub(crate) fn new(
        options: EvolutionOptions,
        builder: Builder<F>,
        problem: Box<dyn Problem<F>>,
        variation: VariationSource<F>,
        network: Box<dyn EvolutionaryNetwork<F>>,
    ) -> Result<Self> {
        options.validate()?;
        let size = options.get_population_size();
        let seed = options.get_seed();

        let evaluator = Evaluator::from_boxed(
            problem,
            size,
            options.get_evaluator_threads(),
            phase_seed(seed, 1),
        )?;
        let breeder = Breeder::new(
            variation,
            size,
            options.get_breeder_threads(),
            phase_seed(seed, 2),
        )?;

        Ok(Self {
            options,
            builder,
            evaluator,
            breeder,
            network,
            phase: Phase::Idle,
        })
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn network(&self) -> &dyn EvolutionaryNetwork<F> {
        self.network.as_ref()
    }

    fn enter(&mut self, phase: Phase) {
        trace!(from = %self.phase, to = %phase, "phase transition");
        self.phase = phase;
    }

    /// Runs a full session from a freshly built population.
    ///
    /// # Returns
    ///
    /// The final population together with the recorded statistics.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by an initializer, the scoring function, a
    /// variation operator, or the network output. The system is left in the phase that
    /// failed.
    #[instrument(skip(self), name = "run")]
    pub fn run(&mut self) -> Result<EvolutionResult<F>> {
        let fraction = self.options.get_relevance_fraction();
        let (epochs, episodes, generations) = (
            self.options.get_epochs(),
            self.options.get_episodes(),
            self.options.get_generations(),
        );
        info!(
            population_size = self.options.get_population_size(),
            epochs, episodes, generations, "evolution started"
        );

        self.enter(Phase::Initializing);
        let mut population = self.builder.populate(
            self.options.get_population_size(),
            self.options.get_builder_threads(),
            phase_seed(self.options.get_seed(), 0),
        )?;

        let mut statistics = Statistics::new(fraction);
        let mut completed = false;
        let mut generation = 0;

        'epochs: for epoch in 0..epochs {
            info!(epoch, "epoch started");
            for episode in 0..episodes {
                for _ in 0..generations {
                    completed = self.step(&mut population, &mut statistics)?;
                    generation += 1;
                    debug!(
                        epoch,
                        episode,
                        generation,
                        best = last(statistics.best_relevances()),
                        average = last(statistics.average_relevances()),
                        worst = last(statistics.worst_relevances()),
                        "generation recorded"
                    );
                    if completed {
                        break 'epochs;
                    }
                }
            }
        }

        if !completed {
            self.enter(Phase::Evaluating);
            self.evaluator.evaluate_population(&mut population)?;
        }

        self.enter(Phase::Terminal);
        info!(generation, completed, "evolution finished");

        Ok(EvolutionResult {
            population,
            statistics,
            generations: generation,
            completed,
            fraction,
        })
    }

    /// Performs one generation. Returns `true` if the evaluated population is complete,
    /// in which case `population` is left unreplaced.
    fn step(
        &mut self,
        population: &mut Population<F>,
        statistics: &mut Statistics,
    ) -> Result<bool> {
        self.enter(Phase::Evaluating);
        self.evaluator.evaluate_population(population)?;
        self.adjust_relevance(population)?;

        self.enter(Phase::Varying);
        let offspring = self.breeder.vary(population)?;

        self.enter(Phase::NetworkUpdating);
        self.network.update(population.individuals(), &offspring);

        self.enter(Phase::Recording);
        statistics.record(population);

        if self.evaluator.problem().is_complete(population) {
            return Ok(true);
        }

        population.replace(offspring)?;
        Ok(false)
    }

    // Writes `relevance * signal` into every individual for the selection operators.
    fn adjust_relevance(&self, population: &mut Population<F>) -> Result<()> {
        let fraction = self.options.get_relevance_fraction();
        let signals = self.network.output(population.individuals());
        if signals.len() != population.len() {
            return Err(EvolutionError::Configuration(format!(
                "Network produced {} signals for {} individuals",
                signals.len(),
                population.len()
            )));
        }

        for (individual, signal) in population.individuals_mut().iter_mut().zip(signals) {
            if !signal.is_finite() || signal < 0.0 {
                return Err(EvolutionError::InvalidNumericValue(format!(
                    "Network signal must be finite and non-negative, got {}",
                    signal
                )));
            }
            individual.adjust(fraction, signal);
        }

        Ok(())
    }
}
