//! # Variation
//!
//! Offspring are produced by a variation tree. Its leaves are [`Selection`] operators
//! that pick one individual out of the current population; its internal nodes are
//! [`Breeding`] operators that recombine or perturb the individuals produced by their
//! upstream sources. Trees are assembled bottom-up with [`VariationSource::selection`]
//! and [`VariationSource::breeding`]; the latter rejects a wrong number of sources, so
//! arity is checked once at assembly time and never per call.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::bitvector::BitVector;
//! use ratatoskr::error::EvolutionError;
//! use ratatoskr::variation::{
//!     FitnessProportionateSelection, LocusMutation, UniformCrossover, VariationSource,
//! };
//!
//! let select = || VariationSource::<BitVector>::selection(FitnessProportionateSelection::new());
//!
//! // A crossover wired to a single source is rejected
//! let crossover = UniformCrossover::new(0.5).unwrap();
//! let result = VariationSource::breeding(crossover, vec![select()]);
//! assert!(matches!(result, Err(EvolutionError::ArityMismatch { expected: 2, actual: 1, .. })));
//!
//! let crossover = UniformCrossover::new(0.5).unwrap();
//! let crossover = VariationSource::breeding(crossover, vec![select(), select()]).unwrap();
//! let mutation = LocusMutation::new(0.01).unwrap();
//! let tree = VariationSource::breeding(mutation, vec![crossover]).unwrap();
//! assert_eq!(tree.expected_sources(), 1);
//! ```
pub mod breeder;
pub mod breeding;
pub mod selection;

use std::fmt::Debug;

use crate::error::{EvolutionError, Result};
use crate::representation::{FeatureMap, Individual};
use crate::worker::Worker;

pub use breeder::Breeder;
pub use breeding::{LocusMap, LocusMutation, UniformCrossover};
pub use selection::{FirstSelection, FitnessProportionateSelection, TournamentSelection};

/// A leaf operator that picks one parent out of the current population.
pub trait Selection<F: FeatureMap>: Debug + Send + Sync {
    /// Returns a reference to the chosen individual. The tree clones it.
    ///
    /// # Errors
    ///
    /// Returns `EmptyPopulation` if `parents` is empty, or a sampling error.
    fn select<'a>(
        &self,
        parents: &'a [Individual<F>],
        worker: &mut Worker,
    ) -> Result<&'a Individual<F>>;
}

/// An internal operator that turns the output of its sources into offspring.
pub trait Breeding<F: FeatureMap>: Debug + Send + Sync {
    /// The number of upstream sources this operator must be connected to. At least one.
    fn expected_sources(&self) -> usize;

    /// Produces one or more offspring from the concatenated output of the sources.
    fn breed(&self, parents: Vec<Individual<F>>, worker: &mut Worker) -> Result<Vec<Individual<F>>>;
}

#[derive(Debug)]
enum Node<F: FeatureMap> {
    Selection(Box<dyn Selection<F>>),
    Breeding {
        operator: Box<dyn Breeding<F>>,
        sources: Vec<VariationSource<F>>,
    },
}

/// A node of a variation tree. Owns its upstream sources.
#[derive(Debug)]
pub struct VariationSource<F: FeatureMap> {
    node: Node<F>,
}

impl<F: FeatureMap> VariationSource<F> {
    /// Creates a leaf around a selection operator.
    pub fn selection<S>(operator: S) -> Self
    where
        S: Selection<F> + 'static,
    {
        Self {
            node: Node::Selection(Box::new(operator)),
        }
    }

    /// Creates an internal node that feeds the output of `sources` into `operator`.
    ///
    /// # Errors
    ///
    /// Returns `ArityMismatch` if the number of sources differs from the operator's
    /// declared arity, and a configuration error if that arity is zero.
    pub fn breeding<B>(operator: B, sources: Vec<VariationSource<F>>) -> Result<Self>
    where
        B: Breeding<F> + 'static,
    {
        let expected = operator.expected_sources();
        if expected == 0 {
            return Err(EvolutionError::Configuration(format!(
                "{:?} declares no sources; breeding operators need at least one",
                operator
            )));
        }
        if sources.len() != expected {
            return Err(EvolutionError::ArityMismatch {
                operator: format!("{:?}", operator),
                expected,
                actual: sources.len(),
            });
        }

        Ok(Self {
            node: Node::Breeding {
                operator: Box::new(operator),
                sources,
            },
        })
    }

    /// Returns the node's arity: zero for selection, the operator's arity for breeding.
    pub fn expected_sources(&self) -> usize {
        match &self.node {
            Node::Selection(_) => 0,
            Node::Breeding { sources, .. } => sources.len(),
        }
    }

    /// Returns the node's upstream sources.
    pub fn sources(&self) -> &[VariationSource<F>] {
        match &self.node {
            Node::Selection(_) => &[],
            Node::Breeding { sources, .. } => sources,
        }
    }

    /// Returns `true` if the node is a selection leaf.
    pub fn is_selection(&self) -> bool {
        matches!(self.node, Node::Selection(_))
    }

    /// Runs the subtree rooted at this node once.
    ///
    /// A selection leaf yields one clone of the chosen individual, tagged with the
    /// chosen slot as its lineage. A breeding node runs each source in order,
    /// concatenates their output, breeds it, and marks every offspring unevaluated.
    /// `population` is only read.
    ///
    /// # Errors
    ///
    /// Propagates operator errors, and returns a breeding error if a breeding operator
    /// produces no offspring.
    pub fn perform(
        &self,
        population: &[Individual<F>],
        worker: &mut Worker,
    ) -> Result<Vec<Individual<F>>> {
        match &self.node {
            Node::Selection(operator) => {
                let chosen = operator.select(population, worker)?;
                let mut child = chosen.clone();
                let slot = population.iter().position(|parent| std::ptr::eq(parent, chosen));
                child.set_lineage(slot);
                Ok(vec![child])
            }
            Node::Breeding { operator, sources } => {
                let mut parents = Vec::new();
                for source in sources {
                    parents.extend(source.perform(population, worker)?);
                }

                let mut offspring = operator.breed(parents, worker)?;
                if offspring.is_empty() {
                    return Err(EvolutionError::Breeding(format!(
                        "{:?} produced no offspring",
                        operator
                    )));
                }
                offspring.iter_mut().for_each(Individual::reset);
                Ok(offspring)
            }
        }
    }
}

impl<F: LocusMap> VariationSource<F> {
    /// Builds the default tree: mutation of a uniform crossover between two fitness
    /// proportionate selections.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either rate lies outside `[0, 1]`.
    pub fn default_tree(mutation_rate: f64, crossover_rate: f64) -> Result<Self> {
        let crossover = Self::breeding(
            UniformCrossover::new(crossover_rate)?,
            vec![
                Self::selection(FitnessProportionateSelection::new()),
                Self::selection(FitnessProportionateSelection::new()),
            ],
        )?;
        Self::breeding(LocusMutation::new(mutation_rate)?, vec![crossover])
    }
}
