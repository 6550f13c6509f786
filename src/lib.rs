pub mod bitvector;
pub mod error;
pub mod evaluation;
pub mod evolution;
pub mod initialization;
pub mod network;
pub mod representation;
pub mod rng;
pub mod variation;
pub mod worker;

// Re-export commonly used types for convenience
pub use error::{EvolutionError, OptionExt, Result, ResultExt};
pub use evaluation::{Evaluator, Problem};
pub use evolution::{
    EvolutionOptions, EvolutionResult, EvolutionarySystem, EvolutionarySystemBuilder, Phase,
    Statistics,
};
pub use initialization::{Builder, Initializer};
pub use network::{EvolutionaryNetwork, NeutralNetwork, TransitionTable};
pub use representation::{Cost, FeatureMap, Fitness, Individual, Population};
pub use rng::Random;
pub use variation::{Breeder, Breeding, Selection, VariationSource};
pub use worker::Worker;
