pub mod builder;
pub mod options;
pub mod statistics;
pub mod system;

pub use builder::EvolutionarySystemBuilder;
pub use options::{EvolutionOptions, EvolutionOptionsBuilder};
pub use statistics::Statistics;
pub use system::{EvolutionResult, EvolutionarySystem, Phase};
