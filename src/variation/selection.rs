//! Selection operators. Each one reads the adjusted relevance the system assigns to
//! every individual before the variation phase.

use super::Selection;
use crate::error::{EvolutionError, OptionExt, Result};
use crate::representation::{FeatureMap, Individual};
use crate::worker::Worker;

/// Fitness proportionate (roulette wheel) selection.
///
/// Individual `i` is chosen with probability `adjusted_relevance(i) / sum(adjusted
/// relevance)`. When every weight is zero the choice is uniform.
///
/// # Examples
///
/// ```
/// use ratatoskr::representation::Individual;
/// use ratatoskr::rng::Random;
/// use ratatoskr::variation::{FitnessProportionateSelection, Selection};
/// use ratatoskr::worker::Worker;
///
/// let mut parents: Vec<Individual<u8>> = (0..3).map(Individual::new).collect();
/// parents[1].adjust(0.0, 1.0);
///
/// let mut worker = Worker::new(0, 3, Random::from_seed(42));
/// let chosen = FitnessProportionateSelection::new().select(&parents, &mut worker).unwrap();
/// assert_eq!(*chosen.featuremap(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessProportionateSelection;

impl FitnessProportionateSelection {
    pub fn new() -> Self {
        Self
    }
}

impl<F: FeatureMap> Selection<F> for FitnessProportionateSelection {
    fn select<'a>(
        &self,
        parents: &'a [Individual<F>],
        worker: &mut Worker,
    ) -> Result<&'a Individual<F>> {
        if parents.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        let relevances: Vec<f32> = parents.iter().map(Individual::adjusted_relevance).collect();
        let index = worker.random.sample_weighted_index(&relevances)?;
        Ok(&parents[index])
    }
}

/// Tournament selection over adjusted relevance.
///
/// Draws `size` contestants uniformly with replacement and returns the most relevant
/// one. Larger tournaments mean stronger selection pressure.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentSelection {
    size: usize,
}

impl TournamentSelection {
    /// Creates a tournament of `size` contestants.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(EvolutionError::Configuration(
                "Tournament size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self { size: 2 }
    }
}

impl<F: FeatureMap> Selection<F> for TournamentSelection {
    fn select<'a>(
        &self,
        parents: &'a [Individual<F>],
        worker: &mut Worker,
    ) -> Result<&'a Individual<F>> {
        if parents.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        let mut winner = &parents[worker.random.sample_uniform_index(parents.len())?];
        for _ in 1..self.size {
            let contestant = &parents[worker.random.sample_uniform_index(parents.len())?];
            if contestant.adjusted_relevance() > winner.adjusted_relevance() {
                winner = contestant;
            }
        }
        Ok(winner)
    }
}

/// Always selects the first parent. Deterministic, which makes it handy in tests.
#[derive(Debug, Clone, Default)]
pub struct FirstSelection;

impl<F: FeatureMap> Selection<F> for FirstSelection {
    fn select<'a>(
        &self,
        parents: &'a [Individual<F>],
        _: &mut Worker,
    ) -> Result<&'a Individual<F>> {
        parents
            .first()
            .ok_or_else_evolution(|| EvolutionError::EmptyPopulation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Random;

    fn parents(relevances: &[f32]) -> Vec<Individual<usize>> {
        relevances
            .iter()
            .enumerate()
            .map(|(index, &relevance)| {
                let mut individual = Individual::new(index);
                // cost and fitness of zero give a relevance of exactly one
                individual.adjust(0.5, relevance);
                individual
            })
            .collect()
    }

    #[test]
    fn test_fitness_proportionate_distribution() {
        let parents = parents(&[2.0, 5.0, 0.0]);
        let mut worker = Worker::new(0, 3, Random::from_seed(7));
        let selection = FitnessProportionateSelection::new();

        let samples = 35_000;
        let mut counts = [0usize; 3];
        for _ in 0..samples {
            counts[*selection.select(&parents, &mut worker).unwrap().featuremap()] += 1;
        }

        assert_eq!(counts[2], 0);
        let share = counts[1] as f64 / samples as f64;
        assert!((share - 5.0 / 7.0).abs() < 0.015, "index 1 share {}", share);
    }

    #[test]
    fn test_fitness_proportionate_empty() {
        let mut worker = Worker::new(0, 0, Random::from_seed(7));
        let empty = parents(&[]);
        let result = FitnessProportionateSelection::new().select(&empty, &mut worker);
        assert!(matches!(result, Err(EvolutionError::EmptyPopulation)));
    }

    #[test]
    fn test_tournament_prefers_relevant() {
        let parents = parents(&[0.1, 0.2, 0.9, 0.3]);
        let mut worker = Worker::new(0, 4, Random::from_seed(11));

        // A tournament much larger than the population almost surely contains the best
        let selection = TournamentSelection::new(64).unwrap();
        for _ in 0..20 {
            assert_eq!(*selection.select(&parents, &mut worker).unwrap().featuremap(), 2);
        }
    }

    #[test]
    fn test_tournament_size_zero_rejected() {
        assert!(TournamentSelection::new(0).is_err());
        assert_eq!(TournamentSelection::default().size(), 2);
    }

    #[test]
    fn test_first_selection() {
        let empty = parents(&[]);
        let parents = parents(&[0.1, 0.2]);
        let mut worker = Worker::new(0, 2, Random::from_seed(1));
        assert_eq!(*FirstSelection.select(&parents, &mut worker).unwrap().featuremap(), 0);

        assert!(matches!(
            FirstSelection.select(&empty, &mut worker),
            Err(EvolutionError::EmptyPopulation)
        ));
    }
}
