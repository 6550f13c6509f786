//! Breeding operators over feature maps made of independent loci.

use super::Breeding;
use crate::error::{EvolutionError, Result};
use crate::representation::{FeatureMap, Individual};
use crate::rng::Random;
use crate::worker::Worker;

/// A feature map made of loci that can be exchanged and perturbed one at a time.
pub trait LocusMap: FeatureMap {
    /// Returns the number of loci.
    fn loci(&self) -> usize;

    /// Swaps the value at `locus` with the one in `other`.
    fn exchange(&mut self, other: &mut Self, locus: usize);

    /// Replaces the value at `locus` with a random variation of it.
    fn perturb(&mut self, locus: usize, random: &mut Random);
}

fn check_rate(name: &str, rate: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&rate) {
        return Err(EvolutionError::Configuration(format!(
            "{} must lie in [0, 1], got {}",
            name, rate
        )));
    }
    Ok(rate)
}

/// Uniform crossover. Arity 2.
///
/// Parents are paired in order. For each pair every shared locus is exchanged with
/// probability `rate`, and both children are returned. A trailing unpaired parent is
/// returned unchanged.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UniformCrossover {
    rate: f64,
}

impl UniformCrossover {
    /// # Errors
    ///
    /// Returns a configuration error if `rate` lies outside `[0, 1]`.
    pub fn new(rate: f64) -> Result<Self> {
        Ok(Self {
            rate: check_rate("Crossover rate", rate)?,
        })
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl<F: LocusMap> Breeding<F> for UniformCrossover {
    fn expected_sources(&self) -> usize {
        2
    }

    fn breed(
        &self,
        parents: Vec<Individual<F>>,
        worker: &mut Worker,
    ) -> Result<Vec<Individual<F>>> {
        if parents.len() < 2 {
            return Err(EvolutionError::Breeding(format!(
                "Uniform crossover needs at least two parents, got {}",
                parents.len()
            )));
        }

        let mut offspring = Vec::with_capacity(parents.len());
        let mut parents = parents.into_iter();
        while let Some(mut first) = parents.next() {
            let Some(mut second) = parents.next() else {
                offspring.push(first);
                break;
            };

            let loci = first.featuremap().loci().min(second.featuremap().loci());
            for locus in 0..loci {
                if worker.random.chance(self.rate) {
                    first
                        .featuremap_mut()
                        .exchange(second.featuremap_mut(), locus);
                }
            }
            offspring.push(first);
            offspring.push(second);
        }

        Ok(offspring)
    }
}

/// Per-locus mutation. Arity 1.
///
/// Every locus of every parent is perturbed independently with probability `pm`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocusMutation {
    pm: f64,
}

impl LocusMutation {
    /// # Errors
    ///
    /// Returns a configuration error if `pm` lies outside `[0, 1]`.
    pub fn new(pm: f64) -> Result<Self> {
        Ok(Self {
            pm: check_rate("Mutation rate", pm)?,
        })
    }

    pub fn rate(&self) -> f64 {
        self.pm
    }
}

impl<F: LocusMap> Breeding<F> for LocusMutation {
    fn expected_sources(&self) -> usize {
        1
    }

    fn breed(
        &self,
        mut parents: Vec<Individual<F>>,
        worker: &mut Worker,
    ) -> Result<Vec<Individual<F>>> {
        for parent in &mut parents {
            let featuremap = parent.featuremap_mut();
            for locus in 0..featuremap.loci() {
                if worker.random.chance(self.pm) {
                    featuremap.perturb(locus, &mut worker.random);
                }
            }
        }
        Ok(parents)
    }
}
