//! # BitVector
//!
//! A fixed-length vector of bits usable as a feature map, together with the
//! [`RandomBits`] initializer that draws every bit independently.
//!
//! ## Example
//!
//! ```rust
//! use ratatoskr::bitvector::{BitVector, RandomBits};
//! use ratatoskr::initialization::Builder;
//! use ratatoskr::representation::Individual;
//!
//! let builder = Builder::new(Individual::new(BitVector::zeros(32)), RandomBits::default());
//! let population = builder.populate(10, 2, Some(3)).unwrap();
//! assert!(population.iter().all(|i| i.featuremap().len() == 32));
//! ```

use crate::error::{EvolutionError, Result};
use crate::initialization::Initializer;
use crate::representation::Individual;
use crate::rng::Random;
use crate::variation::LocusMap;
use crate::worker::Worker;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BitVector {
    bits: Vec<bool>,
}

impl BitVector {
    /// Creates a vector of `len` cleared bits.
    pub fn zeros(len: usize) -> Self {
        Self {
            bits: vec![false; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    /// Sets the bit at `index`. Out-of-range indices are ignored.
    pub fn set(&mut self, index: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = value;
        }
    }

    /// Inverts the bit at `index`. Out-of-range indices are ignored.
    pub fn flip(&mut self, index: usize) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = !*bit;
        }
    }

    /// Returns the number of set bits.
    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }
}

impl From<Vec<bool>> for BitVector {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl LocusMap for BitVector {
    fn loci(&self) -> usize {
        self.bits.len()
    }

    fn exchange(&mut self, other: &mut Self, locus: usize) {
        if let (Some(mine), Some(theirs)) = (self.bits.get_mut(locus), other.bits.get_mut(locus)) {
            std::mem::swap(mine, theirs);
        }
    }

    fn perturb(&mut self, locus: usize, _random: &mut Random) {
        self.flip(locus);
    }
}

/// Initializes every bit of a bit vector to one with probability `probability`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RandomBits {
    probability: f64,
}

impl RandomBits {
    /// # Errors
    ///
    /// Returns a configuration error if `probability` lies outside `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(EvolutionError::Configuration(format!(
                "Bit probability must lie in [0, 1], got {}",
                probability
            )));
        }
        Ok(Self { probability })
    }
}

impl Default for RandomBits {
    fn default() -> Self {
        Self { probability: 0.5 }
    }
}

impl Initializer<BitVector> for RandomBits {
    fn initialize(
        &self,
        individual: &mut Individual<BitVector>,
        worker: &mut Worker,
    ) -> Result<()> {
        for bit in &mut individual.featuremap_mut().bits {
            *bit = worker.random.chance(self.probability);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_and_ones() {
        let mut bits = BitVector::zeros(5);
        bits.flip(1);
        bits.flip(3);
        bits.flip(99);
        assert_eq!(bits.ones(), 2);
        assert_eq!(bits.get(1), Some(true));
        assert_eq!(bits.get(99), None);
    }

    #[test]
    fn test_exchange() {
        let mut first = BitVector::from(vec![true, true]);
        let mut second = BitVector::from(vec![false, false, false]);
        first.exchange(&mut second, 1);
        first.exchange(&mut second, 2);
        assert_eq!(first.as_slice(), &[true, false]);
        assert_eq!(second.as_slice(), &[false, true, false]);
    }

    #[test]
    fn test_random_bits() {
        let mut worker = Worker::new(0, 1, Random::from_seed(2));
        let mut individual = Individual::new(BitVector::zeros(4000));

        RandomBits::new(1.0).unwrap().initialize(&mut individual, &mut worker).unwrap();
        assert_eq!(individual.featuremap().ones(), 4000);

        RandomBits::default().initialize(&mut individual, &mut worker).unwrap();
        let ones = individual.featuremap().ones();
        assert!((1800..2200).contains(&ones), "ones {}", ones);

        assert!(RandomBits::new(2.0).is_err());
    }
}
