//! # Representation
//!
//! The data model of an evolutionary run: the [`FeatureMap`] capability supplied by the
//! problem domain, the [`Cost`] and [`Fitness`] scores written by the evaluator, the
//! [`Individual`] that owns all three, and the fixed-size [`Population`].
pub mod individual;
pub mod population;

use std::fmt::Debug;

pub use individual::{Cost, Fitness, Individual};
pub use population::Population;

/// The feature representation of a candidate solution.
///
/// A feature map is owned outright by its individual and deep-copied whenever the
/// individual is cloned, so no two individuals ever share one. Any `Clone + Debug +
/// Send + Sync` type qualifies.
pub trait FeatureMap: Clone + Debug + Send + Sync {}

impl<T> FeatureMap for T where T: Clone + Debug + Send + Sync {}
