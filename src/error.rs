//! # Error Types
//!
//! This module defines the error type shared by every phase of an evolutionary run.
//! All failures are fail-fast: configuration problems are reported before a run
//! starts, and callback failures abort the run once the current phase has joined.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use ratatoskr::error::{EvolutionError, Result};
//!
//! fn check_size(population_size: usize) -> Result<()> {
//!     if population_size == 0 {
//!         return Err(EvolutionError::Configuration(
//!             "Population size cannot be zero".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_size(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use ratatoskr::error::{EvolutionError, OptionExt};
//!
//! fn first_weight(weights: &[f32]) -> ratatoskr::error::Result<f32> {
//!     weights.first().copied().ok_or_else_evolution(|| EvolutionError::EmptyPopulation)
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while assembling or running an evolutionary system.
#[derive(Error, Debug)]
pub enum EvolutionError {
    /// An invalid configuration was provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A variation operator was wired to the wrong number of upstream sources.
    #[error("Arity mismatch: {operator} expects {expected} source(s) but {actual} were connected")]
    ArityMismatch {
        operator: String,
        expected: usize,
        actual: usize,
    },

    /// An operation required at least one individual.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// Discrete sampling received weights it cannot draw from.
    #[error("Sampling error: {0}")]
    Sampling(String),

    /// A builder's initializer failed.
    #[error("Initialization error: {0}")]
    Initialization(String),

    /// A problem-supplied evaluation function failed.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// A breeding operator failed.
    #[error("Breeding error: {0}")]
    Breeding(String),

    /// NaN or infinite values were encountered.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// A phase's worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl From<rayon::ThreadPoolBuildError> for EvolutionError {
    fn from(error: rayon::ThreadPoolBuildError) -> Self {
        EvolutionError::ThreadPool(error.to_string())
    }
}

/// A specialized Result type for evolutionary operations.
pub type Result<T> = std::result::Result<T, EvolutionError>;

/// Extension trait for Result to add context to errors.
///
/// ```rust
/// use ratatoskr::error::ResultExt;
///
/// fn parse_threads(raw: &str) -> ratatoskr::error::Result<usize> {
///     raw.parse::<usize>().context("Failed to parse thread count")
/// }
///
/// assert!(parse_threads("four").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to an `EvolutionError` carrying the provided context.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| EvolutionError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T>` using a closure to generate the error.
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_evolution<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> EvolutionError,
    {
        self.ok_or_else(err_fn)
    }
}
