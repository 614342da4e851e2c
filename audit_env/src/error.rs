//! Error types for the entropy layer.

use thiserror::Error;

/// Errors raised by the deterministic draw primitives.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvError {
    /// More distinct values were requested than the population holds
    #[error("Cannot draw {requested} distinct values from a population of {population}")]
    SampleExceedsPopulation { requested: u64, population: u64 },

    /// A bounded draw was requested from an empty range
    #[error("Cannot draw from an empty population")]
    EmptyPopulation,

    /// Algorithm name did not match any frozen generator
    #[error("Unknown RNG algorithm: {0}")]
    UnknownAlgorithm(String),
}

impl EnvError {
    /// Creates an oversized-sample error.
    pub fn oversized(requested: u64, population: u64) -> Self {
        Self::SampleExceedsPopulation {
            requested,
            population,
        }
    }
}
