//! Error types shared across the generation pipeline.

use crate::core::graph::StoreError;
use crate::export::csv::WriteError;
use thiserror::Error;

/// Rejected generation input. Raised before any work begins.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidArgument {
    #[error("entity count must be positive")]
    ZeroEntities,
    #[error("edge count must be positive")]
    ZeroEdges,
    #[error("entity count {entities} is not a power of two")]
    EntitiesNotPowerOfTwo { entities: u64 },
    #[error("entity count {entities} exceeds the maximum of {max}")]
    TooManyEntities { entities: u64, max: u64 },
    #[error("expected 4 quadrant probabilities, got {count}")]
    ProbabilityCount { count: usize },
    #[error("quadrant probability #{index} is {value}; must be finite and non-negative")]
    InvalidProbability { index: usize, value: f64 },
    #[error("quadrant probabilities sum to {sum}, expected 1")]
    ProbabilitySum { sum: f64 },
}

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),
    #[error("store operation failed: {0}")]
    Store(#[from] StoreError),
    #[error("output write failed: {0}")]
    Output(#[from] WriteError),
}
