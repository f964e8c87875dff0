//! Error types for weighted sampling.

use thiserror::Error;

/// Errors raised by a [`WeightedEventSet`](crate::WeightedEventSet).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SamplingError {
    /// Weight bounds do not describe a non-empty positive range.
    #[error("Invalid weight bounds: min {min}, max {max}")]
    InvalidBounds {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },

    /// Weight is not a finite positive number.
    #[error("Weight {0} is not finite and positive")]
    InvalidWeight(f64),

    /// Weight lies outside the bounds the set was built with.
    #[error("Weight {weight} outside bounds [{min}, {max}]")]
    WeightOutOfBounds {
        /// Offending weight.
        weight: f64,
        /// Lower bound of the set.
        min: f64,
        /// Upper bound of the set.
        max: f64,
    },
}
