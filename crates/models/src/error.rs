//! Error types for model construction.

use fastsir_core::ContagionError;
use fastsir_sampling::SamplingError;
use thiserror::Error;

/// Errors raised while building a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Recovery rate {0} is not finite and non-negative")]
    InvalidRecoveryRate(f64),

    #[error("Recovery probability {0} outside [0, 1]")]
    InvalidRecoveryProbability(f64),

    #[error("Infection rate {rate} at infected degree {degree} is not finite and non-negative")]
    InvalidInfectionRate { degree: usize, rate: f64 },

    #[error("Infection probability {probability} at infected degree {degree} outside [0, 1)")]
    InvalidInfectionProbability { degree: usize, probability: f64 },

    /// The annealed model needs one rate per possible infected degree.
    #[error("Rate table of length {len} too short for degree {degree}")]
    TableTooShort { len: usize, degree: usize },

    #[error(transparent)]
    Contagion(#[from] ContagionError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),
}
