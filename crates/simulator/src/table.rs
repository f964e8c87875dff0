//! Per-degree infection tables.

use serde::{Deserialize, Serialize};

/// How the per-degree infection rate (or probability) is derived.
///
/// The table is materialised against the largest degree of the network, so
/// one configuration fits every graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InfectionTable {
    /// Each infected neighbor transmits independently with probability
    /// `transmissibility`: `1 - (1 - q)^k`.
    Independent { transmissibility: f64 },

    /// Rate proportional to the number of infected neighbors: `beta * k`.
    Linear { beta: f64 },

    /// Explicit values indexed by infected degree.
    Explicit { values: Vec<f64> },
}

impl InfectionTable {
    /// Values for infected degrees `0..=max_degree`.
    ///
    /// Explicit tables are returned as given; a lookup beyond their end
    /// surfaces as an error from the model.
    pub fn build(&self, max_degree: usize) -> Vec<f64> {
        match self {
            InfectionTable::Independent { transmissibility } => {
                independent(*transmissibility, max_degree)
            }
            InfectionTable::Linear { beta } => linear(*beta, max_degree),
            InfectionTable::Explicit { values } => values.clone(),
        }
    }
}

impl InfectionTable {
    /// Default for models that read the table as per-tick probabilities.
    pub fn default_probabilities() -> Self {
        InfectionTable::Independent {
            transmissibility: 0.25,
        }
    }
}

/// Default for models that read the table as rates.
impl Default for InfectionTable {
    fn default() -> Self {
        InfectionTable::Linear { beta: 0.25 }
    }
}

/// `1 - (1 - q)^k` for `k` in `0..=max_degree`.
pub fn independent(transmissibility: f64, max_degree: usize) -> Vec<f64> {
    (0..=max_degree)
        .map(|k| 1.0 - (1.0 - transmissibility).powi(k as i32))
        .collect()
}

/// `beta * k` for `k` in `0..=max_degree`.
pub fn linear(beta: f64, max_degree: usize) -> Vec<f64> {
    (0..=max_degree).map(|k| beta * k as f64).collect()
}
