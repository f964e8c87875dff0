//! Error types for contagion bookkeeping.

use fastsir_sampling::SamplingError;
use fastsir_types::{InfectedDegree, Node};
use thiserror::Error;

/// Errors raised while mutating or stepping a contagion process.
///
/// Every variant except [`Sampling`](Self::Sampling) is a contract
/// violation by the caller: the operation is aborted and never retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContagionError {
    /// Infection requested for a node that is not susceptible.
    #[error("Infection attempt: node {0} is not susceptible")]
    NotSusceptible(Node),

    /// Recovery requested for a node that is not infected.
    #[error("Recovery attempt: node {0} is not infected")]
    NotInfected(Node),

    /// Node label outside the network.
    #[error("Node {node} outside network of {size} nodes")]
    UnknownNode {
        /// Offending node.
        node: Node,
        /// Number of nodes in the network.
        size: usize,
    },

    /// Infected degree has no entry in the rate table.
    #[error("Infected degree {degree} outside rate table of length {len}")]
    DegreeOutOfRange {
        /// Infected degree looked up.
        degree: InfectedDegree,
        /// Length of the rate table.
        len: usize,
    },

    /// Fraction of nodes outside `[0, 1]`.
    #[error("Fraction {0} outside [0, 1]")]
    InvalidFraction(f64),

    /// Requested more seed infections than there are susceptible nodes.
    #[error("Cannot infect {requested} nodes with only {available} susceptible")]
    NotEnoughSusceptible {
        /// Number of infections requested.
        requested: usize,
        /// Number of susceptible nodes available.
        available: usize,
    },

    /// Evolution period is negative or not finite.
    #[error("Invalid evolution period {0}")]
    InvalidPeriod(f64),

    /// A sampling distribution rejected its parameter.
    #[error("Invalid {name} {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// A step was requested while no event is possible.
    #[error("No event possible: the process is exhausted")]
    Exhausted,

    /// Weighted event set rejected an update.
    #[error(transparent)]
    Sampling(#[from] SamplingError),
}
