//! Domain-specific identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier.
///
/// Nodes are the dense range `[0, N)` of a [`Network`](crate::Network), so
/// a plain integer doubles as an index into every per-node vector.
pub type Node = u32;

/// Number of currently infected neighbors of a node.
pub type InfectedDegree = usize;

/// Transmission generation.
///
/// Seed infections are generation 0; every transmission adds one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(pub u32);

impl Generation {
    /// Generation of seed infections.
    pub const SEED: Self = Generation(0);

    /// Generation of a node infected by a member of this generation.
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Generation({})", self.0)
    }
}
