//! Append-only records produced while a process evolves.

use crate::{Generation, InfectedDegree, Node};
use serde::{Deserialize, Serialize};

/// Aggregate compartment counts at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroState {
    /// Simulated time of the snapshot.
    pub time: f64,
    /// Number of susceptible nodes.
    pub susceptible: usize,
    /// Number of infected nodes.
    pub infected: usize,
    /// Number of recovered nodes.
    pub recovered: usize,
}

impl MacroState {
    /// Total number of nodes covered by the snapshot.
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }

    /// Fraction of nodes currently infected.
    pub fn prevalence(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => self.infected as f64 / n as f64,
        }
    }

    /// Fraction of nodes ever infected (infected or recovered).
    pub fn attack_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            n => (self.infected + self.recovered) as f64 / n as f64,
        }
    }
}

/// One edge of the transmission forest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transmission {
    /// Time of the infection.
    pub time: f64,
    /// Generation of the infector.
    pub generation: Generation,
    /// Node that transmitted.
    pub infector: Node,
    /// Node that got infected.
    pub infectee: Node,
    /// Infected degree of the infectee at the moment of infection.
    pub infected_degree: InfectedDegree,
}

impl Transmission {
    /// Generation assigned to the infectee.
    pub fn infectee_generation(&self) -> Generation {
        self.generation.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macro_state_fractions() {
        let state = MacroState {
            time: 2.5,
            susceptible: 6,
            infected: 3,
            recovered: 1,
        };
        assert_eq!(state.total(), 10);
        assert!((state.prevalence() - 0.3).abs() < 1e-12);
        assert!((state.attack_rate() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_macro_state_has_zero_prevalence() {
        let state = MacroState {
            time: 0.0,
            susceptible: 0,
            infected: 0,
            recovered: 0,
        };
        assert_eq!(state.prevalence(), 0.0);
        assert_eq!(state.attack_rate(), 0.0);
    }

    #[test]
    fn test_infectee_generation() {
        let transmission = Transmission {
            time: 1.0,
            generation: Generation::SEED,
            infector: 0,
            infectee: 1,
            infected_degree: 1,
        };
        assert_eq!(transmission.infectee_generation(), Generation(1));
    }
}
