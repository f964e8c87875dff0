//! Node states and the events that move nodes between them.

use crate::Node;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compartment a node currently belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NodeState {
    /// Can be infected by an infected neighbor.
    #[default]
    Susceptible,
    /// Infectious until it recovers.
    Infected,
    /// Removed from the process for good (until a clear).
    Recovered,
}

impl NodeState {
    /// Single-letter label used in logs and reports.
    pub fn letter(self) -> char {
        match self {
            NodeState::Susceptible => 'S',
            NodeState::Infected => 'I',
            NodeState::Recovered => 'R',
        }
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// What happens to a node in an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Infected node becomes recovered.
    Recover,
    /// Susceptible node becomes infected.
    Infect,
}

/// The atomic unit applied to advance a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Event {
    /// Node the event applies to.
    pub node: Node,
    /// Transition applied to the node.
    pub action: Action,
}

impl Event {
    /// Infection of `node`.
    pub fn infect(node: Node) -> Self {
        Self {
            node,
            action: Action::Infect,
        }
    }

    /// Recovery of `node`.
    pub fn recover(node: Node) -> Self {
        Self {
            node,
            action: Action::Recover,
        }
    }

    /// Whether this is an infection event.
    pub fn is_infection(&self) -> bool {
        self.action == Action::Infect
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action {
            Action::Infect => write!(f, "Infect({})", self.node),
            Action::Recover => write!(f, "Recover({})", self.node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_susceptible() {
        assert_eq!(NodeState::default(), NodeState::Susceptible);
    }

    #[test]
    fn test_event_constructors() {
        let infection = Event::infect(4);
        assert!(infection.is_infection());
        assert_eq!(infection.to_string(), "Infect(4)");

        let recovery = Event::recover(2);
        assert!(!recovery.is_infection());
        assert_eq!(recovery.to_string(), "Recover(2)");
    }
}
