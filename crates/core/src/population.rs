//! Node states and infectious-contact bookkeeping.

use crate::{ContagionError, InfectedNeighbors};
use fastsir_types::{InfectedDegree, MacroState, Network, Node, NodeState};
use indexmap::IndexSet;
use rand::Rng;
use std::sync::Arc;

/// Compartment of every node plus, for each susceptible node, the multiset
/// of its currently infected neighbors.
///
/// All transitions go through [`infect`](Self::infect),
/// [`recover`](Self::recover) and
/// [`restore_susceptible`](Self::restore_susceptible), which keep three
/// invariants:
///
/// - every node is in exactly one compartment, and the infected and
///   recovered sets match the state vector
/// - for every susceptible node `v`, `infected_neighbors(v)` holds each
///   infected neighbor once per connecting edge
/// - non-susceptible nodes carry an empty neighbor list
///
/// A mean-field population (see [`mean_field`](Self::mean_field)) keeps no
/// contact lists: every neighbor list stays empty.
///
/// Event-rate bookkeeping is left to the [`EventGenerator`](crate::EventGenerator)
/// driving the population.
#[derive(Debug, Clone)]
pub struct Population {
    network: Arc<Network>,
    states: Vec<NodeState>,
    infected: IndexSet<Node>,
    recovered: IndexSet<Node>,
    infected_neighbors: Vec<InfectedNeighbors>,
    tracks_contacts: bool,
}

impl Population {
    /// Everybody susceptible.
    pub fn new(network: Arc<Network>) -> Self {
        let size = network.size();
        Self {
            network,
            states: vec![NodeState::Susceptible; size],
            infected: IndexSet::new(),
            recovered: IndexSet::new(),
            infected_neighbors: vec![InfectedNeighbors::new(); size],
            tracks_contacts: true,
        }
    }

    /// Everybody susceptible, without infected-neighbor bookkeeping. The
    /// network only fixes the node count.
    pub fn mean_field(network: Arc<Network>) -> Self {
        Self {
            tracks_contacts: false,
            ..Self::new(network)
        }
    }

    /// Whether infected-neighbor lists are maintained.
    pub fn tracks_contacts(&self) -> bool {
        self.tracks_contacts
    }

    /// The contact network.
    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Shared handle to the contact network.
    pub fn network_handle(&self) -> Arc<Network> {
        Arc::clone(&self.network)
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.states.len()
    }

    /// Fail with [`ContagionError::UnknownNode`] unless `node` is in the network.
    pub fn check_node(&self, node: Node) -> Result<(), ContagionError> {
        if (node as usize) < self.size() {
            Ok(())
        } else {
            Err(ContagionError::UnknownNode {
                node,
                size: self.size(),
            })
        }
    }

    /// State of `node`. Panics if `node` is outside the network.
    pub fn state(&self, node: Node) -> NodeState {
        self.states[node as usize]
    }

    /// Whether `node` is in the network and susceptible.
    pub fn is_susceptible(&self, node: Node) -> bool {
        self.states.get(node as usize) == Some(&NodeState::Susceptible)
    }

    /// State of every node, indexed by node.
    pub fn states(&self) -> &[NodeState] {
        &self.states
    }

    /// Infected nodes.
    pub fn infected_nodes(&self) -> &IndexSet<Node> {
        &self.infected
    }

    /// Recovered nodes.
    pub fn recovered_nodes(&self) -> &IndexSet<Node> {
        &self.recovered
    }

    pub fn number_of_infected(&self) -> usize {
        self.infected.len()
    }

    pub fn number_of_recovered(&self) -> usize {
        self.recovered.len()
    }

    pub fn number_of_susceptible(&self) -> usize {
        self.size() - self.infected.len() - self.recovered.len()
    }

    /// Infected neighbors of a susceptible node. Empty for other states.
    pub fn infected_neighbors(&self, node: Node) -> &InfectedNeighbors {
        &self.infected_neighbors[node as usize]
    }

    /// Number of infected neighbors of `node`, counting parallel edges.
    /// Always zero in a mean-field population.
    pub fn infected_degree(&self, node: Node) -> InfectedDegree {
        self.infected_neighbors[node as usize].len()
    }

    /// Move `node` from susceptible to infected and register it with every
    /// susceptible neighbor.
    pub fn infect(&mut self, node: Node) -> Result<(), ContagionError> {
        self.check_node(node)?;
        let index = node as usize;
        if self.states[index] != NodeState::Susceptible {
            return Err(ContagionError::NotSusceptible(node));
        }

        self.states[index] = NodeState::Infected;
        self.infected.insert(node);
        self.infected_neighbors[index].clear();
        if !self.tracks_contacts {
            return Ok(());
        }

        for &neighbor in self.network.adjacent_nodes(node) {
            let neighbor = neighbor as usize;
            if self.states[neighbor] == NodeState::Susceptible {
                self.infected_neighbors[neighbor].push(node);
            }
        }
        Ok(())
    }

    /// Move `node` from infected to recovered and withdraw it from every
    /// susceptible neighbor.
    pub fn recover(&mut self, node: Node) -> Result<(), ContagionError> {
        self.check_node(node)?;
        let index = node as usize;
        if self.states[index] != NodeState::Infected {
            return Err(ContagionError::NotInfected(node));
        }

        self.states[index] = NodeState::Recovered;
        self.infected.swap_remove(&node);
        self.recovered.insert(node);
        if !self.tracks_contacts {
            return Ok(());
        }

        for &neighbor in self.network.adjacent_nodes(node) {
            let neighbor = neighbor as usize;
            if self.states[neighbor] == NodeState::Susceptible {
                self.infected_neighbors[neighbor].remove(node);
            }
        }
        Ok(())
    }

    /// Return every recovered node to susceptible and rebuild all
    /// infected-neighbor lists from the infected set.
    pub fn restore_susceptible(&mut self) {
        for &node in &self.recovered {
            self.states[node as usize] = NodeState::Susceptible;
        }
        self.recovered.clear();

        for neighbors in &mut self.infected_neighbors {
            neighbors.clear();
        }
        if !self.tracks_contacts {
            return;
        }
        for &node in &self.infected {
            for &neighbor in self.network.adjacent_nodes(node) {
                if self.states[neighbor as usize] == NodeState::Susceptible {
                    self.infected_neighbors[neighbor as usize].push(node);
                }
            }
        }
    }

    /// Uniformly random infected neighbor of `node`, if it has any.
    pub fn random_infected_neighbor<R: Rng + ?Sized>(
        &self,
        node: Node,
        rng: &mut R,
    ) -> Option<Node> {
        let neighbors = self.infected_neighbors.get(node as usize)?;
        if neighbors.is_empty() {
            return None;
        }
        neighbors.get(rng.gen_range(0..neighbors.len()))
    }

    /// Uniformly random infected node, if any.
    pub fn random_infected<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Node> {
        if self.infected.is_empty() {
            return None;
        }
        self.infected
            .get_index(rng.gen_range(0..self.infected.len()))
            .copied()
    }

    /// Compartment counts stamped with `time`.
    pub fn macro_state(&self, time: f64) -> MacroState {
        MacroState {
            time,
            susceptible: self.number_of_susceptible(),
            infected: self.number_of_infected(),
            recovered: self.number_of_recovered(),
        }
    }
}
