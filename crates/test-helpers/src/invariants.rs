//! Invariant checkers for populations, event sets and recorded histories.

use fastsir_core::{EventGenerator, Population};
use fastsir_sampling::WeightedEventSet;
use fastsir_simulation::Contagion;
use fastsir_types::{Generation, Node, NodeState, Transmission};
use std::collections::HashMap;

/// Every node is in exactly one compartment and the member sets agree with
/// the state vector.
pub fn assert_compartments(population: &Population) {
    let states = population.states();
    let count = |wanted: NodeState| states.iter().filter(|state| **state == wanted).count();

    assert_eq!(count(NodeState::Infected), population.number_of_infected());
    assert_eq!(count(NodeState::Recovered), population.number_of_recovered());
    assert_eq!(count(NodeState::Susceptible), population.number_of_susceptible());
    assert_eq!(
        population.number_of_susceptible()
            + population.number_of_infected()
            + population.number_of_recovered(),
        population.size()
    );

    for &node in population.infected_nodes() {
        assert_eq!(population.state(node), NodeState::Infected, "node {node}");
    }
    for &node in population.recovered_nodes() {
        assert_eq!(population.state(node), NodeState::Recovered, "node {node}");
    }
}

/// For every susceptible node, its recorded infected neighbors are exactly
/// its infected adjacent nodes, counted with edge multiplicity. Mean-field
/// populations must keep every list empty.
pub fn assert_neighbor_bookkeeping(population: &Population) {
    let network = population.network();
    if !population.tracks_contacts() {
        for node in network.nodes() {
            assert!(
                population.infected_neighbors(node).is_empty(),
                "mean-field node {node} has infected neighbors"
            );
        }
        return;
    }
    for node in network.nodes() {
        let mut recorded = population.infected_neighbors(node).as_slice().to_vec();
        recorded.sort_unstable();

        if population.state(node) != NodeState::Susceptible {
            assert!(recorded.is_empty(), "non-susceptible node {node} has infected neighbors");
            continue;
        }

        let mut expected: Vec<Node> = network
            .adjacent_nodes(node)
            .iter()
            .copied()
            .filter(|&neighbor| population.state(neighbor) == NodeState::Infected)
            .collect();
        expected.sort_unstable();
        assert_eq!(recorded, expected, "infected neighbors of node {node}");
    }
}

/// The recovery set holds exactly the infected nodes; the infection set
/// holds exactly the susceptible nodes with positive `expected_weight`, at
/// that weight.
pub fn assert_event_sets<F>(
    population: &Population,
    infection_events: &WeightedEventSet<Node>,
    recovery_events: &WeightedEventSet<Node>,
    expected_weight: F,
) where
    F: Fn(Node) -> f64,
{
    assert_eq!(recovery_events.len(), population.number_of_infected());
    for &node in population.infected_nodes() {
        assert!(recovery_events.contains(&node), "infected node {node} cannot recover");
    }

    let mut members = 0;
    for node in population.network().nodes() {
        let expected = if population.state(node) == NodeState::Susceptible {
            expected_weight(node)
        } else {
            0.0
        };
        match infection_events.weight(&node) {
            Some(weight) => {
                members += 1;
                assert!(
                    (weight - expected).abs() <= 1e-9 * expected.max(1.0),
                    "node {node} has weight {weight}, expected {expected}"
                );
            }
            None => assert!(expected <= 0.0, "node {node} missing with weight {expected}"),
        }
    }
    assert_eq!(members, infection_events.len());
}

/// The transmission records form a forest rooted at seeds.
///
/// Times never decrease, every node is infected at most once, and each
/// infector's generation is the one it received when it was infected (zero
/// for nodes never listed as infectee). Assumes transmissions were recorded
/// for the whole history.
pub fn assert_transmission_tree(tree: &[Transmission]) {
    let mut generations: HashMap<Node, Generation> = HashMap::new();
    let mut last_time = f64::NEG_INFINITY;

    for record in tree {
        assert!(record.time >= last_time, "transmission times go backwards");
        last_time = record.time;

        assert_ne!(record.infector, record.infectee, "self-transmission");
        let infector_generation = generations
            .get(&record.infector)
            .copied()
            .unwrap_or(Generation::SEED);
        assert_eq!(
            record.generation, infector_generation,
            "generation of infector {}",
            record.infector
        );
        assert!(record.infected_degree >= 1, "infectee without infected neighbors");

        let previous = generations.insert(record.infectee, record.infectee_generation());
        assert!(previous.is_none(), "node {} infected twice", record.infectee);
    }
}

/// Compartments, neighbor bookkeeping, clock and history of an engine.
pub fn assert_contagion<G: EventGenerator>(contagion: &Contagion<G>) {
    let population = contagion.population();
    assert_compartments(population);
    assert_neighbor_bookkeeping(population);

    assert!(contagion.last_event_time() <= contagion.current_time());
    let history = contagion.macro_state_vector();
    for pair in history.windows(2) {
        assert!(pair[0].time <= pair[1].time, "macro-state times go backwards");
    }
    for state in history {
        assert_eq!(state.total(), contagion.size());
    }
}
