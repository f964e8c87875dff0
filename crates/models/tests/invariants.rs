//! Bookkeeping invariants under arbitrary infect/recover sequences and
//! full evolutions.

use fastsir_core::{ContagionError, EventGenerator, Population};
use fastsir_models::{
    annealed_network, annealed_sir, continuous_sir, discrete_sir, AnnealedGenerator, AnnealedSir,
    ContinuousSir, DiscreteGenerator, DiscreteSir, ExactGenerator,
};
use fastsir_simulation::Contagion;
use fastsir_test_helpers::{
    assert_compartments, assert_contagion, assert_event_sets, assert_neighbor_bookkeeping,
    assert_transmission_tree, network, ring,
};
use fastsir_types::{EdgeList, Event, InfectedDegree, Node, NodeState};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_test::traced_test;

/// Ring with chords, a doubled edge and a self-loop.
fn tangled() -> EdgeList {
    let mut edges = ring(30);
    edges.extend([(0, 15), (0, 15), (3, 20), (7, 22), (10, 10)]);
    edges
}

fn table(max_degree: usize, step: f64) -> Vec<f64> {
    (0..=max_degree).map(|k| k as f64 * step).collect()
}

/// Apply random valid and invalid mutations, checking `check` after each.
fn scramble<G, F>(contagion: &mut Contagion<G>, seed: u64, check: F)
where
    G: EventGenerator,
    F: Fn(&Contagion<G>),
{
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let size = contagion.size() as Node;
    for _ in 0..400 {
        let node = rng.gen_range(0..size);
        let state = contagion.state_vector()[node as usize];
        if rng.gen_bool(0.5) {
            let result = contagion.infect(node);
            assert_eq!(result.is_ok(), state == NodeState::Susceptible);
        } else {
            let result = contagion.recover(node);
            assert_eq!(result.is_ok(), state == NodeState::Infected);
        }
        if rng.gen_ratio(1, 50) {
            contagion.clear().unwrap();
        }
        check(contagion);
    }
}

fn check_population(population: &Population) {
    assert_compartments(population);
    assert_neighbor_bookkeeping(population);
}

fn check_exact(sir: &ContinuousSir) {
    let population = sir.population();
    check_population(population);
    let generator = sir.generator();
    assert_event_sets(
        population,
        generator.infection_events(),
        generator.recovery_events(),
        |node| generator.infection_rate()[population.infected_degree(node)],
    );
}

fn check_discrete(sir: &DiscreteSir) {
    let population = sir.population();
    check_population(population);
    let generator = sir.generator();
    assert_event_sets(
        population,
        generator.infection_events(),
        generator.recovery_events(),
        |node| generator.infection_propensity()[population.infected_degree(node)],
    );
}

fn check_annealed(sir: &AnnealedSir) {
    let population = sir.population();
    check_population(population);
    let generator = sir.generator();
    assert_event_sets(
        population,
        generator.infection_events(),
        generator.recovery_events(),
        |_| 1.0,
    );
}

#[test]
fn test_exact_bookkeeping_under_mutation() {
    let mut sir = continuous_sir(&tangled(), 1.0, table(6, 0.7)).unwrap();
    scramble(&mut sir, 1, check_exact);
}

#[test]
fn test_discrete_bookkeeping_under_mutation() {
    let probabilities = (0..=6).map(|k| 1.0 - 0.8f64.powi(k)).collect();
    let mut sir = discrete_sir(&tangled(), 0.3, probabilities).unwrap();
    scramble(&mut sir, 2, check_discrete);
}

#[test]
fn test_annealed_bookkeeping_under_mutation() {
    let mut sir = annealed_sir(40, 3, 1.0, table(3, 1.0)).unwrap();
    scramble(&mut sir, 3, check_annealed);
}

#[test]
fn test_spontaneous_rate_keeps_every_susceptible_eligible() {
    let mut rates = table(6, 1.0);
    rates[0] = 0.25;
    let mut sir = continuous_sir(&tangled(), 1.0, rates).unwrap();
    check_exact(&sir);
    assert_eq!(sir.generator().infection_events().len(), sir.size());
    scramble(&mut sir, 4, check_exact);
}

#[traced_test]
#[test]
fn test_exact_evolution_keeps_invariants() {
    let mut sir = continuous_sir(&tangled(), 1.0, table(6, 1.5)).unwrap();
    sir.seed(17);
    sir.infect_node_set([0, 1]).unwrap();

    let mut previous = sir.current_time();
    for _ in 0..40 {
        sir.evolve(0.25, true, true).unwrap();
        assert_eq!(sir.current_time(), previous + 0.25);
        previous = sir.current_time();
        check_exact(&sir);
        assert_contagion(&sir);
    }
    assert_transmission_tree(sir.transmission_tree());
    check_adjacency(&sir);
}

#[traced_test]
#[test]
fn test_discrete_evolution_keeps_invariants() {
    let probabilities = (0..=6).map(|k| 1.0 - 0.6f64.powi(k)).collect();
    let mut sir = discrete_sir(&tangled(), 0.4, probabilities).unwrap();
    sir.seed(23);
    sir.infect_fraction(0.1).unwrap();

    for _ in 0..15 {
        sir.evolve(1.0, true, true).unwrap();
        check_discrete(&sir);
        assert_contagion(&sir);
    }
    assert_transmission_tree(sir.transmission_tree());
    check_adjacency(&sir);
}

#[traced_test]
#[test]
fn test_reset_restores_fresh_state() {
    let mut sir = continuous_sir(&tangled(), 1.0, table(6, 1.0)).unwrap();
    sir.seed(31);
    sir.infect_fraction(0.2).unwrap();
    sir.evolve(5.0, true, true).unwrap();

    sir.reset().unwrap();
    sir.infect_fraction(0.0).unwrap();

    let fresh = continuous_sir(&tangled(), 1.0, table(6, 1.0)).unwrap();
    assert_eq!(sir.state_vector(), fresh.state_vector());
    assert_eq!(sir.current_time(), 0.0);
    assert!(sir.macro_state_vector().is_empty());
    assert!(sir.transmission_tree().is_empty());
    assert_eq!(sir.generator().infection_events().len(), 0);
    assert_eq!(sir.generator().recovery_events().total_weight(), 0.0);
    check_exact(&sir);
}

/// Every infector was adjacent to its infectee.
fn check_adjacency<G: EventGenerator>(contagion: &Contagion<G>) {
    let network = contagion.network();
    for record in contagion.transmission_tree() {
        assert!(network
            .adjacent_nodes(record.infectee)
            .contains(&record.infector));
    }
}

/// Delegates to the wrapped generator and checks every drawn infector
/// against the population as it stands right before the batch is applied.
struct Watched<G>(G);

impl<G: EventGenerator> EventGenerator for Watched<G> {
    fn name(&self) -> &'static str {
        self.0.name()
    }

    fn tracks_contacts(&self) -> bool {
        self.0.tracks_contacts()
    }

    fn lifetime(&self, population: &Population) -> f64 {
        self.0.lifetime(population)
    }

    fn next_step<R: Rng + ?Sized>(
        &mut self,
        population: &Population,
        rng: &mut R,
    ) -> Result<Vec<Event>, ContagionError> {
        self.0.next_step(population, rng)
    }

    fn infect(&mut self, population: &mut Population, node: Node) -> Result<(), ContagionError> {
        self.0.infect(population, node)
    }

    fn recover(&mut self, population: &mut Population, node: Node) -> Result<(), ContagionError> {
        self.0.recover(population, node)
    }

    fn clear(&mut self, population: &Population) -> Result<(), ContagionError> {
        self.0.clear(population)
    }

    fn choose_infector<R: Rng + ?Sized>(
        &self,
        population: &Population,
        infectee: Node,
        rng: &mut R,
    ) -> Option<(Node, InfectedDegree)> {
        let chosen = self.0.choose_infector(population, infectee, rng);
        assert_eq!(population.state(infectee), NodeState::Susceptible);
        if let Some((infector, infected_degree)) = chosen {
            assert_eq!(
                population.state(infector),
                NodeState::Infected,
                "infector {infector} of {infectee}"
            );
            assert!(infected_degree >= 1);
            if population.tracks_contacts() {
                assert_eq!(infected_degree, population.infected_degree(infectee));
            }
        }
        chosen
    }
}

/// Run `contagion` with transmissions recorded; returns how many were drawn.
fn run_watched<G: EventGenerator>(contagion: &mut Contagion<G>, seeds: &[Node]) -> usize {
    contagion.infect_node_set(seeds.iter().copied()).unwrap();
    contagion.evolve(30.0, true, false).unwrap();
    assert_transmission_tree(contagion.transmission_tree());
    contagion.transmission_tree().len()
}

#[traced_test]
#[test]
fn test_infectors_are_infected_when_drawn() {
    let exact = ExactGenerator::new(1.0, table(6, 1.5)).unwrap();
    let mut sir = Contagion::with_seed(network(&tangled()), Watched(exact), 41).unwrap();
    assert!(run_watched(&mut sir, &[0, 12]) > 0);
    check_adjacency(&sir);

    let probabilities = (0..=6).map(|k| 1.0 - 0.5f64.powi(k)).collect();
    let discrete = DiscreteGenerator::new(0.3, probabilities).unwrap();
    let mut sir = Contagion::with_seed(network(&tangled()), Watched(discrete), 42).unwrap();
    assert!(run_watched(&mut sir, &[0, 12]) > 0);
    check_adjacency(&sir);

    let annealed = AnnealedGenerator::new(3, 1.0, table(3, 2.0)).unwrap();
    let mut sir = Contagion::with_seed(annealed_network(200), Watched(annealed), 43).unwrap();
    assert!(run_watched(&mut sir, &[0, 1, 2, 3, 4]) > 0);
}
