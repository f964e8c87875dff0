//! Base contagion engine.

use fastsir_core::{ContagionError, EventGenerator, Population};
use fastsir_types::{
    Action, Event, Generation, InfectedDegree, MacroState, Network, Node, NodeState, Transmission,
};
use indexmap::IndexSet;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Counters accumulated over the lifetime of an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContagionStats {
    /// Batches produced by the event generator.
    pub steps: u64,
    /// Infections applied, seeds included.
    pub infections: u64,
    /// Recoveries applied.
    pub recoveries: u64,
}

/// SIR process on a fixed network, driven by an [`EventGenerator`].
///
/// Owns the population, the clock, the recorded histories and a seeded
/// generator. The network is shared read-only, so independent engines can run
/// on separate threads over the same [`Arc<Network>`].
pub struct Contagion<G> {
    population: Population,
    generator: G,
    rng: ChaCha8Rng,

    /// Generation of every node infected since the last clear.
    generations: HashMap<Node, Generation>,
    macro_states: Vec<MacroState>,
    transmissions: Vec<Transmission>,

    current_time: f64,
    last_event_time: f64,
    stats: ContagionStats,
}

impl<G: EventGenerator> Contagion<G> {
    /// Create an engine with every node susceptible, seeded from entropy.
    pub fn new(network: Arc<Network>, generator: G) -> Result<Self, ContagionError> {
        Self::build(network, generator, ChaCha8Rng::from_entropy())
    }

    /// Create an engine with every node susceptible and a fixed seed.
    pub fn with_seed(
        network: Arc<Network>,
        generator: G,
        seed: u64,
    ) -> Result<Self, ContagionError> {
        Self::build(network, generator, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(network: Arc<Network>, mut generator: G, rng: ChaCha8Rng) -> Result<Self, ContagionError> {
        let population = if generator.tracks_contacts() {
            Population::new(network)
        } else {
            Population::mean_field(network)
        };
        generator.clear(&population)?;
        Ok(Self {
            population,
            generator,
            rng,
            generations: HashMap::new(),
            macro_states: Vec::new(),
            transmissions: Vec::new(),
            current_time: 0.0,
            last_event_time: 0.0,
            stats: ContagionStats::default(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.population.size()
    }

    /// State of every node, indexed by node.
    pub fn state_vector(&self) -> &[NodeState] {
        self.population.states()
    }

    /// Currently infected nodes.
    pub fn infected_node_set(&self) -> &IndexSet<Node> {
        self.population.infected_nodes()
    }

    pub fn number_of_infected_nodes(&self) -> usize {
        self.population.number_of_infected()
    }

    /// Number of infected neighbors of a susceptible node. Always zero when
    /// the generator does not track contacts.
    pub fn infected_degree(&self, node: Node) -> Result<InfectedDegree, ContagionError> {
        self.population.check_node(node)?;
        Ok(self.population.infected_degree(node))
    }

    /// Generation of an infected or recovered node, if it was tracked.
    pub fn generation(&self, node: Node) -> Option<Generation> {
        self.generations.get(&node).copied()
    }

    pub fn network(&self) -> Arc<Network> {
        self.population.network_handle()
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Time of the most recent event, or of the last external mutation.
    pub fn last_event_time(&self) -> f64 {
        self.last_event_time
    }

    /// Time until the next batch of events; infinite when exhausted.
    pub fn lifetime(&self) -> f64 {
        self.generator.lifetime(&self.population)
    }

    pub fn macro_state_vector(&self) -> &[MacroState] {
        &self.macro_states
    }

    pub fn transmission_tree(&self) -> &[Transmission] {
        &self.transmissions
    }

    /// Compartment counts at the current time.
    pub fn current_macro_state(&self) -> MacroState {
        self.population.macro_state(self.current_time)
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn stats(&self) -> ContagionStats {
        self.stats
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Mutators
    // ═══════════════════════════════════════════════════════════════════════

    /// Reseed the random generator.
    pub fn seed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Infect `floor(N * fraction)` distinct susceptible nodes drawn uniformly.
    pub fn infect_fraction(&mut self, fraction: f64) -> Result<(), ContagionError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ContagionError::InvalidFraction(fraction));
        }
        let requested = (self.size() as f64 * fraction).floor() as usize;
        let available = self.population.number_of_susceptible();
        if requested > available {
            return Err(ContagionError::NotEnoughSusceptible {
                requested,
                available,
            });
        }

        let size = self.size();
        let mut count = 0;
        while count < requested {
            let node = self.rng.gen_range(0..size) as Node;
            if self.population.is_susceptible(node) {
                self.infect(node)?;
                count += 1;
            }
        }
        debug!(fraction, infected = requested, "Seeded infections");
        Ok(())
    }

    /// Infect every currently susceptible node of `nodes`; others are skipped.
    ///
    /// Fails before any mutation if a node is outside the network.
    pub fn infect_node_set<I>(&mut self, nodes: I) -> Result<(), ContagionError>
    where
        I: IntoIterator<Item = Node>,
    {
        let nodes: Vec<Node> = nodes.into_iter().collect();
        for &node in &nodes {
            self.population.check_node(node)?;
        }
        for node in nodes {
            if self.population.is_susceptible(node) {
                self.infect(node)?;
            }
        }
        Ok(())
    }

    /// Infect `node` as a seed of generation zero.
    pub fn infect(&mut self, node: Node) -> Result<(), ContagionError> {
        self.generator.infect(&mut self.population, node)?;
        self.generations.insert(node, Generation::SEED);
        self.stats.infections += 1;
        self.last_event_time = self.current_time;
        Ok(())
    }

    /// Recover `node` outside of the event loop.
    pub fn recover(&mut self, node: Node) -> Result<(), ContagionError> {
        self.generator.recover(&mut self.population, node)?;
        self.stats.recoveries += 1;
        self.last_event_time = self.current_time;
        Ok(())
    }

    /// Recover every infected node, then make every recovered node
    /// susceptible again at the current time.
    ///
    /// Histories and the clock are kept; event sets are rebuilt from scratch.
    pub fn clear(&mut self) -> Result<(), ContagionError> {
        let infected: Vec<Node> = self.population.infected_nodes().iter().copied().collect();
        for node in infected {
            self.generator.recover(&mut self.population, node)?;
        }
        self.population.restore_susceptible();
        self.generations.clear();
        self.generator.clear(&self.population)?;
        self.last_event_time = self.current_time;
        debug!(time = self.current_time, generator = self.generator.name(), "Cleared");
        Ok(())
    }

    /// [`clear`](Self::clear), then wipe the histories and rewind the clock.
    pub fn reset(&mut self) -> Result<(), ContagionError> {
        self.clear()?;
        self.macro_states.clear();
        self.transmissions.clear();
        self.current_time = 0.0;
        self.last_event_time = 0.0;
        self.stats = ContagionStats::default();
        Ok(())
    }

    /// Advance the process by `period` time units.
    ///
    /// Batches are applied while the next one falls within the period and
    /// the lifetime is finite. When requested, the infector of each infection
    /// is drawn before its batch is applied, and a macro-state snapshot is
    /// appended after each batch (plus an initial one if the history is
    /// empty). The clock always ends at exactly `initial + period`.
    pub fn evolve(
        &mut self,
        period: f64,
        record_transmissions: bool,
        record_macro_state: bool,
    ) -> Result<(), ContagionError> {
        if !period.is_finite() || period < 0.0 {
            return Err(ContagionError::InvalidPeriod(period));
        }
        if record_macro_state && self.macro_states.is_empty() {
            self.store_macro_state();
        }

        let initial_time = self.current_time;
        let steps_before = self.stats.steps;
        debug!(
            generator = self.generator.name(),
            initial_time,
            period,
            infected = self.population.number_of_infected(),
            "Evolving"
        );

        loop {
            let lifetime = self.generator.lifetime(&self.population);
            if !lifetime.is_finite() || self.last_event_time + lifetime - initial_time > period {
                break;
            }
            self.current_time = self.last_event_time + lifetime;
            self.last_event_time = self.current_time;

            let events = self.generator.next_step(&self.population, &mut self.rng)?;
            if record_transmissions {
                self.update_transmission_tree(&events);
            }
            self.apply_events(&events)?;
            self.stats.steps += 1;

            if record_macro_state {
                self.store_macro_state();
            }
        }

        self.current_time = initial_time + period;
        debug!(
            time = self.current_time,
            steps = self.stats.steps - steps_before,
            infected = self.population.number_of_infected(),
            recovered = self.population.number_of_recovered(),
            "Evolved"
        );
        Ok(())
    }

    fn store_macro_state(&mut self) {
        self.macro_states
            .push(self.population.macro_state(self.current_time));
    }

    fn update_transmission_tree(&mut self, events: &[Event]) {
        for event in events.iter().filter(|event| event.is_infection()) {
            let infectee = event.node;
            let chosen = self
                .generator
                .choose_infector(&self.population, infectee, &mut self.rng);

            let Some((infector, infected_degree)) = chosen else {
                // Spontaneous infection: a new root of the forest.
                self.generations.insert(infectee, Generation::SEED);
                continue;
            };

            // Infectors seeded while recording was off count as roots.
            let generation = self
                .generations
                .get(&infector)
                .copied()
                .unwrap_or(Generation::SEED);
            self.generations.insert(infectee, generation.next());
            self.transmissions.push(Transmission {
                time: self.current_time,
                generation,
                infector,
                infectee,
                infected_degree,
            });
        }
    }

    fn apply_events(&mut self, events: &[Event]) -> Result<(), ContagionError> {
        for event in events {
            trace!(time = self.current_time, %event, "Applying event");
            match event.action {
                Action::Infect => {
                    self.generator.infect(&mut self.population, event.node)?;
                    self.stats.infections += 1;
                }
                Action::Recover => {
                    self.generator.recover(&mut self.population, event.node)?;
                    self.stats.recoveries += 1;
                }
            }
        }
        Ok(())
    }
}

impl<G: std::fmt::Debug> std::fmt::Debug for Contagion<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Contagion")
            .field("generator", &self.generator)
            .field("size", &self.population.size())
            .field("infected", &self.population.number_of_infected())
            .field("current_time", &self.current_time)
            .field("last_event_time", &self.last_event_time)
            .field("stats", &self.stats)
            .finish()
    }
}
