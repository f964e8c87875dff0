//! Simulation runner.

use crate::config::{ModelKind, Seeding};
use crate::metrics::{EnsembleReport, MetricsCollector, RunDetails, SimulationReport};
use crate::{SimulatorConfig, SimulatorError};
use fastsir_core::EventGenerator;
use fastsir_models::{annealed_network, AnnealedGenerator, DiscreteGenerator, ExactGenerator};
use fastsir_simulation::Contagion;
use fastsir_types::Network;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

/// Runs configured SIR simulations over one shared network.
///
/// The network is built once from the configured seed; every run gets its
/// own engine, so runs are independent and can proceed in parallel.
pub struct Simulator {
    config: SimulatorConfig,
    network: Arc<Network>,
}

impl Simulator {
    /// Validate the configuration and build the network.
    pub fn new(config: SimulatorConfig) -> Result<Self, SimulatorError> {
        config.validate()?;

        let network = match &config.model {
            ModelKind::Annealed { nodes, .. } => annealed_network(*nodes),
            ModelKind::Continuous | ModelKind::Discrete => {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
                config.graph.build(&mut rng)?.into_arc()
            }
        };

        Ok(Self { config, network })
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    pub fn network(&self) -> &Arc<Network> {
        &self.network
    }

    /// Run once with the configured seed.
    pub fn run(&self) -> Result<SimulationReport, SimulatorError> {
        self.run_with_seed(self.config.seed)
    }

    /// Run once with `seed` driving the process (the network is unchanged).
    pub fn run_with_seed(&self, seed: u64) -> Result<SimulationReport, SimulatorError> {
        let config = &self.config;
        match config.model {
            ModelKind::Continuous => {
                let table = config.infection_table().build(self.network.max_degree());
                let generator = ExactGenerator::new(config.recovery, table)?;
                self.drive(self.engine(generator, seed)?, seed)
            }
            ModelKind::Discrete => {
                let table = config.infection_table().build(self.network.max_degree());
                let generator = DiscreteGenerator::new(config.recovery, table)?;
                self.drive(self.engine(generator, seed)?, seed)
            }
            ModelKind::Annealed { degree, .. } => {
                let table = config.infection_table().build(degree);
                let generator = AnnealedGenerator::new(degree, config.recovery, table)?;
                self.drive(self.engine(generator, seed)?, seed)
            }
        }
    }

    /// Run `config.runs` independent simulations in parallel. Run `i` uses
    /// seed `config.seed + i`.
    pub fn run_ensemble(&self) -> Result<EnsembleReport, SimulatorError> {
        info!(runs = self.config.runs, seed = self.config.seed, "Starting ensemble");
        let reports = (0..self.config.runs as u64)
            .into_par_iter()
            .map(|index| self.run_with_seed(self.config.seed.wrapping_add(index)))
            .collect::<Result<Vec<_>, _>>()?;
        EnsembleReport::from_reports(&reports)
    }

    fn engine<G: EventGenerator>(
        &self,
        generator: G,
        seed: u64,
    ) -> Result<Contagion<G>, SimulatorError> {
        Ok(Contagion::with_seed(
            Arc::clone(&self.network),
            generator,
            seed,
        )?)
    }

    fn drive<G: EventGenerator>(
        &self,
        mut contagion: Contagion<G>,
        seed: u64,
    ) -> Result<SimulationReport, SimulatorError> {
        let config = &self.config;
        match &config.seeding {
            Seeding::Fraction(fraction) => contagion.infect_fraction(*fraction)?,
            Seeding::Nodes(nodes) => contagion.infect_node_set(nodes.iter().copied())?,
        }

        let mut metrics = MetricsCollector::new();
        metrics.record_sample(contagion.current_macro_state());

        let mut elapsed = 0.0;
        while elapsed < config.period && contagion.lifetime().is_finite() {
            let interval = config.sample_interval.min(config.period - elapsed);
            contagion.evolve(
                interval,
                config.record_transmissions,
                config.record_macro_states,
            )?;
            elapsed += interval;
            metrics.record_sample(contagion.current_macro_state());
        }
        for state in contagion.macro_state_vector() {
            metrics.observe(state);
        }

        let final_state = contagion.current_macro_state();
        if final_state.infected > 0 {
            warn!(
                seed,
                infected = final_state.infected,
                time = contagion.current_time(),
                "Run reached the horizon with infected nodes left"
            );
        }
        let stats = contagion.stats();
        info!(
            seed,
            model = contagion.generator().name(),
            time = contagion.current_time(),
            steps = stats.steps,
            infections = stats.infections,
            recoveries = stats.recoveries,
            attack_rate = final_state.attack_rate(),
            "Run complete"
        );

        Ok(metrics.finish(RunDetails {
            seed,
            model: contagion.generator().name(),
            final_state,
            steps: stats.steps,
            macro_states: contagion.macro_state_vector().to_vec(),
            transmission_tree: contagion.transmission_tree().to_vec(),
        }))
    }
}
