//! Configuration types for the simulator.

use crate::{GraphConfig, InfectionTable, SimulatorError};
use fastsir_types::Node;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which event generator drives the process.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    /// Exact continuous-time process; the table holds rates.
    #[default]
    Continuous,

    /// Discrete ticks; the table holds per-tick probabilities and the
    /// recovery parameter is a probability.
    Discrete,

    /// Mean-field process on a degree-regular annealed network. The graph
    /// configuration is ignored.
    Annealed {
        /// Number of nodes.
        nodes: usize,
        /// Degree of every node.
        degree: usize,
    },
}

/// Initial infections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seeding {
    /// `floor(N * fraction)` nodes drawn uniformly.
    Fraction(f64),

    /// An explicit node set.
    Nodes(Vec<Node>),
}

impl Default for Seeding {
    fn default() -> Self {
        Seeding::Fraction(0.01)
    }
}

/// Configuration for a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Event generator.
    pub model: ModelKind,

    /// Contact network.
    pub graph: GraphConfig,

    /// Recovery rate, or per-tick recovery probability for discrete runs.
    pub recovery: f64,

    /// Per-degree infection rate or probability. When unset, the model's
    /// default applies (see [`infection_table`](Self::infection_table)).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub infection: Option<InfectionTable>,

    /// Initial infections.
    pub seeding: Seeding,

    /// Simulated time to evolve.
    pub period: f64,

    /// Spacing of the regular prevalence samples.
    pub sample_interval: f64,

    /// Record who infected whom.
    pub record_transmissions: bool,

    /// Record a macro-state after every event batch.
    pub record_macro_states: bool,

    /// Random seed; run `i` of an ensemble uses `seed + i`.
    pub seed: u64,

    /// Number of independent runs.
    pub runs: usize,
}

impl SimulatorConfig {
    /// Create a new simulator configuration.
    pub fn new(model: ModelKind, graph: GraphConfig) -> Self {
        Self {
            model,
            graph,
            recovery: 1.0,
            infection: None,
            seeding: Seeding::default(),
            period: 100.0,
            sample_interval: 1.0,
            record_transmissions: false,
            record_macro_states: false,
            seed: 12345,
            runs: 1,
        }
    }

    /// Parse a TOML document. Missing fields take their default.
    pub fn from_toml_str(text: &str) -> Result<Self, SimulatorError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> Result<Self, SimulatorError> {
        let text = std::fs::read_to_string(path).map_err(|source| SimulatorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    pub fn with_graph(mut self, graph: GraphConfig) -> Self {
        self.graph = graph;
        self
    }

    /// Set the recovery rate or probability.
    pub fn with_recovery(mut self, recovery: f64) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_infection(mut self, infection: InfectionTable) -> Self {
        self.infection = Some(infection);
        self
    }

    /// The configured infection table, or the model's default: per-tick
    /// probabilities for discrete runs, rates otherwise.
    pub fn infection_table(&self) -> InfectionTable {
        match (&self.infection, &self.model) {
            (Some(table), _) => table.clone(),
            (None, ModelKind::Discrete) => InfectionTable::default_probabilities(),
            (None, _) => InfectionTable::default(),
        }
    }

    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_period(mut self, period: f64) -> Self {
        self.period = period;
        self
    }

    pub fn with_sample_interval(mut self, interval: f64) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Record the transmission tree.
    pub fn with_transmissions(mut self, record: bool) -> Self {
        self.record_transmissions = record;
        self
    }

    /// Record the macro-state after every event batch.
    pub fn with_macro_states(mut self, record: bool) -> Self {
        self.record_macro_states = record;
        self
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Check the values no model constructor checks.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        let invalid = |message: String| Err(SimulatorError::InvalidConfig(message));
        if !self.period.is_finite() || self.period < 0.0 {
            return invalid(format!("period {} must be finite and non-negative", self.period));
        }
        if !self.sample_interval.is_finite() || self.sample_interval <= 0.0 {
            return invalid(format!(
                "sample interval {} must be finite and positive",
                self.sample_interval
            ));
        }
        if self.runs == 0 {
            return invalid("at least one run is required".to_string());
        }
        if let Seeding::Fraction(fraction) = self.seeding {
            if !(0.0..=1.0).contains(&fraction) {
                return invalid(format!("seed fraction {fraction} outside [0, 1]"));
            }
        }
        Ok(())
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(ModelKind::default(), GraphConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = SimulatorConfig::default()
            .with_model(ModelKind::Discrete)
            .with_recovery(0.5)
            .with_seeding(Seeding::Nodes(vec![0, 3]))
            .with_period(20.0)
            .with_seed(7)
            .with_runs(4);
        assert_eq!(config.model, ModelKind::Discrete);
        assert_eq!(config.recovery, 0.5);
        assert_eq!(config.seeding, Seeding::Nodes(vec![0, 3]));
        assert_eq!(config.runs, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let text = r#"
            recovery = 0.8
            period = 50.0
            seed = 42
            runs = 8
            record_transmissions = true

            [model]
            kind = "annealed"
            nodes = 2000
            degree = 5

            [infection]
            kind = "independent"
            transmissibility = 0.2

            [seeding]
            fraction = 0.05
        "#;
        let config = SimulatorConfig::from_toml_str(text).unwrap();
        assert_eq!(
            config.model,
            ModelKind::Annealed {
                nodes: 2000,
                degree: 5
            }
        );
        assert_eq!(config.recovery, 0.8);
        assert_eq!(config.seeding, Seeding::Fraction(0.05));
        assert_eq!(
            config.infection_table(),
            InfectionTable::Independent {
                transmissibility: 0.2
            }
        );
        assert!(config.record_transmissions);
        assert_eq!(config.sample_interval, 1.0);
        assert_eq!(config.graph, GraphConfig::default());
    }

    #[test]
    fn test_from_toml_graph_and_nodes() {
        let text = r#"
            [graph]
            kind = "edge_list"
            path = "contacts.txt"

            [seeding]
            nodes = [1, 2, 3]
        "#;
        let config = SimulatorConfig::from_toml_str(text).unwrap();
        assert_eq!(
            config.graph,
            GraphConfig::EdgeList {
                path: "contacts.txt".into()
            }
        );
        assert_eq!(config.seeding, Seeding::Nodes(vec![1, 2, 3]));
    }

    #[test]
    fn test_default_table_follows_model() {
        let continuous = SimulatorConfig::default();
        assert_eq!(continuous.infection_table(), InfectionTable::default());

        let discrete = SimulatorConfig::default().with_model(ModelKind::Discrete);
        assert_eq!(
            discrete.infection_table(),
            InfectionTable::default_probabilities()
        );

        let explicit = discrete.with_infection(InfectionTable::Linear { beta: 0.1 });
        assert_eq!(
            explicit.infection_table(),
            InfectionTable::Linear { beta: 0.1 }
        );

        let parsed = SimulatorConfig::from_toml_str("[model]\nkind = \"discrete\"\n").unwrap();
        assert_eq!(parsed.infection, None);
        assert_eq!(
            parsed.infection_table(),
            InfectionTable::default_probabilities()
        );
    }

    #[test]
    fn test_validate() {
        let config = SimulatorConfig::default().with_period(-1.0);
        assert!(matches!(
            config.validate(),
            Err(SimulatorError::InvalidConfig(_))
        ));
        assert!(SimulatorConfig::default().with_runs(0).validate().is_err());
        assert!(SimulatorConfig::default()
            .with_sample_interval(0.0)
            .validate()
            .is_err());
        assert!(SimulatorConfig::default()
            .with_seeding(Seeding::Fraction(2.0))
            .validate()
            .is_err());
    }

    #[test]
    fn test_rejects_unknown_model() {
        let result = SimulatorConfig::from_toml_str("[model]\nkind = \"sis\"\n");
        assert!(matches!(result, Err(SimulatorError::Config(_))));
    }
}
