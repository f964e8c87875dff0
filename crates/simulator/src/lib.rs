//! fastsir Simulator
//!
//! Configurable SIR experiments built on top of the contagion engine.
//! Turns a TOML or programmatic configuration into seeded runs and
//! parallel ensembles.
//!
//! # Architecture
//!
//! The simulator builds on `fastsir-models` to provide:
//!
//! - **Graphs**: Erdős–Rényi, random-regular, ring, complete and edge-list networks
//! - **Infection tables**: per-degree rates or probabilities derived from one parameter
//! - **Runs**: seeding, sampling on a regular time grid, early stop on extinction
//! - **Metrics**: final size, peak prevalence, final-size percentiles across runs
//!
//! # Example
//!
//! ```ignore
//! use fastsir_simulator::{GraphConfig, ModelKind, Simulator, SimulatorConfig};
//!
//! let config = SimulatorConfig::new(
//!     ModelKind::Continuous,
//!     GraphConfig::RandomRegular { nodes: 10_000, degree: 6 },
//! )
//! .with_runs(32);
//!
//! let simulator = Simulator::new(config)?;
//! let ensemble = simulator.run_ensemble()?;
//! ensemble.print_summary();
//! ```

pub mod config;
pub mod error;
pub mod graphs;
pub mod metrics;
pub mod runner;
pub mod table;

pub use config::{ModelKind, Seeding, SimulatorConfig};
pub use error::SimulatorError;
pub use graphs::GraphConfig;
pub use metrics::{EnsembleReport, MetricsCollector, RunSummary, SimulationReport};
pub use runner::Simulator;
pub use table::InfectionTable;
