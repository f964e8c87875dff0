//! Error types for the simulator.

use fastsir_core::ContagionError;
use fastsir_models::ModelError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring or running simulations.
#[derive(Debug, Error)]
pub enum SimulatorError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed edge on line {line}: {content:?}")]
    MalformedEdge { line: usize, content: String },

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot build a {degree}-regular graph on {nodes} nodes")]
    InvalidRegularGraph { nodes: usize, degree: usize },

    #[error("Metrics error: {0}")]
    Metrics(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Contagion(#[from] ContagionError),
}
