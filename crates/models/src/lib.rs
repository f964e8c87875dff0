//! SIR event generators for fastsir.
//!
//! Three strategies plug into [`Contagion`]:
//!
//! | Generator | Time | Events per step |
//! |-----------|------|-----------------|
//! | [`ExactGenerator`] | continuous, `1 / total rate` | one |
//! | [`DiscreteGenerator`] | unit ticks | recoveries then infections |
//! | [`AnnealedGenerator`] | continuous, mean-field rate | one |
//!
//! # Example
//!
//! ```ignore
//! use fastsir_models::continuous_sir;
//!
//! let edges = vec![(0, 1), (1, 2), (2, 3)];
//! let mut sir = continuous_sir(&edges, 1.0, vec![0.0, 0.5, 1.0])?;
//! sir.seed(42);
//! sir.infect_node_set([0])?;
//! sir.evolve(10.0, true, true)?;
//! println!("{:?}", sir.current_macro_state());
//! ```

mod annealed;
mod discrete;
mod error;
mod exact;
mod propensity;

pub use annealed::AnnealedGenerator;
pub use discrete::DiscreteGenerator;
pub use error::ModelError;
pub use exact::ExactGenerator;

use fastsir_simulation::Contagion;
use fastsir_types::{Network, Node};
use std::sync::Arc;

/// Exact continuous-time SIR.
pub type ContinuousSir = Contagion<ExactGenerator>;

/// Discrete-time SIR with Poisson-approximated infections.
pub type DiscreteSir = Contagion<DiscreteGenerator>;

/// Mean-field SIR on a degree-regular annealed network.
pub type AnnealedSir = Contagion<AnnealedGenerator>;

/// Exact continuous-time SIR on the network given by `edges`.
pub fn continuous_sir(
    edges: &[(Node, Node)],
    recovery_rate: f64,
    infection_rate: Vec<f64>,
) -> Result<ContinuousSir, ModelError> {
    let generator = ExactGenerator::new(recovery_rate, infection_rate)?;
    Ok(Contagion::new(Network::from_edges(edges).into_arc(), generator)?)
}

/// Discrete-time SIR on the network given by `edges`.
pub fn discrete_sir(
    edges: &[(Node, Node)],
    recovery_probability: f64,
    infection_probability: Vec<f64>,
) -> Result<DiscreteSir, ModelError> {
    let generator = DiscreteGenerator::new(recovery_probability, infection_probability)?;
    Ok(Contagion::new(Network::from_edges(edges).into_arc(), generator)?)
}

/// Mean-field SIR over `nodes` nodes of degree `degree`.
pub fn annealed_sir(
    nodes: usize,
    degree: usize,
    recovery_rate: f64,
    infection_rate: Vec<f64>,
) -> Result<AnnealedSir, ModelError> {
    let generator = AnnealedGenerator::new(degree, recovery_rate, infection_rate)?;
    Ok(Contagion::new(annealed_network(nodes), generator)?)
}

/// Placeholder network for the annealed model: a star over `nodes` nodes.
pub fn annealed_network(nodes: usize) -> Arc<Network> {
    Network::star(nodes).into_arc()
}
