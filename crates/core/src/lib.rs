//! Core bookkeeping for fastsir.
//!
//! - [`Population`]: node states, infected and recovered sets, and the
//!   per-node infected-neighbor lists kept up to date on every transition
//! - [`EventGenerator`]: the seam between the simulation engine and the
//!   event-generation strategies
//! - [`ContagionError`]: contract violations raised by either side

mod error;
mod neighbors;
mod population;
mod traits;

pub use error::ContagionError;
pub use neighbors::InfectedNeighbors;
pub use population::Population;
pub use traits::EventGenerator;
