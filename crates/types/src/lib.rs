//! Core types for fastsir.
//!
//! Shared vocabulary for every other crate in the workspace:
//!
//! - **Identifiers**: [`Node`], [`Generation`], [`InfectedDegree`]
//! - **State**: [`NodeState`], [`Action`], [`Event`]
//! - **Records**: [`MacroState`], [`Transmission`]
//! - **Network**: the immutable contact [`Network`]

mod identifiers;
mod network;
mod records;
mod state;

pub use identifiers::{Generation, InfectedDegree, Node};
pub use network::{EdgeList, Network};
pub use records::{MacroState, Transmission};
pub use state::{Action, Event, NodeState};
