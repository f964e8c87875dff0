//! Test helpers for fastsir.
//!
//! Graph fixtures small enough to reason about by hand, and checkers for
//! the invariants every engine state must satisfy. Checkers panic with a
//! description of the first violation, so they slot straight into tests.

pub mod fixtures;
pub mod invariants;

pub use fixtures::{complete, network, path, ring, single_edge, star};
pub use invariants::{
    assert_compartments, assert_contagion, assert_event_sets, assert_neighbor_bookkeeping,
    assert_transmission_tree,
};
