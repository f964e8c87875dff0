//! Edge-list fixtures.

use fastsir_types::{EdgeList, Network, Node};
use std::sync::Arc;

/// Node 0 linked to each of `1..size`.
pub fn star(size: u32) -> EdgeList {
    (1..size).map(|leaf| (0, leaf)).collect()
}

/// `0 - 1 - ... - (size - 1)`.
pub fn path(size: u32) -> EdgeList {
    (1..size).map(|node| (node - 1, node)).collect()
}

/// Path closed into a cycle. Needs at least three nodes.
pub fn ring(size: u32) -> EdgeList {
    let mut edges = path(size);
    if size > 2 {
        edges.push((size - 1, 0));
    }
    edges
}

/// Every pair of distinct nodes.
pub fn complete(size: u32) -> EdgeList {
    (0..size)
        .flat_map(|u| ((u + 1)..size).map(move |v| (u, v)))
        .collect()
}

/// Two nodes, one edge.
pub fn single_edge() -> EdgeList {
    vec![(0, 1)]
}

/// Shared network over `edges`.
pub fn network(edges: &[(Node, Node)]) -> Arc<Network> {
    Network::from_edges(edges).into_arc()
}
