//! Contact network generators and edge-list loading.

use crate::SimulatorError;
use fastsir_types::{EdgeList, Network, Node};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where the contact network comes from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraphConfig {
    /// G(n, p) random graph.
    ErdosRenyi { nodes: usize, edge_probability: f64 },

    /// Configuration-model graph where every node has `degree` stubs.
    RandomRegular { nodes: usize, degree: usize },

    /// Cycle over `nodes` nodes.
    Ring { nodes: usize },

    /// Every pair of nodes linked.
    Complete { nodes: usize },

    /// Whitespace-separated `u v` lines read from a file.
    EdgeList { path: PathBuf },
}

impl GraphConfig {
    /// Build the network, drawing randomness from `rng`.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network, SimulatorError> {
        let network = match self {
            GraphConfig::ErdosRenyi {
                nodes,
                edge_probability,
            } => {
                if !(0.0..=1.0).contains(edge_probability) {
                    return Err(SimulatorError::InvalidConfig(format!(
                        "edge probability {edge_probability} outside [0, 1]"
                    )));
                }
                Network::with_size(*nodes, &erdos_renyi(*nodes, *edge_probability, rng))
            }
            GraphConfig::RandomRegular { nodes, degree } => {
                Network::with_size(*nodes, &random_regular(*nodes, *degree, rng)?)
            }
            GraphConfig::Ring { nodes } => Network::with_size(*nodes, &ring(*nodes)),
            GraphConfig::Complete { nodes } => Network::with_size(*nodes, &complete(*nodes)),
            GraphConfig::EdgeList { path } => Network::from_edges(&read_edge_list(path)?),
        };

        info!(
            nodes = network.size(),
            edges = network.edge_count(),
            mean_degree = network.mean_degree(),
            max_degree = network.max_degree(),
            "Built network"
        );
        Ok(network)
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig::ErdosRenyi {
            nodes: 1000,
            edge_probability: 0.01,
        }
    }
}

/// Each of the `n (n - 1) / 2` pairs linked with probability `p`.
pub fn erdos_renyi<R: Rng + ?Sized>(nodes: usize, p: f64, rng: &mut R) -> EdgeList {
    let mut edges = EdgeList::new();
    for u in 0..nodes {
        for v in (u + 1)..nodes {
            if rng.gen::<f64>() < p {
                edges.push((u as Node, v as Node));
            }
        }
    }
    edges
}

/// Configuration model: `degree` stubs per node, shuffled and paired.
///
/// Self-loops and parallel edges are kept, so every node has exactly
/// `degree` adjacency entries.
pub fn random_regular<R: Rng + ?Sized>(
    nodes: usize,
    degree: usize,
    rng: &mut R,
) -> Result<EdgeList, SimulatorError> {
    if (nodes * degree) % 2 != 0 || (nodes > 0 && degree >= nodes) {
        return Err(SimulatorError::InvalidRegularGraph { nodes, degree });
    }

    let mut stubs: Vec<Node> = (0..nodes)
        .flat_map(|node| std::iter::repeat(node as Node).take(degree))
        .collect();
    stubs.shuffle(rng);
    Ok(stubs.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
}

/// Cycle `0 - 1 - ... - (n - 1) - 0`. Fewer than three nodes give a path.
pub fn ring(nodes: usize) -> EdgeList {
    let mut edges: EdgeList = (1..nodes).map(|v| ((v - 1) as Node, v as Node)).collect();
    if nodes > 2 {
        edges.push(((nodes - 1) as Node, 0));
    }
    edges
}

/// Every pair of distinct nodes.
pub fn complete(nodes: usize) -> EdgeList {
    (0..nodes)
        .flat_map(|u| ((u + 1)..nodes).map(move |v| (u as Node, v as Node)))
        .collect()
}

/// Parse an edge list: one `u v` pair per line, `#` starts a comment,
/// columns past the second are ignored.
pub fn parse_edge_list(text: &str) -> Result<EdgeList, SimulatorError> {
    let mut edges = EdgeList::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || SimulatorError::MalformedEdge {
            line: index + 1,
            content: raw.to_string(),
        };
        let mut fields = line.split_whitespace();
        let u = fields
            .next()
            .and_then(|field| field.parse::<Node>().ok())
            .ok_or_else(malformed)?;
        let v = fields
            .next()
            .and_then(|field| field.parse::<Node>().ok())
            .ok_or_else(malformed)?;
        edges.push((u, v));
    }
    Ok(edges)
}

/// Read and parse an edge-list file.
pub fn read_edge_list(path: &Path) -> Result<EdgeList, SimulatorError> {
    let text = std::fs::read_to_string(path).map_err(|source| SimulatorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_edge_list(&text)
}
