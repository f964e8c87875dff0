//! Immutable undirected contact network.

use crate::Node;
use std::sync::Arc;

/// List of undirected edges given as node pairs.
pub type EdgeList = Vec<(Node, Node)>;

/// Undirected contact network stored as adjacency lists.
///
/// Nodes are the dense range `[0, N)`. Parallel edges are kept, so a node
/// listed twice in an adjacency list counts twice toward its degree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Network {
    adjacency: Vec<Vec<Node>>,
    min_degree: usize,
    max_degree: usize,
    edge_count: usize,
}

impl Network {
    /// Build a network from an edge list.
    ///
    /// The node count is the largest label seen plus one; an empty edge list
    /// gives an empty network.
    pub fn from_edges(edges: &[(Node, Node)]) -> Self {
        let size = edges
            .iter()
            .map(|&(u, v)| u.max(v) as usize + 1)
            .max()
            .unwrap_or(0);
        Self::with_size(size, edges)
    }

    /// Build a network with an explicit node count.
    ///
    /// Nodes without edges are isolated. The count grows to cover any label
    /// in `edges` that falls outside `[0, size)`.
    pub fn with_size(size: usize, edges: &[(Node, Node)]) -> Self {
        let size = edges
            .iter()
            .map(|&(u, v)| u.max(v) as usize + 1)
            .fold(size, usize::max);

        let mut adjacency = vec![Vec::new(); size];
        for &(u, v) in edges {
            adjacency[u as usize].push(v);
            adjacency[v as usize].push(u);
        }

        let min_degree = adjacency.iter().map(Vec::len).min().unwrap_or(0);
        let max_degree = adjacency.iter().map(Vec::len).max().unwrap_or(0);

        Self {
            adjacency,
            min_degree,
            max_degree,
            edge_count: edges.len(),
        }
    }

    /// Star graph: node 0 linked to every other node.
    pub fn star(size: usize) -> Self {
        let edges: EdgeList = (1..size as Node).map(|leaf| (0, leaf)).collect();
        Self::with_size(size, &edges)
    }

    /// Wrap the network for sharing between simulation instances.
    pub fn into_arc(self) -> Arc<Network> {
        Arc::new(self)
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of edges, parallel edges included.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether `node` belongs to the network.
    pub fn contains(&self, node: Node) -> bool {
        (node as usize) < self.adjacency.len()
    }

    /// Iterate over every node.
    pub fn nodes(&self) -> impl Iterator<Item = Node> {
        0..self.adjacency.len() as Node
    }

    /// Degree of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is outside the network.
    pub fn degree(&self, node: Node) -> usize {
        self.adjacency[node as usize].len()
    }

    /// Neighbors of `node`, with multiplicity for parallel edges.
    ///
    /// # Panics
    ///
    /// Panics if `node` is outside the network.
    pub fn adjacent_nodes(&self, node: Node) -> &[Node] {
        &self.adjacency[node as usize]
    }

    /// Smallest degree over all nodes.
    pub fn min_degree(&self) -> usize {
        self.min_degree
    }

    /// Largest degree over all nodes.
    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    /// Average degree over all nodes.
    pub fn mean_degree(&self) -> f64 {
        match self.size() {
            0 => 0.0,
            n => 2.0 * self.edge_count as f64 / n as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_edges_counts_nodes_from_labels() {
        let network = Network::from_edges(&[(0, 1), (1, 4)]);

        assert_eq!(network.size(), 5);
        assert_eq!(network.degree(1), 2);
        assert_eq!(network.degree(2), 0);
        assert_eq!(network.min_degree(), 0);
        assert_eq!(network.max_degree(), 2);
        assert_eq!(network.adjacent_nodes(1), &[0, 4]);
    }

    #[test]
    fn test_empty_edge_list() {
        let network = Network::from_edges(&[]);
        assert_eq!(network.size(), 0);
        assert_eq!(network.max_degree(), 0);
        assert_eq!(network.mean_degree(), 0.0);
    }

    #[test]
    fn test_parallel_edges_are_kept() {
        let network = Network::from_edges(&[(0, 1), (1, 0)]);
        assert_eq!(network.degree(0), 2);
        assert_eq!(network.adjacent_nodes(0), &[1, 1]);
        assert_eq!(network.edge_count(), 2);
    }

    #[test]
    fn test_star() {
        let network = Network::star(6);
        assert_eq!(network.size(), 6);
        assert_eq!(network.degree(0), 5);
        assert_eq!(network.min_degree(), 1);
        assert_eq!(network.max_degree(), 5);
        assert!(network.nodes().skip(1).all(|leaf| network.adjacent_nodes(leaf) == [0]));
    }

    #[test]
    fn test_with_size_keeps_isolated_nodes() {
        let network = Network::with_size(4, &[(0, 1)]);
        assert_eq!(network.size(), 4);
        assert!(network.contains(3));
        assert!(!network.contains(4));
        assert_eq!(network.min_degree(), 0);
    }

    #[test]
    fn test_mean_degree() {
        let network = Network::from_edges(&[(0, 1), (1, 2), (2, 0)]);
        assert!((network.mean_degree() - 2.0).abs() < 1e-12);
    }
}
