//! Infected-neighbor multiset with O(1) swap-remove.

use fastsir_types::Node;
use std::collections::HashMap;

/// Currently infected neighbors of one node.
///
/// Entries live in a dense vector so a uniformly random infector is a single
/// index draw. A node reached through parallel edges is stored once per edge.
/// Removal swaps the target with the last entry and pops, patching the
/// position of the entry that moved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfectedNeighbors {
    /// Dense list of infected neighbors.
    nodes: Vec<Node>,
    /// Positions in `nodes` of each neighbor, one per occurrence.
    positions: HashMap<Node, Vec<usize>>,
}

impl InfectedNeighbors {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, counting parallel edges.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no neighbor is infected.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Entries in storage order.
    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    /// Entry at `index` in storage order.
    pub fn get(&self, index: usize) -> Option<Node> {
        self.nodes.get(index).copied()
    }

    /// Whether `node` has at least one entry.
    #[cfg(test)]
    fn contains(&self, node: Node) -> bool {
        self.positions.contains_key(&node)
    }

    /// Number of entries for `node`.
    #[cfg(test)]
    fn count(&self, node: Node) -> usize {
        self.positions.get(&node).map_or(0, Vec::len)
    }

    /// Append one entry for `node`.
    pub fn push(&mut self, node: Node) {
        self.positions
            .entry(node)
            .or_default()
            .push(self.nodes.len());
        self.nodes.push(node);
    }

    /// Remove one entry for `node`. Returns false if `node` had none.
    pub fn remove(&mut self, node: Node) -> bool {
        let Some(slots) = self.positions.get_mut(&node) else {
            return false;
        };
        let Some(position) = slots.pop() else {
            return false;
        };
        if slots.is_empty() {
            self.positions.remove(&node);
        }

        let last = self.nodes.len() - 1;
        if position != last {
            let moved = self.nodes[last];
            self.nodes.swap(position, last);
            if let Some(slot) = self
                .positions
                .get_mut(&moved)
                .and_then(|slots| slots.iter_mut().find(|slot| **slot == last))
            {
                *slot = position;
            }
        }
        self.nodes.pop();
        true
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.positions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(set: &InfectedNeighbors) -> Vec<Node> {
        let mut nodes = set.as_slice().to_vec();
        nodes.sort_unstable();
        nodes
    }

    #[test]
    fn test_push_remove() {
        let mut set = InfectedNeighbors::new();
        set.push(3);
        set.push(7);
        set.push(9);

        assert!(set.remove(3));
        assert_eq!(sorted(&set), vec![7, 9]);
        assert!(!set.contains(3));
        assert!(!set.remove(3));

        // The entry swapped into the hole must still be removable.
        assert!(set.remove(9));
        assert!(set.remove(7));
        assert!(set.is_empty());
    }

    #[test]
    fn test_parallel_entries() {
        let mut set = InfectedNeighbors::new();
        set.push(1);
        set.push(2);
        set.push(1);
        assert_eq!(set.len(), 3);
        assert_eq!(set.count(1), 2);

        assert!(set.remove(1));
        assert_eq!(set.count(1), 1);
        assert_eq!(sorted(&set), vec![1, 2]);

        assert!(set.remove(2));
        assert!(set.remove(1));
        assert!(!set.remove(1));
        assert!(set.is_empty());
    }

    #[test]
    fn test_positions_stay_consistent() {
        let mut set = InfectedNeighbors::new();
        for node in 0..50 {
            set.push(node);
        }
        for node in (0..50).step_by(3) {
            assert!(set.remove(node));
        }
        for (index, node) in set.as_slice().iter().enumerate() {
            assert_eq!(set.get(index), Some(*node));
            assert_eq!(set.count(*node), 1);
        }
        assert_eq!(set.len(), 50 - 17);
    }

    #[test]
    fn test_clear() {
        let mut set = InfectedNeighbors::new();
        set.push(4);
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(4));
    }
}
