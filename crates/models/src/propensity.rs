//! Infection weights driven by each node's infected degree.

use crate::ModelError;
use fastsir_core::{ContagionError, Population};
use fastsir_sampling::WeightedEventSet;
use fastsir_types::{InfectedDegree, Node};
use indexmap::IndexMap;

/// Per-degree weight table and the infection set it feeds.
///
/// A susceptible node is a member iff its current weight is positive.
#[derive(Debug, Clone)]
pub(crate) struct NeighborPropensity {
    table: Vec<f64>,
    candidates: WeightedEventSet<Node>,
}

impl NeighborPropensity {
    pub(crate) fn new(table: Vec<f64>) -> Result<Self, ModelError> {
        let candidates = WeightedEventSet::covering(&table)?;
        Ok(Self { table, candidates })
    }

    pub(crate) fn table(&self) -> &[f64] {
        &self.table
    }

    pub(crate) fn candidates(&self) -> &WeightedEventSet<Node> {
        &self.candidates
    }

    pub(crate) fn total(&self) -> f64 {
        self.candidates.total_weight()
    }

    pub(crate) fn weight(&self, degree: InfectedDegree) -> Result<f64, ContagionError> {
        self.table
            .get(degree)
            .copied()
            .ok_or(ContagionError::DegreeOutOfRange {
                degree,
                len: self.table.len(),
            })
    }

    /// Bring the weight of a susceptible `node` in line with its infected degree.
    pub(crate) fn refresh(
        &mut self,
        population: &Population,
        node: Node,
    ) -> Result<(), ContagionError> {
        let weight = self.weight(population.infected_degree(node))?;
        if weight > 0.0 {
            self.candidates.set_weight(node, weight)?;
        } else {
            self.candidates.erase(&node);
        }
        Ok(())
    }

    /// Fail with [`ContagionError::DegreeOutOfRange`] if infecting `node`
    /// would push a susceptible neighbor's infected degree past the table.
    /// Nothing is modified, so a rejected infection leaves no trace.
    pub(crate) fn check_infection(
        &self,
        population: &Population,
        node: Node,
    ) -> Result<(), ContagionError> {
        population.check_node(node)?;
        if !population.is_susceptible(node) {
            return Ok(());
        }

        let mut added: IndexMap<Node, usize> = IndexMap::new();
        for &neighbor in population.network().adjacent_nodes(node) {
            if neighbor != node && population.is_susceptible(neighbor) {
                *added.entry(neighbor).or_default() += 1;
            }
        }
        for (neighbor, multiplicity) in added {
            self.weight(population.infected_degree(neighbor) + multiplicity)?;
        }
        Ok(())
    }

    /// Refresh every susceptible neighbor of `node`.
    pub(crate) fn refresh_neighbors(
        &mut self,
        population: &Population,
        node: Node,
    ) -> Result<(), ContagionError> {
        for &neighbor in population.network().adjacent_nodes(node) {
            if population.is_susceptible(neighbor) {
                self.refresh(population, neighbor)?;
            }
        }
        Ok(())
    }

    pub(crate) fn remove(&mut self, node: Node) {
        self.candidates.erase(&node);
    }

    /// Empty the set and refresh every susceptible node.
    pub(crate) fn rebuild(&mut self, population: &Population) -> Result<(), ContagionError> {
        self.candidates.clear();
        for node in population.network().nodes() {
            if population.is_susceptible(node) {
                self.refresh(population, node)?;
            }
        }
        Ok(())
    }
}

/// Recovery set holding every infected node with unit weight.
pub(crate) fn rebuild_recoveries(
    recoveries: &mut WeightedEventSet<Node>,
    population: &Population,
) -> Result<(), ContagionError> {
    recoveries.clear();
    for &node in population.infected_nodes() {
        recoveries.insert(node, 1.0)?;
    }
    Ok(())
}
