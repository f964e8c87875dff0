//! Core trait for event-generation strategies.

use crate::{ContagionError, Population};
use fastsir_types::{Event, InfectedDegree, Node};
use rand::Rng;

/// A strategy that decides when the next events happen and which they are.
///
/// The simulation engine owns the [`Population`] and the random generator;
/// the strategy owns its weighted event sets and keeps them in step with the
/// population through the [`infect`](Self::infect) and
/// [`recover`](Self::recover) hooks. The engine loop is:
///
/// ```text
/// while lifetime(population) is finite and within the horizon:
///     events = next_step(population, rng)
///     for event in events:
///         infect(population, node) | recover(population, node)
/// ```
///
/// Implementations must be:
///
/// - **Synchronous**: no blocking, no I/O
/// - **Deterministic**: given the same population and generator state, the
///   same events come out
/// - **Read-only while selecting**: `next_step` never mutates node state
pub trait EventGenerator {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// Whether the population should keep infected-neighbor lists. Strategies
    /// that ignore the contact structure return `false` and get a
    /// [`Population::mean_field`] population.
    fn tracks_contacts(&self) -> bool {
        true
    }

    /// Time until the next batch of events.
    ///
    /// Returns `f64::INFINITY` when no node is infected or when no event has
    /// positive rate; the engine stops evolving in that case.
    fn lifetime(&self, population: &Population) -> f64;

    /// Select the next batch of events.
    ///
    /// # Guarantees
    ///
    /// - Node states are not touched; the engine applies the returned events
    /// - A node appears at most once in the batch
    /// - Recoveries are listed before infections
    ///
    /// # Errors
    ///
    /// [`ContagionError::Exhausted`] if no event is possible.
    fn next_step<R: Rng + ?Sized>(
        &mut self,
        population: &Population,
        rng: &mut R,
    ) -> Result<Vec<Event>, ContagionError>;

    /// Infect `node` and update the event sets it affects.
    ///
    /// # Errors
    ///
    /// [`ContagionError::NotSusceptible`] if `node` is not susceptible, or
    /// [`ContagionError::DegreeOutOfRange`] if a neighbor's new infected
    /// degree has no rate.
    fn infect(&mut self, population: &mut Population, node: Node) -> Result<(), ContagionError>;

    /// Recover `node` and update the event sets it affects.
    ///
    /// # Errors
    ///
    /// [`ContagionError::NotInfected`] if `node` is not infected.
    fn recover(&mut self, population: &mut Population, node: Node) -> Result<(), ContagionError>;

    /// Rebuild every event set from scratch out of the population.
    ///
    /// Called after construction and after the engine clears the population,
    /// which also discards accumulated floating-point drift in the totals.
    fn clear(&mut self, population: &Population) -> Result<(), ContagionError>;

    /// Pick who infected `infectee`, before the infection is applied.
    ///
    /// Returns the infector and the infectee's infected degree, or `None`
    /// for a spontaneous infection. The default picks uniformly among the
    /// recorded infected neighbors.
    fn choose_infector<R: Rng + ?Sized>(
        &self,
        population: &Population,
        infectee: Node,
        rng: &mut R,
    ) -> Option<(Node, InfectedDegree)> {
        let infector = population.random_infected_neighbor(infectee, rng)?;
        Some((infector, population.infected_degree(infectee)))
    }
}
