//! Discrete-time event generation with Poisson-approximated infections.

use crate::propensity::{rebuild_recoveries, NeighborPropensity};
use crate::ModelError;
use fastsir_core::{ContagionError, EventGenerator, Population};
use fastsir_sampling::WeightedEventSet;
use fastsir_types::{Event, Node};
use indexmap::IndexSet;
use rand::Rng;
use rand_distr::{Binomial, Distribution, Poisson};
use tracing::trace;

/// Generator advancing the process in unit ticks.
///
/// A susceptible node with `k` infected neighbors gets infected during a
/// tick with probability `infection_probability[k]`, handled through the
/// equivalent propensity `-ln(1 - p)`. Each tick draws the number of
/// recoveries from `Binomial(|I|, recovery_probability)` and the number of
/// infections from `Poisson(total propensity)`, then samples that many nodes
/// with replacement. Repeated draws collapse onto one event, so the realised
/// counts can fall short of the drawn ones.
#[derive(Debug, Clone)]
pub struct DiscreteGenerator {
    recovery_probability: f64,
    infection_probability: Vec<f64>,
    infections: NeighborPropensity,
    recoveries: WeightedEventSet<Node>,
}

impl DiscreteGenerator {
    pub fn new(
        recovery_probability: f64,
        infection_probability: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if !(0.0..=1.0).contains(&recovery_probability) {
            return Err(ModelError::InvalidRecoveryProbability(recovery_probability));
        }
        let mut propensity = Vec::with_capacity(infection_probability.len());
        for (degree, &probability) in infection_probability.iter().enumerate() {
            if !(0.0..1.0).contains(&probability) {
                return Err(ModelError::InvalidInfectionProbability {
                    degree,
                    probability,
                });
            }
            propensity.push(-(1.0 - probability).ln());
        }

        Ok(Self {
            recovery_probability,
            infection_probability,
            infections: NeighborPropensity::new(propensity)?,
            recoveries: WeightedEventSet::unit(),
        })
    }

    pub fn recovery_probability(&self) -> f64 {
        self.recovery_probability
    }

    pub fn infection_probability(&self) -> &[f64] {
        &self.infection_probability
    }

    /// Per-degree propensities derived from the infection probabilities.
    pub fn infection_propensity(&self) -> &[f64] {
        self.infections.table()
    }

    pub fn infection_events(&self) -> &WeightedEventSet<Node> {
        self.infections.candidates()
    }

    pub fn recovery_events(&self) -> &WeightedEventSet<Node> {
        &self.recoveries
    }
}

impl EventGenerator for DiscreteGenerator {
    fn name(&self) -> &'static str {
        "discrete"
    }

    fn lifetime(&self, population: &Population) -> f64 {
        if population.number_of_infected() == 0 {
            f64::INFINITY
        } else {
            1.0
        }
    }

    fn next_step<R: Rng + ?Sized>(
        &mut self,
        population: &Population,
        rng: &mut R,
    ) -> Result<Vec<Event>, ContagionError> {
        if population.number_of_infected() == 0 {
            return Err(ContagionError::Exhausted);
        }

        let binomial = Binomial::new(self.recoveries.len() as u64, self.recovery_probability)
            .map_err(|_| ContagionError::InvalidParameter {
                name: "recovery probability",
                value: self.recovery_probability,
            })?;
        let recovery_draws = binomial.sample(rng);
        let mut recovered = IndexSet::new();
        for _ in 0..recovery_draws {
            if let Some((node, _)) = self.recoveries.sample(rng) {
                recovered.insert(node);
            }
        }

        let total = self.infections.total();
        let mut infected = IndexSet::new();
        if total > 0.0 {
            let poisson = Poisson::new(total).map_err(|_| ContagionError::InvalidParameter {
                name: "total propensity",
                value: total,
            })?;
            let infection_draws = poisson.sample(rng) as u64;
            for _ in 0..infection_draws {
                if let Some((node, _)) = self.infections.candidates().sample(rng) {
                    infected.insert(node);
                }
            }
        }

        trace!(
            recoveries = recovered.len(),
            infections = infected.len(),
            "Sampled tick"
        );

        let events = recovered
            .into_iter()
            .map(Event::recover)
            .chain(infected.into_iter().map(Event::infect))
            .collect();
        Ok(events)
    }

    fn infect(&mut self, population: &mut Population, node: Node) -> Result<(), ContagionError> {
        self.infections.check_infection(population, node)?;
        population.infect(node)?;
        self.infections.remove(node);
        self.infections.refresh_neighbors(population, node)?;
        self.recoveries.insert(node, 1.0)?;
        Ok(())
    }

    fn recover(&mut self, population: &mut Population, node: Node) -> Result<(), ContagionError> {
        population.recover(node)?;
        self.recoveries.erase(&node);
        self.infections.refresh_neighbors(population, node)?;
        Ok(())
    }

    fn clear(&mut self, population: &Population) -> Result<(), ContagionError> {
        self.infections.rebuild(population)?;
        rebuild_recoveries(&mut self.recoveries, population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fastsir_types::{Action, Network};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_propensity_conversion() {
        let generator = DiscreteGenerator::new(0.5, vec![0.0, 0.5, 0.75]).unwrap();
        let propensity = generator.infection_propensity();
        assert_eq!(propensity[0], 0.0);
        assert!((propensity[1] - 2f64.ln()).abs() < 1e-12);
        assert!((propensity[2] - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_probabilities() {
        assert_eq!(
            DiscreteGenerator::new(1.5, vec![0.0]).unwrap_err(),
            ModelError::InvalidRecoveryProbability(1.5)
        );
        assert_eq!(
            DiscreteGenerator::new(0.5, vec![0.0, 1.0]).unwrap_err(),
            ModelError::InvalidInfectionProbability {
                degree: 1,
                probability: 1.0
            }
        );
    }

    #[test]
    fn test_lifetime_is_one_tick() {
        let mut population = Population::new(Network::from_edges(&[(0, 1)]).into_arc());
        let mut generator = DiscreteGenerator::new(0.5, vec![0.0, 0.5]).unwrap();
        generator.clear(&population).unwrap();
        assert!(generator.lifetime(&population).is_infinite());

        generator.infect(&mut population, 0).unwrap();
        assert_eq!(generator.lifetime(&population), 1.0);
    }

    #[test]
    fn test_tick_lists_recoveries_first_without_duplicates() {
        let edges: Vec<_> = (1..40).map(|leaf| (0, leaf)).collect();
        let mut population = Population::new(Network::from_edges(&edges).into_arc());
        let mut generator = DiscreteGenerator::new(0.9, vec![0.0, 0.9]).unwrap();
        generator.clear(&population).unwrap();
        for leaf in 1..20 {
            generator.infect(&mut population, leaf).unwrap();
        }
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        for _ in 0..20 {
            let events = generator.next_step(&population, &mut rng).unwrap();
            let first_infection = events
                .iter()
                .position(|event| event.action == Action::Infect)
                .unwrap_or(events.len());
            assert!(events[first_infection..]
                .iter()
                .all(|event| event.action == Action::Infect));

            let mut nodes: Vec<Node> = events.iter().map(|event| event.node).collect();
            nodes.sort_unstable();
            nodes.dedup();
            assert_eq!(nodes.len(), events.len());
        }
    }

    #[test]
    fn test_certain_recovery() {
        let mut population = Population::new(Network::from_edges(&[(0, 1), (2, 3)]).into_arc());
        let mut generator = DiscreteGenerator::new(1.0, vec![0.0, 0.0]).unwrap();
        generator.clear(&population).unwrap();
        generator.infect(&mut population, 0).unwrap();
        generator.infect(&mut population, 2).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let events = generator.next_step(&population, &mut rng).unwrap();
        assert!(!events.is_empty());
        assert!(events.iter().all(|event| event.action == Action::Recover));
    }
}
