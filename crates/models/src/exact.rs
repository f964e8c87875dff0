//! Exact continuous-time event generation.

use crate::propensity::{rebuild_recoveries, NeighborPropensity};
use crate::ModelError;
use fastsir_core::{ContagionError, EventGenerator, Population};
use fastsir_sampling::WeightedEventSet;
use fastsir_types::{Event, Node};
use rand::Rng;

/// Gillespie-style generator producing one event per step.
///
/// A susceptible node with `k` infected neighbors gets infected at rate
/// `infection_rate[k]`; every infected node recovers at `recovery_rate`.
#[derive(Debug, Clone)]
pub struct ExactGenerator {
    recovery_rate: f64,
    infections: NeighborPropensity,
    recoveries: WeightedEventSet<Node>,
}

impl ExactGenerator {
    /// Build a generator from a recovery rate and a per-degree infection
    /// rate table. A degree beyond the end of the table is an error at
    /// lookup time.
    pub fn new(recovery_rate: f64, infection_rate: Vec<f64>) -> Result<Self, ModelError> {
        if !recovery_rate.is_finite() || recovery_rate < 0.0 {
            return Err(ModelError::InvalidRecoveryRate(recovery_rate));
        }
        for (degree, &rate) in infection_rate.iter().enumerate() {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ModelError::InvalidInfectionRate { degree, rate });
            }
        }

        Ok(Self {
            recovery_rate,
            infections: NeighborPropensity::new(infection_rate)?,
            recoveries: WeightedEventSet::unit(),
        })
    }

    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    pub fn infection_rate(&self) -> &[f64] {
        self.infections.table()
    }

    /// Susceptible nodes with positive infection rate.
    pub fn infection_events(&self) -> &WeightedEventSet<Node> {
        self.infections.candidates()
    }

    /// Infected nodes, all with unit weight.
    pub fn recovery_events(&self) -> &WeightedEventSet<Node> {
        &self.recoveries
    }

    fn total_rate(&self) -> f64 {
        self.infections.total() + self.recovery_rate * self.recoveries.total_weight()
    }
}

impl EventGenerator for ExactGenerator {
    fn name(&self) -> &'static str {
        "exact"
    }

    fn lifetime(&self, population: &Population) -> f64 {
        if population.number_of_infected() == 0 {
            return f64::INFINITY;
        }
        1.0 / self.total_rate()
    }

    fn next_step<R: Rng + ?Sized>(
        &mut self,
        _population: &Population,
        rng: &mut R,
    ) -> Result<Vec<Event>, ContagionError> {
        let total = self.total_rate();
        if total <= 0.0 {
            return Err(ContagionError::Exhausted);
        }

        let event = if self.infections.total() / total > rng.gen::<f64>() {
            let (node, _) = self
                .infections
                .candidates()
                .sample(rng)
                .ok_or(ContagionError::Exhausted)?;
            Event::infect(node)
        } else {
            let (node, _) = self
                .recoveries
                .sample(rng)
                .ok_or(ContagionError::Exhausted)?;
            Event::recover(node)
        };
        Ok(vec![event])
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
    use fastsir_types::Network;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn star_population(size: usize) -> (Population, ExactGenerator) {
        let population = Population::new(Network::star(size).into_arc());
        let mut generator = ExactGenerator::new(1.0, vec![0.0, 1.0, 2.0]).unwrap();
        generator.clear(&population).unwrap();
        (population, generator)
    }

    #[test]
    fn test_rejects_invalid_rates() {
        assert_eq!(
            ExactGenerator::new(-1.0, vec![0.0]).unwrap_err(),
            ModelError::InvalidRecoveryRate(-1.0)
        );
        assert_eq!(
            ExactGenerator::new(1.0, vec![0.0, f64::INFINITY]).unwrap_err(),
            ModelError::InvalidInfectionRate {
                degree: 1,
                rate: f64::INFINITY
            }
        );
    }

    #[test]
    fn test_center_infection_rates_leaves() {
        let (mut population, mut generator) = star_population(5);
        assert!(generator.lifetime(&population).is_infinite());

        generator.infect(&mut population, 0).unwrap();

        // Four leaves at rate 1 plus one recovery at rate 1.
        assert_eq!(generator.infection_events().len(), 4);
        assert_eq!(generator.infection_events().total_weight(), 4.0);
        assert_eq!(generator.recovery_events().len(), 1);
        assert_eq!(generator.lifetime(&population), 0.2);

        generator.recover(&mut population, 0).unwrap();
        assert!(generator.infection_events().is_empty());
        assert!(generator.recovery_events().is_empty());
        assert!(generator.lifetime(&population).is_infinite());
    }

    #[test]
    fn test_next_step_does_not_mutate() {
        let (mut population, mut generator) = star_population(5);
        generator.infect(&mut population, 0).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        for _ in 0..50 {
            let events = generator.next_step(&population, &mut rng).unwrap();
            assert_eq!(events.len(), 1);
            match events[0].action {
                fastsir_types::Action::Infect => assert_ne!(events[0].node, 0),
                fastsir_types::Action::Recover => assert_eq!(events[0].node, 0),
            }
        }
        assert_eq!(population.number_of_infected(), 1);
    }

    #[test]
    fn test_double_infect_leaves_sets_untouched() {
        let (mut population, mut generator) = star_population(3);
        generator.infect(&mut population, 1).unwrap();
        assert_eq!(
            generator.infect(&mut population, 1),
            Err(ContagionError::NotSusceptible(1))
        );
        assert_eq!(generator.recovery_events().len(), 1);
        assert_eq!(
            generator.recover(&mut population, 2),
            Err(ContagionError::NotInfected(2))
        );
    }

    #[test]
    fn test_exhausted_without_events() {
        let (population, mut generator) = star_population(3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            generator.next_step(&population, &mut rng),
            Err(ContagionError::Exhausted)
        );
    }
}
