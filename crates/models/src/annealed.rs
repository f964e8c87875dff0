//! Mean-field (annealed) continuous-time event generation.

use crate::propensity::rebuild_recoveries;
use crate::ModelError;
use fastsir_core::{ContagionError, EventGenerator, Population};
use fastsir_sampling::WeightedEventSet;
use fastsir_types::{Event, InfectedDegree, Node};
use rand::Rng;

/// Generator for a degree-regular network rewired at every instant.
///
/// Every susceptible node sees `degree` neighbors, each infected
/// independently with probability `ρ = |I| / N`, so all susceptible nodes
/// share the infection rate
///
/// ```text
/// Σ_{i=0}^{d} C(d, i) ρ^i (1 − ρ)^(d − i) rate[i]
/// ```
///
/// recomputed after every infection and recovery. No contact structure is
/// stored: the engine runs on a star graph used only for its node count.
#[derive(Debug, Clone)]
pub struct AnnealedGenerator {
    degree: usize,
    recovery_rate: f64,
    infection_rate: Vec<f64>,
    binomial_coefficients: Vec<f64>,
    mean_field_rate: f64,
    susceptibles: WeightedEventSet<Node>,
    recoveries: WeightedEventSet<Node>,
}

impl AnnealedGenerator {
    /// `infection_rate` needs at least `degree + 1` entries.
    pub fn new(
        degree: usize,
        recovery_rate: f64,
        infection_rate: Vec<f64>,
    ) -> Result<Self, ModelError> {
        if !recovery_rate.is_finite() || recovery_rate < 0.0 {
            return Err(ModelError::InvalidRecoveryRate(recovery_rate));
        }
        if infection_rate.len() <= degree {
            return Err(ModelError::TableTooShort {
                len: infection_rate.len(),
                degree,
            });
        }
        for (degree, &rate) in infection_rate.iter().enumerate() {
            if !rate.is_finite() || rate < 0.0 {
                return Err(ModelError::InvalidInfectionRate { degree, rate });
            }
        }

        Ok(Self {
            degree,
            recovery_rate,
            infection_rate,
            binomial_coefficients: binomial_coefficients(degree),
            mean_field_rate: 0.0,
            susceptibles: WeightedEventSet::unit(),
            recoveries: WeightedEventSet::unit(),
        })
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    pub fn infection_rate(&self) -> &[f64] {
        &self.infection_rate
    }

    /// Infection rate currently shared by every susceptible node.
    pub fn mean_field_rate(&self) -> f64 {
        self.mean_field_rate
    }

    /// Every susceptible node, with unit weight.
    pub fn infection_events(&self) -> &WeightedEventSet<Node> {
        &self.susceptibles
    }

    pub fn recovery_events(&self) -> &WeightedEventSet<Node> {
        &self.recoveries
    }

    fn infection_total(&self) -> f64 {
        self.mean_field_rate * self.susceptibles.total_weight()
    }

    fn total_rate(&self) -> f64 {
        self.infection_total() + self.recovery_rate * self.recoveries.total_weight()
    }

    fn update_mean_field_rate(&mut self, population: &Population) {
        let prevalence = match population.size() {
            0 => 0.0,
            size => population.number_of_infected() as f64 / size as f64,
        };
        let d = self.degree as i32;
        self.mean_field_rate = self
            .binomial_coefficients
            .iter()
            .zip(&self.infection_rate)
            .enumerate()
            .map(|(i, (coefficient, rate))| {
                let i = i as i32;
                coefficient * prevalence.powi(i) * (1.0 - prevalence).powi(d - i) * rate
            })
            .sum();
    }
}

/// `C(degree, i)` for `i` in `0..=degree`, built row-wise in floating point.
fn binomial_coefficients(degree: usize) -> Vec<f64> {
    let mut coefficients = Vec::with_capacity(degree + 1);
    let mut current = 1.0;
    coefficients.push(current);
    for i in 1..=degree {
        current = current * (degree + 1 - i) as f64 / i as f64;
        coefficients.push(current);
    }
    coefficients
}

impl EventGenerator for AnnealedGenerator {
    fn name(&self) -> &'static str {
        "annealed"
    }

    fn tracks_contacts(&self) -> bool {
        false
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

        let event = if self.infection_total() / total > rng.gen::<f64>() {
            let (node, _) = self
                .susceptibles
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
        population.infect(node)?;
        self.susceptibles.erase(&node);
        self.recoveries.insert(node, 1.0)?;
        self.update_mean_field_rate(population);
        Ok(())
    }

    fn recover(&mut self, population: &mut Population, node: Node) -> Result<(), ContagionError> {
        population.recover(node)?;
        self.recoveries.erase(&node);
        self.update_mean_field_rate(population);
        Ok(())
    }

    fn clear(&mut self, population: &Population) -> Result<(), ContagionError> {
        self.susceptibles.clear();
        for node in population.network().nodes() {
            if population.is_susceptible(node) {
                self.susceptibles.insert(node, 1.0)?;
            }
        }
        rebuild_recoveries(&mut self.recoveries, population)?;
        self.update_mean_field_rate(population);
        Ok(())
    }

    /// Contacts are not stored, so the infector is any infected node and the
    /// infected degree is the expected one, `d·ρ`, rounded and at least one.
    fn choose_infector<R: Rng + ?Sized>(
        &self,
        population: &Population,
        _infectee: Node,
        rng: &mut R,
    ) -> Option<(Node, InfectedDegree)> {
        let infector = population.random_infected(rng)?;
        let prevalence = population.number_of_infected() as f64 / population.size() as f64;
        let infected_degree = ((self.degree as f64 * prevalence).round() as usize).max(1);
        Some((infector, infected_degree))
    }
}
