//! Composition-rejection weighted set.

use crate::SamplingError;
use indexmap::IndexMap;
use rand::Rng;
use std::collections::HashMap;
use std::hash::Hash;

/// Members whose weights fall in `[floor, ceiling)`.
#[derive(Debug, Clone)]
struct WeightGroup<T> {
    /// Member weights, indexable for uniform picks.
    members: IndexMap<T, f64>,
    /// Sum of member weights.
    total: f64,
    /// Upper bound on member weights, used as the rejection envelope.
    ceiling: f64,
}

impl<T: Hash + Eq> WeightGroup<T> {
    fn new(ceiling: f64) -> Self {
        Self {
            members: IndexMap::new(),
            total: 0.0,
            ceiling,
        }
    }

    fn add(&mut self, key: T, weight: f64) {
        self.members.insert(key, weight);
        self.total += weight;
    }

    fn remove(&mut self, key: &T) -> Option<f64> {
        let weight = self.members.swap_remove(key)?;
        if self.members.is_empty() {
            self.total = 0.0;
        } else {
            self.total -= weight;
        }
        Some(weight)
    }
}

/// Dynamic key → weight mapping with proportional sampling.
///
/// Weights must be finite, positive and within the bounds given at
/// construction. Bounds only affect performance through the number of weight
/// groups (`log2(max / min) + 1`), never the sampling distribution.
#[derive(Debug, Clone)]
pub struct WeightedEventSet<T> {
    /// Smallest accepted weight.
    min_weight: f64,
    /// Largest accepted weight.
    max_weight: f64,
    /// Weight groups in increasing order of weight.
    groups: Vec<WeightGroup<T>>,
    /// Group index of every member.
    locations: HashMap<T, usize>,
    /// Sum of all member weights.
    total_weight: f64,
}

impl<T: Copy + Hash + Eq> WeightedEventSet<T> {
    /// Create an empty set accepting weights in `[min_weight, max_weight]`.
    pub fn new(min_weight: f64, max_weight: f64) -> Result<Self, SamplingError> {
        let valid = min_weight.is_finite()
            && max_weight.is_finite()
            && min_weight > 0.0
            && max_weight >= min_weight;
        if !valid {
            return Err(SamplingError::InvalidBounds {
                min: min_weight,
                max: max_weight,
            });
        }

        let group_count = (max_weight / min_weight).log2().floor() as usize + 1;
        let groups = (0..group_count)
            .map(|index| {
                let ceiling = (min_weight * 2f64.powi(index as i32 + 1)).min(max_weight);
                WeightGroup::new(ceiling)
            })
            .collect();

        Ok(Self {
            min_weight,
            max_weight,
            groups,
            locations: HashMap::new(),
            total_weight: 0.0,
        })
    }

    /// Create an empty set where every weight is exactly 1.
    pub fn unit() -> Self {
        Self {
            min_weight: 1.0,
            max_weight: 1.0,
            groups: vec![WeightGroup::new(1.0)],
            locations: HashMap::new(),
            total_weight: 0.0,
        }
    }

    /// Create an empty set whose bounds cover every positive value of
    /// `weights`. Non-positive values are ignored; if none is positive the
    /// set falls back to unit bounds and will simply stay empty.
    pub fn covering(weights: &[f64]) -> Result<Self, SamplingError> {
        let positive = weights.iter().copied().filter(|w| *w > 0.0);
        let min = positive.clone().fold(f64::INFINITY, f64::min);
        let max = positive.fold(0.0, f64::max);
        if max > 0.0 {
            Self::new(min, max)
        } else {
            Ok(Self::unit())
        }
    }

    /// Smallest accepted weight.
    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    /// Largest accepted weight.
    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether the set has no members.
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Sum of all member weights.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Whether `key` is a member.
    pub fn contains(&self, key: &T) -> bool {
        self.locations.contains_key(key)
    }

    /// Weight of `key`, if present.
    pub fn weight(&self, key: &T) -> Option<f64> {
        let group = *self.locations.get(key)?;
        self.groups[group].members.get(key).copied()
    }

    /// Insert `key` with `weight`.
    ///
    /// Returns `Ok(false)` and leaves the set unchanged if `key` is already a
    /// member; use [`set_weight`](Self::set_weight) to update it.
    pub fn insert(&mut self, key: T, weight: f64) -> Result<bool, SamplingError> {
        self.check_weight(weight)?;
        if self.locations.contains_key(&key) {
            return Ok(false);
        }
        self.place(key, weight);
        Ok(true)
    }

    /// Insert `key` or overwrite its weight.
    pub fn set_weight(&mut self, key: T, weight: f64) -> Result<(), SamplingError> {
        self.check_weight(weight)?;
        self.erase(&key);
        self.place(key, weight);
        Ok(())
    }

    /// Remove `key`, returning its weight if it was a member.
    pub fn erase(&mut self, key: &T) -> Option<f64> {
        let group = self.locations.remove(key)?;
        let weight = self.groups[group].remove(key)?;
        if self.locations.is_empty() {
            self.total_weight = 0.0;
        } else {
            self.total_weight -= weight;
        }
        Some(weight)
    }

    /// Remove every member. Totals restart from exactly zero.
    pub fn clear(&mut self) {
        for group in &mut self.groups {
            group.members.clear();
            group.total = 0.0;
        }
        self.locations.clear();
        self.total_weight = 0.0;
    }

    /// Iterate over `(key, weight)` pairs in no particular order.
    #[cfg(test)]
    fn iter(&self) -> impl Iterator<Item = (T, f64)> + '_ {
        self.groups
            .iter()
            .flat_map(|group| group.members.iter().map(|(key, weight)| (*key, *weight)))
    }

    /// Draw a member with probability proportional to its weight.
    ///
    /// Returns `None` when the set is empty.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(T, f64)> {
        if self.is_empty() {
            return None;
        }

        let group = self.pick_group(rng)?;
        loop {
            let index = rng.gen_range(0..group.members.len());
            let (key, weight) = group.members.get_index(index)?;
            if rng.gen::<f64>() * group.ceiling < *weight {
                return Some((*key, *weight));
            }
        }
    }

    fn pick_group<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&WeightGroup<T>> {
        let mut remaining = rng.gen::<f64>() * self.total_weight;
        let mut last_non_empty = None;
        for group in &self.groups {
            if group.members.is_empty() {
                continue;
            }
            if remaining < group.total {
                return Some(group);
            }
            remaining -= group.total;
            last_non_empty = Some(group);
        }
        // Accumulated rounding can leave `remaining` just past the last group.
        last_non_empty
    }

    fn check_weight(&self, weight: f64) -> Result<(), SamplingError> {
        if !weight.is_finite() || weight <= 0.0 {
            return Err(SamplingError::InvalidWeight(weight));
        }
        if weight < self.min_weight || weight > self.max_weight {
            return Err(SamplingError::WeightOutOfBounds {
                weight,
                min: self.min_weight,
                max: self.max_weight,
            });
        }
        Ok(())
    }

    fn place(&mut self, key: T, weight: f64) {
        let group = self.group_index(weight);
        self.groups[group].add(key, weight);
        self.locations.insert(key, group);
        self.total_weight += weight;
    }

    fn group_index(&self, weight: f64) -> usize {
        let index = (weight / self.min_weight).log2().floor();
        (index.max(0.0) as usize).min(self.groups.len() - 1)
    }
}
