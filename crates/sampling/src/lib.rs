//! Weighted event set for fastsir.
//!
//! A [`WeightedEventSet`] maps keys to positive weights and draws keys with
//! probability proportional to their weight. Insert, erase and weight
//! updates are O(1); sampling is O(number of weight groups) plus an
//! expected constant number of rejection rounds.
//!
//! # Design
//!
//! Weights are binned into groups whose bounds grow by powers of two from
//! the set's minimum weight. Sampling first picks a group proportionally to
//! its total weight, then picks a member uniformly and accepts it with
//! probability `weight / group_ceiling`. Every member weight is at least half
//! its group ceiling, so each round accepts with probability at least 1/2.

mod error;
mod set;

pub use error::SamplingError;
pub use set::WeightedEventSet;
