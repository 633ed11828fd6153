//! Observation and action space types.
//!
//! Provides Gymnasium-compatible space definitions plus the Space Adapter
//! (`convert`) that maps foreign structured specs onto them.

mod r#box;
mod convert;
mod dict;
mod discrete;
mod text;
mod tuple;

pub use convert::{action_space_for, observation_space_for, spec_to_space, Spec, MAX_TEXT_LENGTH};
pub use dict::Dict;
pub use discrete::Discrete;
pub use r#box::{Box, DType};
pub use text::Text;
pub use tuple::Tuple;

use crate::env::Observation;
use rand::Rng;

/// Trait for observation and action spaces
pub trait Space: Clone + Send + Sync {
    /// The type of samples from this space
    type Sample;

    /// Sample a random element from this space
    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample;

    /// Check if a value is contained in this space
    fn contains(&self, value: &Self::Sample) -> bool;

    /// Get the shape of samples from this space
    fn shape(&self) -> &[usize];

    /// Get the total number of elements in a sample
    fn num_elements(&self) -> usize {
        self.shape().iter().product()
    }
}

/// Enum for dynamic space types
#[derive(Clone, Debug, PartialEq)]
pub enum DynSpace {
    Discrete(Discrete),
    Box(Box),
    Dict(Dict),
    Tuple(Tuple),
    Text(Text),
}

impl DynSpace {
    /// Get the shape of this space
    pub fn shape(&self) -> Vec<usize> {
        match self {
            DynSpace::Discrete(s) => s.shape().to_vec(),
            DynSpace::Box(s) => s.shape().to_vec(),
            DynSpace::Dict(s) => s.shape().to_vec(),
            DynSpace::Tuple(s) => s.shape().to_vec(),
            DynSpace::Text(s) => s.shape().to_vec(),
        }
    }

    /// Sample a structured observation/action value from this space
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Observation {
        match self {
            DynSpace::Discrete(s) => Observation::Discrete(s.sample(rng)),
            DynSpace::Box(s) => Observation::Array(s.sample(rng).mapv(|v| v as f32)),
            DynSpace::Dict(s) => Observation::Dict(
                s.spaces
                    .iter()
                    .map(|(k, v)| (k.clone(), v.sample(rng)))
                    .collect(),
            ),
            DynSpace::Tuple(s) => {
                Observation::Tuple(s.spaces.iter().map(|v| v.sample(rng)).collect())
            }
            DynSpace::Text(s) => Observation::Text(s.sample(rng)),
        }
    }

    /// Sample a legal discrete action under an action mask.
    ///
    /// Returns `None` for non-discrete spaces and for masks with no legal entry.
    pub fn sample_masked<R: Rng>(&self, rng: &mut R, mask: &[i8]) -> Option<usize> {
        match self {
            DynSpace::Discrete(s) => s.sample_masked(rng, mask),
            _ => None,
        }
    }

    /// Check if this space contains the value
    pub fn contains(&self, value: &Observation) -> bool {
        match (self, value) {
            (DynSpace::Discrete(s), Observation::Discrete(v)) => s.contains(v),
            (DynSpace::Box(s), Observation::Array(arr)) => s.contains(&arr.mapv(f64::from)),
            (DynSpace::Dict(s), Observation::Dict(map)) => {
                map.len() == s.spaces.len()
                    && s.spaces
                        .iter()
                        .all(|(k, space)| map.get(k).is_some_and(|v| space.contains(v)))
            }
            (DynSpace::Tuple(s), Observation::Tuple(items)) => {
                items.len() == s.spaces.len()
                    && s.spaces
                        .iter()
                        .zip(items)
                        .all(|(space, v)| space.contains(v))
            }
            (DynSpace::Text(s), Observation::Text(text)) => s.contains(text),
            _ => false,
        }
    }

    /// The discrete space, if this is one
    pub fn as_discrete(&self) -> Option<&Discrete> {
        match self {
            DynSpace::Discrete(s) => Some(s),
            _ => None,
        }
    }
}
