//! Dict (dictionary) observation/action space

use super::{DynSpace, Space};
use crate::env::Observation;
use rand::Rng;
use std::collections::BTreeMap;

/// Dictionary space containing named sub-spaces, iterated in key order
#[derive(Clone, Debug, PartialEq)]
pub struct Dict {
    /// Named sub-spaces
    pub spaces: BTreeMap<String, DynSpace>,
    /// Cached total shape (sum of all sub-space sizes)
    shape: Vec<usize>,
}

impl Dict {
    /// Create a new dict space
    pub fn new(spaces: BTreeMap<String, DynSpace>) -> Self {
        let total: usize = spaces
            .values()
            .map(|s| s.shape().iter().product::<usize>())
            .sum();
        Self {
            spaces,
            shape: vec![total],
        }
    }

    /// Create from a list of (name, space) pairs
    pub fn from_pairs(pairs: Vec<(&str, DynSpace)>) -> Self {
        let spaces = pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
        Self::new(spaces)
    }

    /// Get a sub-space by name
    pub fn get(&self, name: &str) -> Option<&DynSpace> {
        self.spaces.get(name)
    }

    /// Get all space names
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.spaces.keys()
    }
}

impl Space for Dict {
    type Sample = BTreeMap<String, Observation>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        self.spaces
            .iter()
            .map(|(k, v)| (k.clone(), v.sample(rng)))
            .collect()
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        value.len() == self.spaces.len()
            && self
                .spaces
                .iter()
                .all(|(k, space)| value.get(k).is_some_and(|v| space.contains(v)))
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}
