//! Tuple observation/action space

use super::{DynSpace, Space};
use crate::env::Observation;
use rand::Rng;

/// Tuple space containing an ordered list of sub-spaces
#[derive(Clone, Debug, PartialEq)]
pub struct Tuple {
    /// Ordered sub-spaces
    pub spaces: Vec<DynSpace>,
    /// Cached total shape
    shape: Vec<usize>,
}

impl Tuple {
    /// Create a new tuple space
    pub fn new(spaces: Vec<DynSpace>) -> Self {
        let total: usize = spaces
            .iter()
            .map(|s| s.shape().iter().product::<usize>())
            .sum();
        Self {
            spaces,
            shape: vec![total],
        }
    }
}

impl Space for Tuple {
    type Sample = Vec<Observation>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        self.spaces.iter().map(|s| s.sample(rng)).collect()
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        if value.len() != self.spaces.len() {
            return false;
        }
        value
            .iter()
            .zip(self.spaces.iter())
            .all(|(v, s)| s.contains(v))
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}
