//! Discrete action/observation space

use super::Space;
use rand::seq::SliceRandom;
use rand::Rng;

/// Discrete space with n possible values: {0, 1, ..., n-1}
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Discrete {
    /// Number of possible values
    pub n: usize,
    /// Cached shape
    shape: Vec<usize>,
}

impl Discrete {
    /// Create a new discrete space with n values
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "Discrete space must have at least 1 element");
        Self { n, shape: vec![1] }
    }

    /// Sample uniformly among the values whose mask entry is 1.
    ///
    /// Entries past the end of the mask count as illegal.
    pub fn sample_masked<R: Rng>(&self, rng: &mut R, mask: &[i8]) -> Option<usize> {
        let legal: Vec<usize> = mask
            .iter()
            .take(self.n)
            .enumerate()
            .filter(|(_, &m)| m == 1)
            .map(|(i, _)| i)
            .collect();
        legal.choose(rng).copied()
    }
}

impl Space for Discrete {
    type Sample = usize;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        rng.gen_range(0..self.n)
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        *value < self.n
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn num_elements(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_discrete_sample() {
        let space = Discrete::new(4);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let sample = space.sample(&mut rng);
            assert!(space.contains(&sample));
            assert!(sample < 4);
        }
    }

    #[test]
    fn test_discrete_contains() {
        let space = Discrete::new(5);
        assert!(space.contains(&0));
        assert!(space.contains(&4));
        assert!(!space.contains(&5));
    }

    #[test]
    fn test_masked_sample_only_hits_legal_actions() {
        let space = Discrete::new(5);
        let mask = [0, 1, 0, 1, 0];
        let mut rng = rand::rngs::StdRng::seed_from_u64(9);

        for _ in 0..50 {
            let action = space.sample_masked(&mut rng, &mask).unwrap();
            assert!(action == 1 || action == 3);
        }
    }

    #[test]
    fn test_masked_sample_empty_mask() {
        let space = Discrete::new(3);
        let mut rng = rand::rngs::StdRng::seed_from_u64(0);
        assert_eq!(space.sample_masked(&mut rng, &[0, 0, 0]), None);
        assert_eq!(space.sample_masked(&mut rng, &[]), None);
    }
}
