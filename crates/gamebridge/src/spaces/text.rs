//! Text observation space for games that only expose string observations

use super::Space;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Bounded-length text space
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    pub min_length: usize,
    pub max_length: usize,
    shape: Vec<usize>,
}

impl Text {
    pub fn new(max_length: usize) -> Self {
        Self::with_bounds(0, max_length)
    }

    pub fn with_bounds(min_length: usize, max_length: usize) -> Self {
        assert!(min_length <= max_length, "min_length must not exceed max_length");
        Self {
            min_length,
            max_length,
            shape: Vec::new(),
        }
    }
}

impl Space for Text {
    type Sample = String;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        let len = rng.gen_range(self.min_length..=self.max_length);
        (0..len).map(|_| rng.sample(Alphanumeric) as char).collect()
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        let len = value.chars().count();
        len >= self.min_length && len <= self.max_length
    }

    fn shape(&self) -> &[usize] {
        &self.shape
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_text_bounds() {
        let space = Text::with_bounds(1, 4);
        assert!(space.contains(&"ab".to_string()));
        assert!(!space.contains(&String::new()));
        assert!(!space.contains(&"abcde".to_string()));

        let mut rng = rand::rngs::StdRng::seed_from_u64(5);
        for _ in 0..20 {
            assert!(space.contains(&space.sample(&mut rng)));
        }
    }
}
