//! Box (continuous) observation/action space

use super::Space;
use ndarray::{ArrayD, IxDyn};
use rand::Rng;
use rand_distr::{Distribution, Exp1, StandardNormal, Uniform};

/// Element type carried by a box space.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DType {
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Bool,
    /// A dtype the Space Adapter does not know how to bound
    Other(String),
}

impl DType {
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::UInt8
                | DType::UInt16
                | DType::UInt32
                | DType::UInt64
        )
    }

    /// Natural `(min, max)` range of the dtype, `None` for unknown dtypes.
    pub fn natural_range(&self) -> Option<(f64, f64)> {
        let range = match self {
            DType::Float32 | DType::Float64 => (f64::NEG_INFINITY, f64::INFINITY),
            DType::Int8 => (i8::MIN as f64, i8::MAX as f64),
            DType::Int16 => (i16::MIN as f64, i16::MAX as f64),
            DType::Int32 => (i32::MIN as f64, i32::MAX as f64),
            DType::Int64 => (i64::MIN as f64, i64::MAX as f64),
            DType::UInt8 => (0.0, u8::MAX as f64),
            DType::UInt16 => (0.0, u16::MAX as f64),
            DType::UInt32 => (0.0, u32::MAX as f64),
            DType::UInt64 => (0.0, u64::MAX as f64),
            DType::Bool => (0.0, 1.0),
            DType::Other(_) => return None,
        };
        Some(range)
    }
}

/// Box space for real-valued arrays with per-element bounds
#[derive(Clone, Debug, PartialEq)]
pub struct Box {
    /// Lower bound for each element
    pub low: ArrayD<f64>,
    /// Upper bound for each element
    pub high: ArrayD<f64>,
    /// Element type
    pub dtype: DType,
    /// Shape of the space
    shape: Vec<usize>,
}

impl Box {
    /// Create a new box space with given bounds
    pub fn new(low: ArrayD<f64>, high: ArrayD<f64>, dtype: DType) -> Self {
        assert_eq!(
            low.shape(),
            high.shape(),
            "Low and high must have same shape"
        );
        let shape = low.shape().to_vec();
        Self {
            low,
            high,
            dtype,
            shape,
        }
    }

    /// Create a box space with uniform bounds
    pub fn uniform(shape: &[usize], low: f64, high: f64, dtype: DType) -> Self {
        let low_arr = ArrayD::from_elem(IxDyn(shape), low);
        let high_arr = ArrayD::from_elem(IxDyn(shape), high);
        Self::new(low_arr, high_arr, dtype)
    }

    /// Create a float box space from -inf to +inf (unbounded)
    pub fn unbounded(shape: &[usize]) -> Self {
        Self::uniform(shape, f64::NEG_INFINITY, f64::INFINITY, DType::Float64)
    }

    /// Whether every element has finite bounds on both sides
    pub fn is_bounded(&self) -> bool {
        self.low.iter().all(|l| l.is_finite()) && self.high.iter().all(|h| h.is_finite())
    }

    fn sample_element<R: Rng>(&self, rng: &mut R, low: f64, high: f64) -> f64 {
        let value: f64 = match (low.is_finite(), high.is_finite()) {
            (true, true) if low == high => low,
            (true, true) => Uniform::new_inclusive(low, high).sample(rng),
            (true, false) => {
                let offset: f64 = Exp1.sample(rng);
                low + offset
            }
            (false, true) => {
                let offset: f64 = Exp1.sample(rng);
                high - offset
            }
            (false, false) => StandardNormal.sample(rng),
        };
        if self.dtype.is_integer() || self.dtype == DType::Bool {
            value.floor().clamp(low, high)
        } else {
            value
        }
    }
}

impl Space for Box {
    type Sample = ArrayD<f64>;

    fn sample<R: Rng>(&self, rng: &mut R) -> Self::Sample {
        let mut result = ArrayD::zeros(IxDyn(&self.shape));
        for ((&l, &h), r) in self.low.iter().zip(self.high.iter()).zip(result.iter_mut()) {
            *r = self.sample_element(rng, l, h);
        }
        result
    }

    fn contains(&self, value: &Self::Sample) -> bool {
        if value.shape() != self.low.shape() {
            return false;
        }
        value
            .iter()
            .zip(self.low.iter())
            .zip(self.high.iter())
            .all(|((&v, &l), &h)| v >= l && v <= h)
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
    fn test_box_sample() {
        let space = Box::uniform(&[3, 4], -1.0, 1.0, DType::Float32);
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let sample = space.sample(&mut rng);
            assert!(space.contains(&sample));
            assert_eq!(sample.shape(), &[3, 4]);
        }
    }

    #[test]
    fn test_box_contains() {
        let space = Box::uniform(&[2], 0.0, 1.0, DType::Float64);
        let valid = ArrayD::from_shape_vec(IxDyn(&[2]), vec![0.5, 0.5]).unwrap();
        let invalid = ArrayD::from_shape_vec(IxDyn(&[2]), vec![1.5, 0.5]).unwrap();

        assert!(space.contains(&valid));
        assert!(!space.contains(&invalid));
    }

    #[test]
    fn test_unbounded_sample_is_finite() {
        let space = Box::unbounded(&[8]);
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let sample = space.sample(&mut rng);
        assert!(sample.iter().all(|v| v.is_finite()));
        assert!(space.contains(&sample));
        assert!(!space.is_bounded());
    }

    #[test]
    fn test_half_bounded_integer_sample() {
        let space = Box::uniform(&[16], 0.0, f64::INFINITY, DType::Int32);
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        let sample = space.sample(&mut rng);
        assert!(sample.iter().all(|v| *v >= 0.0 && v.fract() == 0.0));
    }

    #[test]
    fn test_natural_ranges() {
        assert_eq!(DType::UInt8.natural_range(), Some((0.0, 255.0)));
        assert_eq!(DType::Int8.natural_range(), Some((-128.0, 127.0)));
        assert_eq!(DType::Bool.natural_range(), Some((0.0, 1.0)));
        assert_eq!(DType::Other("complex64".into()).natural_range(), None);
    }
}
