//! Space Adapter: foreign structured specs to spaces.

use super::{Box, DType, Dict, Discrete, DynSpace, Text, Tuple};
use crate::oracle::Game;
use crate::{BridgeError, Result};
use ndarray::{ArrayD, IxDyn};
use std::collections::BTreeMap;
use std::fmt;

/// Longest text observation a string-backed game may produce
pub const MAX_TEXT_LENGTH: usize = 1 << 16;

/// Foreign structured descriptor of an observation or action.
#[derive(Clone, Debug, PartialEq)]
pub enum Spec {
    /// Numeric array bounded only by its dtype
    Array { shape: Vec<usize>, dtype: DType },
    /// Numeric array with explicit bounds. Bounds hold either one scalar or
    /// one value per element.
    BoundedArray {
        shape: Vec<usize>,
        dtype: DType,
        minimum: Vec<f64>,
        maximum: Vec<f64>,
    },
    /// Scalar integer in `0..num_values`
    DiscreteArray { num_values: usize },
    Dict(Vec<(String, Spec)>),
    Tuple(Vec<Spec>),
    /// Anything this adapter has no mapping for
    Other(String),
}

impl fmt::Display for Spec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Spec::Array { shape, dtype } => write!(f, "Array(shape={shape:?}, dtype={dtype:?})"),
            Spec::BoundedArray { shape, dtype, .. } => {
                write!(f, "BoundedArray(shape={shape:?}, dtype={dtype:?})")
            }
            Spec::DiscreteArray { num_values } => {
                write!(f, "DiscreteArray(num_values={num_values})")
            }
            Spec::Dict(items) => {
                let keys: Vec<&str> = items.iter().map(|(k, _)| k.as_str()).collect();
                write!(f, "Dict(keys={keys:?})")
            }
            Spec::Tuple(items) => write!(f, "Tuple(len={})", items.len()),
            Spec::Other(name) => f.write_str(name),
        }
    }
}

fn unsupported(spec: &Spec, reason: impl Into<String>) -> BridgeError {
    BridgeError::UnsupportedSpec {
        spec: spec.to_string(),
        reason: reason.into(),
    }
}

fn bounds(spec: &Spec, shape: &[usize], values: &[f64]) -> Result<ArrayD<f64>> {
    let size: usize = shape.iter().product();
    match values.len() {
        1 => Ok(ArrayD::from_elem(IxDyn(shape), values[0])),
        n if n == size => ArrayD::from_shape_vec(IxDyn(shape), values.to_vec())
            .map_err(|e| unsupported(spec, e.to_string())),
        n => Err(unsupported(
            spec,
            format!("{n} bound values cannot broadcast to shape {shape:?}"),
        )),
    }
}

/// Convert a foreign spec into the equivalent space.
pub fn spec_to_space(spec: &Spec) -> Result<DynSpace> {
    match spec {
        Spec::Array { shape, dtype } => {
            let (low, high) = dtype
                .natural_range()
                .ok_or_else(|| unsupported(spec, "unknown dtype"))?;
            Ok(DynSpace::Box(Box::uniform(shape, low, high, dtype.clone())))
        }
        Spec::BoundedArray {
            shape,
            dtype,
            minimum,
            maximum,
        } => {
            if dtype.natural_range().is_none() {
                return Err(unsupported(spec, "unknown dtype"));
            }
            let low = bounds(spec, shape, minimum)?;
            let high = bounds(spec, shape, maximum)?;
            Ok(DynSpace::Box(Box::new(low, high, dtype.clone())))
        }
        Spec::DiscreteArray { num_values } => {
            if *num_values == 0 {
                return Err(unsupported(spec, "a discrete spec needs at least one value"));
            }
            Ok(DynSpace::Discrete(Discrete::new(*num_values)))
        }
        Spec::Dict(items) => {
            let mut spaces = BTreeMap::new();
            for (key, item) in items {
                spaces.insert(key.clone(), spec_to_space(item)?);
            }
            Ok(DynSpace::Dict(Dict::new(spaces)))
        }
        Spec::Tuple(items) => {
            let spaces: Vec<DynSpace> = items.iter().map(spec_to_space).collect::<Result<_>>()?;
            Ok(DynSpace::Tuple(Tuple::new(spaces)))
        }
        Spec::Other(_) => Err(unsupported(spec, "no space corresponds to this spec")),
    }
}

/// Observation space of a game, taken from the richest representation it
/// provides: observation tensor, then information-state tensor, then either
/// string form.
pub fn observation_space_for(game: &dyn Game) -> Result<DynSpace> {
    let game_type = game.game_type();
    if game_type.provides_observation_tensor {
        return Ok(tensor_space(&game.observation_tensor_shape()));
    }
    if game_type.provides_information_state_tensor {
        return Ok(tensor_space(&game.information_state_tensor_shape()));
    }
    if game_type.provides_observation_string || game_type.provides_information_state_string {
        return Ok(DynSpace::Text(Text::new(MAX_TEXT_LENGTH)));
    }
    Err(BridgeError::UnsupportedSpec {
        spec: format!("observation of game '{}'", game.name()),
        reason: "the game provides neither tensor nor string observations".into(),
    })
}

/// Unbounded box matching the `f32` tensors games write
fn tensor_space(shape: &[usize]) -> DynSpace {
    let space = Box::uniform(shape, f64::NEG_INFINITY, f64::INFINITY, DType::Float32);
    DynSpace::Box(space)
}

/// Action space of a game: one discrete value per distinct action
pub fn action_space_for(game: &dyn Game) -> Result<DynSpace> {
    let n = game.num_distinct_actions().map_err(|e| BridgeError::UnsupportedSpec {
        spec: format!("actions of game '{}'", game.name()),
        reason: e.to_string(),
    })?;
    if n == 0 {
        return Err(BridgeError::UnsupportedSpec {
            spec: format!("actions of game '{}'", game.name()),
            reason: "the game declares no distinct actions".into(),
        });
    }
    Ok(DynSpace::Discrete(Discrete::new(n)))
}
