//! Core environment types and the single-agent trait.

use crate::spaces::DynSpace;
use crate::Result;
use ndarray::{Array1, ArrayD};
use std::collections::BTreeMap;

/// Information returned alongside observations
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvInfo {
    /// 0/1 indicator over the action space marking legal actions
    pub action_mask: Option<Array1<i8>>,
    /// Episode return (if done)
    pub episode_return: Option<f64>,
    /// Episode length (if done)
    pub episode_length: Option<u32>,
    /// Custom metrics (kept minimal)
    pub extra: smallvec::SmallVec<[(&'static str, f64); 4]>,
}

impl EnvInfo {
    /// Create empty info
    pub fn new() -> Self {
        Self::default()
    }

    /// Info carrying only an action mask
    pub fn with_action_mask(mask: Array1<i8>) -> Self {
        Self {
            action_mask: Some(mask),
            ..Self::default()
        }
    }

    /// Add episode stats
    pub fn with_episode_stats(mut self, ret: f64, len: u32) -> Self {
        self.episode_return = Some(ret);
        self.episode_length = Some(len);
        self
    }

    /// Add a custom metric
    pub fn with_extra(mut self, key: &'static str, value: f64) -> Self {
        self.extra.push((key, value));
        self
    }

    /// The action mask as a slice; empty when the info carries none
    pub fn action_mask(&self) -> &[i8] {
        self.action_mask
            .as_ref()
            .and_then(|m| m.as_slice())
            .unwrap_or(&[])
    }

    /// Get a value by key (including defaults)
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "episode_return" => self.episode_return,
            "episode_length" => self.episode_length.map(f64::from),
            _ => self.extra.iter().find(|(k, _)| k == &key).map(|(_, v)| *v),
        }
    }
}

/// Structured observation (or action) value
#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    /// Numeric array
    Array(ArrayD<f32>),
    /// Discrete index
    Discrete(usize),
    /// Textual observation
    Text(String),
    /// Dictionary of observations, in key order
    Dict(BTreeMap<String, Observation>),
    /// Tuple of observations
    Tuple(Vec<Observation>),
}

impl Observation {
    pub fn as_array(&self) -> Option<&ArrayD<f32>> {
        match self {
            Observation::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Observation::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Actions share the structured value representation of observations
pub type Action = Observation;

/// Result from a single environment step
#[derive(Clone, Debug, PartialEq)]
pub struct StepResult {
    /// Observation after the step
    pub observation: Observation,
    /// Reward received
    pub reward: f64,
    /// Whether episode terminated (goal reached, failure, etc.)
    pub terminated: bool,
    /// Whether episode truncated (time limit, etc.)
    pub truncated: bool,
    /// Additional info
    pub info: EnvInfo,
}

impl StepResult {
    /// Check if episode is done (terminated or truncated)
    pub fn done(&self) -> bool {
        self.terminated || self.truncated
    }
}

/// Single-agent step/reset environment.
///
/// # Example
///
/// ```rust,ignore
/// use gamebridge::env::{GymEnv, Observation, StepResult, EnvInfo};
/// use gamebridge::spaces::{Discrete, DynSpace};
///
/// impl GymEnv for MyEnv {
///     fn observation_space(&self) -> DynSpace { self.obs_space.clone() }
///     fn action_space(&self) -> DynSpace { DynSpace::Discrete(Discrete::new(2)) }
///     fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, EnvInfo)> { ... }
///     fn step(&mut self, action: &Action) -> Result<StepResult> { ... }
/// }
/// ```
pub trait GymEnv: Send {
    /// Get the observation space
    fn observation_space(&self) -> DynSpace;

    /// Get the action space
    fn action_space(&self) -> DynSpace;

    /// Reset the environment to initial state
    ///
    /// # Arguments
    /// * `seed` - Optional random seed for reproducibility
    ///
    /// # Returns
    /// Tuple of (initial observation, info)
    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, EnvInfo)>;

    /// Take a single step in the environment
    fn step(&mut self, action: &Action) -> Result<StepResult>;

    /// Optional: Render the environment
    fn render(&self) -> Option<String> {
        None
    }

    /// Optional: Close the environment and free resources
    fn close(&mut self) {}
}
