//! Timestep normalizer: dm_env-style timesteps to the 5-tuple step result.

use super::{EnvInfo, Observation, StepResult};

/// Position of a timestep within its episode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepType {
    First,
    Mid,
    Last,
}

impl StepType {
    /// Numeric code recorded in the info extras
    pub fn code(self) -> f64 {
        match self {
            StepType::First => 0.0,
            StepType::Mid => 1.0,
            StepType::Last => 2.0,
        }
    }
}

/// Raw environment output: observation, optional reward, discount and step type
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStep {
    pub step_type: StepType,
    pub reward: Option<f64>,
    pub discount: f64,
    pub observation: Observation,
}

impl TimeStep {
    pub fn first(observation: Observation) -> Self {
        Self {
            step_type: StepType::First,
            reward: None,
            discount: 1.0,
            observation,
        }
    }

    pub fn mid(observation: Observation, reward: f64) -> Self {
        Self {
            step_type: StepType::Mid,
            reward: Some(reward),
            discount: 1.0,
            observation,
        }
    }

    /// Episode ended inside the environment (no bootstrapping)
    pub fn termination(observation: Observation, reward: f64) -> Self {
        Self {
            step_type: StepType::Last,
            reward: Some(reward),
            discount: 0.0,
            observation,
        }
    }

    /// Episode cut short with a non-zero discount
    pub fn truncation(observation: Observation, reward: f64, discount: f64) -> Self {
        Self {
            step_type: StepType::Last,
            reward: Some(reward),
            discount,
            observation,
        }
    }

    pub fn last(&self) -> bool {
        self.step_type == StepType::Last
    }
}

/// Convert a timestep into `(observation, reward, terminated, truncated, info)`.
///
/// A missing reward counts as zero. On the last step a zero discount means
/// terminated and any other discount means truncated.
pub fn normalize(timestep: TimeStep) -> StepResult {
    let reward = timestep.reward.unwrap_or(0.0);

    let (terminated, truncated) = if timestep.last() {
        if timestep.discount != 0.0 {
            (false, true)
        } else {
            (true, false)
        }
    } else {
        (false, false)
    };

    let info = EnvInfo::new()
        .with_extra("timestep.discount", timestep.discount)
        .with_extra("timestep.step_type", timestep.step_type.code());

    StepResult {
        observation: timestep.observation,
        reward,
        terminated,
        truncated,
        info,
    }
}
