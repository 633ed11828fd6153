//! Single-agent compatibility for dm_env-style environments.

use super::timestep::{normalize, TimeStep};
use super::{Action, EnvInfo, GymEnv, Observation, StepResult};
use crate::spaces::{spec_to_space, DynSpace, Spec};
use crate::Result;

/// An environment speaking the dm_env protocol: specs plus timesteps.
pub trait DmEnvironment: Send {
    fn observation_spec(&self) -> Spec;

    fn action_spec(&self) -> Spec;

    fn reset(&mut self) -> Result<TimeStep>;

    fn step(&mut self, action: &Action) -> Result<TimeStep>;

    /// Replace the environment's random generator with one seeded by `seed`
    fn reseed(&mut self, _seed: u64) {}

    fn close(&mut self) {}
}

/// Presents a `DmEnvironment` through the `GymEnv` contract.
///
/// Spaces are converted once at construction; each timestep is passed
/// through the timestep normalizer.
pub struct DmEnvCompatibility<E: DmEnvironment> {
    env: E,
    observation_space: DynSpace,
    action_space: DynSpace,
}

impl<E: DmEnvironment> DmEnvCompatibility<E> {
    /// Wrap an environment, failing if either of its specs is unsupported
    pub fn new(env: E) -> Result<Self> {
        let observation_space = spec_to_space(&env.observation_spec())?;
        let action_space = spec_to_space(&env.action_spec())?;
        Ok(Self {
            env,
            observation_space,
            action_space,
        })
    }

    /// Get a reference to the inner environment
    pub fn inner(&self) -> &E {
        &self.env
    }

    /// Get a mutable reference to the inner environment
    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.env
    }
}

impl<E: DmEnvironment> GymEnv for DmEnvCompatibility<E> {
    fn observation_space(&self) -> DynSpace {
        self.observation_space.clone()
    }

    fn action_space(&self) -> DynSpace {
        self.action_space.clone()
    }

    fn reset(&mut self, seed: Option<u64>) -> Result<(Observation, EnvInfo)> {
        if let Some(seed) = seed {
            self.env.reseed(seed);
        }
        let result = normalize(self.env.reset()?);
        Ok((result.observation, result.info))
    }

    fn step(&mut self, action: &Action) -> Result<StepResult> {
        Ok(normalize(self.env.step(action)?))
    }

    fn close(&mut self) {
        self.env.close();
    }
}
