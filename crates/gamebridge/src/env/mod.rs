//! Environment contracts and the single-agent adapters.

mod aec;
mod dm_env;
mod timestep;
mod traits;
mod wrappers;

pub use aec::{AecEnv, AgentCycle, AgentStep};
pub use dm_env::{DmEnvCompatibility, DmEnvironment};
pub use timestep::{normalize, StepType, TimeStep};
pub use traits::{Action, EnvInfo, GymEnv, Observation, StepResult};
pub use wrappers::EpisodeStats;
