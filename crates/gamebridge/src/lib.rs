//! # gamebridge
//!
//! Compatibility layer that presents foreign environments through a uniform
//! step/reset contract.
//!
//! ## Overview
//!
//! gamebridge provides:
//! - Gymnasium-style observation and action spaces (`spaces`)
//! - A Space Adapter converting foreign structured specs into spaces
//! - A single-agent `GymEnv` trait and a dm_env-style compatibility wrapper
//!   built on the timestep normalizer
//! - An agent-environment-cycle (`AecEnv`) multi-agent contract
//! - `GameCompatibility`, the turn-management engine that drives an
//!   extensive-form game oracle (chance nodes, simultaneous moves, sequential
//!   turns) through the `AecEnv` contract
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gamebridge::prelude::*;
//! use rand::SeedableRng;
//!
//! let registry = gamebridge_games::registry();
//! let mut env = GameCompatibility::builder()
//!     .game_name("tic_tac_toe")
//!     .registry(&registry)
//!     .build()?;
//! env.reset(Some(1), None)?;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//! let mut cycle = AgentCycle::new(1_000);
//! while let Some(agent) = cycle.next(&env) {
//!     let step = env.last().expect("agent selected");
//!     let action = if step.terminated || step.truncated {
//!         None
//!     } else {
//!         env.action_space(&agent)?.sample_masked(&mut rng, step.info.action_mask())
//!     };
//!     env.step(action)?;
//! }
//! ```

pub mod compat;
pub mod env;
pub mod oracle;
pub mod spaces;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::compat::{CompatConfig, GameCompatibility, GameCompatibilityBuilder};
    pub use crate::env::{
        Action, AecEnv, AgentCycle, AgentStep, DmEnvCompatibility, DmEnvironment, EnvInfo, GymEnv,
        Observation, StepResult, StepType, TimeStep,
    };
    pub use crate::oracle::{
        Game, GameParameter, GameParameters, GameRegistry, GameState, GameType, OracleError, Player,
    };
    pub use crate::spaces::*;
    pub use crate::{BridgeError, Result};
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("Both an existing game and a game name were supplied; pass exactly one")]
    AmbiguousSource,

    #[error("Neither an existing game nor a game name was supplied; pass exactly one")]
    MissingSource,

    #[error("Unknown game '{0}'")]
    UnknownGame(String),

    #[error("Invalid parameter '{name}' for game '{game}': {reason}")]
    InvalidParameter {
        game: String,
        name: String,
        reason: String,
    },

    #[error("Unsupported spec {spec}: {reason}")]
    UnsupportedSpec { spec: String, reason: String },

    #[error("Unknown agent '{0}'")]
    UnknownAgent(String),

    #[error("No agent is selected; the episode has ended, call reset()")]
    NoAgentSelected,

    #[error("Agent '{0}' can still act and must be given an action")]
    MissingAction(String),

    #[error("Unsupported render mode '{0}'")]
    UnsupportedRenderMode(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Oracle error: {0}")]
    Oracle(#[from] oracle::OracleError),

    /// Internal invariant failure; indicates a bug in the engine or a
    /// misbehaving oracle rather than a caller mistake.
    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),
}

pub type Result<T> = core::result::Result<T, BridgeError>;
