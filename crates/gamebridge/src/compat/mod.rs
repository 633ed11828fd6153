//! Multi-agent compatibility for extensive-form games.

mod agents;
mod config;
mod engine;
mod observation;

pub use config::{CompatConfig, RENDER_MODES};
pub use engine::{GameCompatibility, GameCompatibilityBuilder};
