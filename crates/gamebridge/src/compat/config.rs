use crate::oracle::GameParameters;
use crate::{BridgeError, Result};
use serde::{Deserialize, Serialize};

/// Render modes `GameCompatibility` understands.
pub const RENDER_MODES: &[&str] = &["ansi"];

/// Load-by-name configuration for `GameCompatibility`.
///
/// ```json
/// {"game_name": "rock_paper_scissors", "game_config": {"players": 3}}
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Registered game to load; leave unset when passing a loaded game
    pub game_name: Option<String>,

    /// Options forwarded verbatim to the game loader.
    pub game_config: GameParameters,

    /// `Some("ansi")` makes `render` return the state's text form.
    pub render_mode: Option<String>,

    /// Retry an action the oracle rejected once before failing.
    pub retry_rejected_actions: bool,
}

impl CompatConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn validate_render_mode(&self) -> Result<()> {
        match self.render_mode.as_deref() {
            Some(mode) if !RENDER_MODES.contains(&mode) => {
                Err(BridgeError::UnsupportedRenderMode(mode.to_string()))
            }
            _ => Ok(()),
        }
    }
}
