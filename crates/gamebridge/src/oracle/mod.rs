//! Extensive-form game oracle interface.
//!
//! A game oracle is the wrapped engine that owns transition, legality and
//! reward rules. gamebridge only consumes it through the `Game` and
//! `GameState` traits; concrete games live in `gamebridge-games`.

mod error;
mod game;
mod params;
mod registry;

pub use error::OracleError;
pub use game::{ActionId, ChanceMode, Dynamics, Game, GameState, GameType, Player};
pub use params::{GameParameter, GameParameters, ParamReader};
pub use registry::{GameLoader, GameRegistry};
