//! Load-by-name game registry.

use super::{Game, GameParameters};
use crate::{BridgeError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Builds a game from its load-time parameters.
pub type GameLoader = fn(&GameParameters) -> Result<Arc<dyn Game>>;

/// Maps game names to loaders.
#[derive(Clone, Default)]
pub struct GameRegistry {
    loaders: BTreeMap<String, GameLoader>,
}

impl GameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader, replacing any previous loader of the same name
    pub fn register(&mut self, name: impl Into<String>, loader: GameLoader) -> &mut Self {
        self.loaders.insert(name.into(), loader);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaders.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.loaders.keys().map(String::as_str).collect()
    }

    /// Load a game by name, forwarding `params` to its loader
    pub fn load(&self, name: &str, params: &GameParameters) -> Result<Arc<dyn Game>> {
        let loader = self
            .loaders
            .get(name)
            .ok_or_else(|| BridgeError::UnknownGame(name.to_string()))?;
        tracing::debug!(game = name, ?params, "Loading game");
        loader(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::{
        ActionId, ChanceMode, Dynamics, GameState, GameType, OracleError, ParamReader, Player,
    };
    use std::fmt;

    struct Trivial {
        game_type: GameType,
        players: usize,
    }

    struct TrivialState;

    impl fmt::Display for TrivialState {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("done")
        }
    }

    impl GameState for TrivialState {
        fn current_player(&self) -> Player {
            Player::Terminal
        }
        fn chance_outcomes(&self) -> Vec<(ActionId, f64)> {
            Vec::new()
        }
        fn legal_actions(&self, _player: usize) -> std::result::Result<Vec<ActionId>, OracleError> {
            Ok(Vec::new())
        }
        fn apply_action(&mut self, action: ActionId) -> std::result::Result<(), OracleError> {
            Err(OracleError::InvalidAction {
                action,
                reason: "terminal".into(),
            })
        }
        fn apply_actions(
            &mut self,
            _actions: &[Option<ActionId>],
        ) -> std::result::Result<(), OracleError> {
            Err(OracleError::Other("terminal".into()))
        }
        fn rewards(&self) -> Vec<f64> {
            Vec::new()
        }
    }

    impl Game for Trivial {
        fn game_type(&self) -> &GameType {
            &self.game_type
        }
        fn num_players(&self) -> usize {
            self.players
        }
        fn max_game_length(&self) -> usize {
            0
        }
        fn num_distinct_actions(&self) -> std::result::Result<usize, OracleError> {
            Ok(1)
        }
        fn new_initial_state(&self) -> Box<dyn GameState> {
            Box::new(TrivialState)
        }
    }

    fn load_trivial(params: &GameParameters) -> Result<Arc<dyn Game>> {
        let mut reader = ParamReader::new("trivial", params);
        let players = reader.int_in("players", 2, 1, 8)? as usize;
        reader.finish()?;
        Ok(Arc::new(Trivial {
            game_type: GameType {
                short_name: "trivial".into(),
                long_name: "Trivial".into(),
                dynamics: Dynamics::Sequential,
                chance_mode: ChanceMode::Deterministic,
                provides_observation_tensor: false,
                provides_information_state_tensor: false,
                provides_observation_string: true,
                provides_information_state_string: false,
            },
            players,
        }))
    }

    #[test]
    fn test_load_by_name_forwards_params() {
        let mut registry = GameRegistry::new();
        registry.register("trivial", load_trivial);

        let mut params = GameParameters::new();
        params.insert("players".into(), crate::oracle::GameParameter::Int(5));
        let game = registry.load("trivial", &params).unwrap();

        assert_eq!(game.num_players(), 5);
        assert_eq!(game.name(), "trivial");
        assert_eq!(registry.names(), vec!["trivial"]);
    }

    #[test]
    fn test_unknown_game() {
        let registry = GameRegistry::new();
        let err = registry.load("nope", &GameParameters::new()).err().unwrap();
        assert!(matches!(err, BridgeError::UnknownGame(name) if name == "nope"));
    }
}
