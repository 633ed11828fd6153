//! Game and game-state traits.

use super::{GameParameters, OracleError};
use std::fmt;

/// Index of a distinct action (or chance outcome) in a game.
pub type ActionId = usize;

/// Who acts at a game state.
///
/// Mirrors the usual extensive-form convention of a player index plus
/// sentinel "players" for nature, simultaneous nodes and the end of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    Id(usize),
    Chance,
    Simultaneous,
    Invalid,
    Terminal,
    MeanField,
}

impl Player {
    pub fn id(self) -> Option<usize> {
        match self {
            Player::Id(id) => Some(id),
            _ => None,
        }
    }

    /// Sentinels from `Terminal` onwards mean no player can act any more.
    pub fn is_game_over(self) -> bool {
        matches!(self, Player::Terminal | Player::MeanField)
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::Id(id) => write!(f, "player {id}"),
            Player::Chance => f.write_str("chance"),
            Player::Simultaneous => f.write_str("simultaneous"),
            Player::Invalid => f.write_str("invalid"),
            Player::Terminal => f.write_str("terminal"),
            Player::MeanField => f.write_str("mean field"),
        }
    }
}

/// How players take turns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dynamics {
    Sequential,
    Simultaneous,
}

/// How nature participates in the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChanceMode {
    Deterministic,
    ExplicitStochastic,
}

/// Static description of a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameType {
    pub short_name: String,
    pub long_name: String,
    pub dynamics: Dynamics,
    pub chance_mode: ChanceMode,
    pub provides_observation_tensor: bool,
    pub provides_information_state_tensor: bool,
    pub provides_observation_string: bool,
    pub provides_information_state_string: bool,
}

/// A loaded game: the factory for initial states plus its static properties.
pub trait Game: Send + Sync {
    fn game_type(&self) -> &GameType;

    fn name(&self) -> &str {
        &self.game_type().short_name
    }

    /// Parameters the game was loaded with (including defaults)
    fn parameters(&self) -> GameParameters {
        GameParameters::new()
    }

    fn num_players(&self) -> usize;

    /// Upper bound on the number of transitions, chance outcomes included
    fn max_game_length(&self) -> usize;

    fn num_distinct_actions(&self) -> Result<usize, OracleError>;

    fn observation_tensor_shape(&self) -> Vec<usize> {
        Vec::new()
    }

    fn information_state_tensor_shape(&self) -> Vec<usize> {
        Vec::new()
    }

    fn new_initial_state(&self) -> Box<dyn GameState>;
}

/// One node of the game tree.
///
/// At most one of chance, simultaneous and single-player describes a
/// non-terminal state; the defaults derive all three from `current_player`.
pub trait GameState: Send + fmt::Display {
    fn current_player(&self) -> Player;

    fn is_chance_node(&self) -> bool {
        self.current_player() == Player::Chance
    }

    fn is_simultaneous_node(&self) -> bool {
        self.current_player() == Player::Simultaneous
    }

    fn is_terminal(&self) -> bool {
        self.current_player() == Player::Terminal
    }

    /// Outcomes and their probabilities at a chance node
    fn chance_outcomes(&self) -> Vec<(ActionId, f64)>;

    fn legal_actions(&self, player: usize) -> Result<Vec<ActionId>, OracleError>;

    fn apply_action(&mut self, action: ActionId) -> Result<(), OracleError>;

    /// Apply one action per player at a simultaneous node, in player order.
    /// `None` marks a player with nothing to play.
    fn apply_actions(&mut self, actions: &[Option<ActionId>]) -> Result<(), OracleError>;

    /// Rewards for every player produced by the most recent transition
    fn rewards(&self) -> Vec<f64>;

    fn observation_tensor(&self, _player: usize) -> Result<Vec<f32>, OracleError> {
        Err(OracleError::Unsupported("observation tensor".into()))
    }

    fn information_state_tensor(&self, _player: usize) -> Result<Vec<f32>, OracleError> {
        Err(OracleError::Unsupported("information state tensor".into()))
    }

    fn observation_string(&self, _player: usize) -> Result<String, OracleError> {
        Err(OracleError::Unsupported("observation string".into()))
    }

    fn information_state_string(&self, _player: usize) -> Result<String, OracleError> {
        Err(OracleError::Unsupported("information state string".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_over_sentinels() {
        assert!(Player::Terminal.is_game_over());
        assert!(Player::MeanField.is_game_over());
        assert!(!Player::Chance.is_game_over());
        assert!(!Player::Simultaneous.is_game_over());
        assert!(!Player::Id(0).is_game_over());
        assert_eq!(Player::Id(3).id(), Some(3));
        assert_eq!(Player::Chance.id(), None);
    }
}
