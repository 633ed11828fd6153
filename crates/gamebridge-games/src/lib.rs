//! Built-in games and environments for gamebridge.
//!
//! Game oracles, loadable by name through [`registry`]:
//! - `tic_tac_toe` - strictly alternating, perfect information
//! - `kuhn_poker` - cards dealt by consecutive chance nodes at the start
//! - `pig` - dice rolls resolved by chance nodes mid-game
//! - `rock_paper_scissors` - simultaneous moves over several rounds
//!
//! Single-agent environments:
//! - `Catch` - dm_env-style, with discount-based episode ends

mod catch;
mod kuhn_poker;
mod pig;
mod rock_paper_scissors;
mod tic_tac_toe;

pub use catch::Catch;
pub use kuhn_poker::{KuhnPoker, KuhnState};
pub use pig::{Pig, PigState};
pub use rock_paper_scissors::{RockPaperScissors, RpsState};
pub use tic_tac_toe::{TicTacToe, TicTacToeState};

use gamebridge::oracle::GameRegistry;

/// A registry holding every built-in game
pub fn registry() -> GameRegistry {
    let mut registry = GameRegistry::new();
    registry
        .register("tic_tac_toe", TicTacToe::load)
        .register("kuhn_poker", KuhnPoker::load)
        .register("pig", Pig::load)
        .register("rock_paper_scissors", RockPaperScissors::load);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamebridge::oracle::GameParameters;

    #[test]
    fn test_registry_names() {
        let registry = registry();
        assert_eq!(
            registry.names(),
            vec!["kuhn_poker", "pig", "rock_paper_scissors", "tic_tac_toe"]
        );
    }

    #[test]
    fn test_every_game_loads_with_defaults() {
        let registry = registry();
        for name in registry.names() {
            let game = registry.load(name, &GameParameters::new()).unwrap();
            assert_eq!(game.name(), name);
            assert!(game.num_players() >= 2);
        }
    }
}
