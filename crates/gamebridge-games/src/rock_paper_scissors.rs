//! Repeated rock-paper-scissors with simultaneous moves.

use gamebridge::oracle::{
    ActionId, ChanceMode, Dynamics, Game, GameParameters, GameState, GameType, OracleError,
    ParamReader, Player,
};
use gamebridge::Result;
use std::fmt;
use std::sync::Arc;

pub const ROCK: ActionId = 0;
pub const PAPER: ActionId = 1;
pub const SCISSORS: ActionId = 2;

const MOVES: usize = 3;

/// Every round all players throw at once. Each pair of players scores the
/// round: +1 to the winner, -1 to the loser, nothing on a tie.
pub struct RockPaperScissors {
    game_type: GameType,
    players: usize,
    rounds: usize,
}

impl RockPaperScissors {
    pub fn new(players: usize, rounds: usize) -> Self {
        Self {
            game_type: GameType {
                short_name: "rock_paper_scissors".into(),
                long_name: "Rock Paper Scissors".into(),
                dynamics: Dynamics::Simultaneous,
                chance_mode: ChanceMode::Deterministic,
                provides_observation_tensor: true,
                provides_information_state_tensor: false,
                provides_observation_string: true,
                provides_information_state_string: false,
            },
            players,
            rounds,
        }
    }

    pub fn load(params: &GameParameters) -> Result<Arc<dyn Game>> {
        let mut reader = ParamReader::new("rock_paper_scissors", params);
        let players = reader.int_in("players", 2, 2, 10)? as usize;
        let rounds = reader.int_in("rounds", 1, 1, 1000)? as usize;
        reader.finish()?;
        Ok(Arc::new(Self::new(players, rounds)))
    }
}

impl Game for RockPaperScissors {
    fn game_type(&self) -> &GameType {
        &self.game_type
    }

    fn parameters(&self) -> GameParameters {
        GameParameters::from([
            ("players".to_string(), (self.players as i64).into()),
            ("rounds".to_string(), (self.rounds as i64).into()),
        ])
    }

    fn num_players(&self) -> usize {
        self.players
    }

    fn max_game_length(&self) -> usize {
        self.rounds
    }

    fn num_distinct_actions(&self) -> std::result::Result<usize, OracleError> {
        Ok(MOVES)
    }

    /// One-hot of every player's previous throw
    fn observation_tensor_shape(&self) -> Vec<usize> {
        vec![self.players, MOVES]
    }

    fn new_initial_state(&self) -> Box<dyn GameState> {
        Box::new(RpsState {
            players: self.players,
            rounds: self.rounds,
            played: 0,
            last: None,
            round_rewards: vec![0.0; self.players],
        })
    }
}

/// `a` beats `b`
fn beats(a: ActionId, b: ActionId) -> bool {
    (a + MOVES - b) % MOVES == 1
}

#[derive(Clone, Debug)]
pub struct RpsState {
    players: usize,
    rounds: usize,
    played: usize,
    last: Option<Vec<ActionId>>,
    round_rewards: Vec<f64>,
}

impl RpsState {
    fn finished(&self) -> bool {
        self.played >= self.rounds
    }

    fn check_player(&self, player: usize) -> std::result::Result<(), OracleError> {
        if player < self.players {
            Ok(())
        } else {
            Err(OracleError::InvalidPlayer(player))
        }
    }
}

impl fmt::Display for RpsState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "round {}/{}", self.played, self.rounds)?;
        if let Some(last) = &self.last {
            let names: Vec<&str> = last
                .iter()
                .map(|&a| match a {
                    ROCK => "rock",
                    PAPER => "paper",
                    _ => "scissors",
                })
                .collect();
            write!(f, " last {}", names.join(" "))?;
        }
        Ok(())
    }
}

impl GameState for RpsState {
    fn current_player(&self) -> Player {
        if self.finished() {
            Player::Terminal
        } else {
            Player::Simultaneous
        }
    }

    fn chance_outcomes(&self) -> Vec<(ActionId, f64)> {
        Vec::new()
    }

    fn legal_actions(&self, player: usize) -> std::result::Result<Vec<ActionId>, OracleError> {
        self.check_player(player)?;
        if self.finished() {
            return Ok(Vec::new());
        }
        Ok(vec![ROCK, PAPER, SCISSORS])
    }

    fn apply_action(&mut self, action: ActionId) -> std::result::Result<(), OracleError> {
        Err(OracleError::InvalidAction {
            action,
            reason: "every player moves at once; use apply_actions".into(),
        })
    }

    fn apply_actions(
        &mut self,
        actions: &[Option<ActionId>],
    ) -> std::result::Result<(), OracleError> {
        if self.finished() {
            return Err(OracleError::Other("the match is over".into()));
        }
        if actions.len() != self.players {
            return Err(OracleError::Other(format!(
                "expected {} actions, got {}",
                self.players,
                actions.len()
            )));
        }
        let mut throws = Vec::with_capacity(self.players);
        for (player, action) in actions.iter().enumerate() {
            match action {
                Some(a) if *a < MOVES => throws.push(*a),
                Some(a) => {
                    return Err(OracleError::InvalidAction {
                        action: *a,
                        reason: format!("player {player} has no such move"),
                    })
                }
                None => return Err(OracleError::InvalidPlayer(player)),
            }
        }

        let mut rewards = vec![0.0; self.players];
        for i in 0..self.players {
            for j in (i + 1)..self.players {
                if beats(throws[i], throws[j]) {
                    rewards[i] += 1.0;
                    rewards[j] -= 1.0;
                } else if beats(throws[j], throws[i]) {
                    rewards[j] += 1.0;
                    rewards[i] -= 1.0;
                }
            }
        }

        self.round_rewards = rewards;
        self.last = Some(throws);
        self.played += 1;
        Ok(())
    }

    /// Scores of the latest round
    fn rewards(&self) -> Vec<f64> {
        self.round_rewards.clone()
    }

    fn observation_tensor(&self, player: usize) -> std::result::Result<Vec<f32>, OracleError> {
        self.check_player(player)?;
        let mut tensor = vec![0.0; self.players * MOVES];
        if let Some(last) = &self.last {
            for (p, &a) in last.iter().enumerate() {
                tensor[p * MOVES + a] = 1.0;
            }
        }
        Ok(tensor)
    }

    fn observation_string(&self, player: usize) -> std::result::Result<String, OracleError> {
        self.check_player(player)?;
        Ok(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(players: usize, rounds: usize) -> RpsState {
        RpsState {
            players,
            rounds,
            played: 0,
            last: None,
            round_rewards: vec![0.0; players],
        }
    }

    #[test]
    fn test_beats() {
        assert!(beats(PAPER, ROCK));
        assert!(beats(SCISSORS, PAPER));
        assert!(beats(ROCK, SCISSORS));
        assert!(!beats(ROCK, PAPER));
        assert!(!beats(ROCK, ROCK));
    }

    #[test]
    fn test_round_scoring() {
        let mut s = fresh(3, 2);
        assert!(s.is_simultaneous_node());
        s.apply_actions(&[Some(ROCK), Some(PAPER), Some(ROCK)])
            .unwrap();
        assert_eq!(s.rewards(), vec![-1.0, 2.0, -1.0]);
        assert!(!s.is_terminal());

        s.apply_actions(&[Some(SCISSORS), Some(SCISSORS), Some(SCISSORS)])
            .unwrap();
        assert_eq!(s.rewards(), vec![0.0, 0.0, 0.0]);
        assert!(s.is_terminal());
        assert_eq!(s.to_string(), "round 2/2 last scissors scissors scissors");
    }

    #[test]
    fn test_missing_throw_rejected() {
        let mut s = fresh(2, 1);
        assert!(s.apply_actions(&[Some(ROCK), None]).is_err());
        assert!(s.apply_action(ROCK).is_err());
        assert_eq!(s.played, 0);
    }

    #[test]
    fn test_observation_shows_previous_round() {
        let mut s = fresh(2, 3);
        assert_eq!(s.observation_tensor(0).unwrap(), vec![0.0; 6]);
        s.apply_actions(&[Some(PAPER), Some(SCISSORS)]).unwrap();
        assert_eq!(
            s.observation_tensor(1).unwrap(),
            vec![0.0, 1.0, 0.0, 0.0, 0.0, 1.0]
        );
    }
}
