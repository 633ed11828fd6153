//! Pig: a push-your-luck dice game with chance nodes in the middle of play.
//!
//! On their turn a player either rolls or stops. A roll is resolved by a
//! chance node: a one wipes the turn total and passes the turn, any other
//! face is added to it. Stopping banks the turn total. The first player to
//! bank `winscore` wins.

use gamebridge::oracle::{
    ActionId, ChanceMode, Dynamics, Game, GameParameters, GameState, GameType, OracleError,
    ParamReader, Player,
};
use gamebridge::Result;
use std::fmt;
use std::sync::Arc;

pub const ROLL: ActionId = 0;
pub const STOP: ActionId = 1;

pub struct Pig {
    game_type: GameType,
    players: usize,
    horizon: usize,
    win_score: u32,
    dice_outcomes: usize,
}

impl Pig {
    pub fn new(players: usize, horizon: usize, win_score: u32, dice_outcomes: usize) -> Self {
        Self {
            game_type: GameType {
                short_name: "pig".into(),
                long_name: "Pig".into(),
                dynamics: Dynamics::Sequential,
                chance_mode: ChanceMode::ExplicitStochastic,
                provides_observation_tensor: false,
                provides_information_state_tensor: false,
                provides_observation_string: true,
                provides_information_state_string: false,
            },
            players,
            horizon,
            win_score,
            dice_outcomes,
        }
    }

    pub fn load(params: &GameParameters) -> Result<Arc<dyn Game>> {
        let mut reader = ParamReader::new("pig", params);
        let players = reader.int_in("players", 2, 2, 10)? as usize;
        let horizon = reader.int_in("horizon", 1000, 1, 100_000)? as usize;
        let win_score = reader.int_in("winscore", 100, 1, 10_000)? as u32;
        let dice_outcomes = reader.int_in("diceoutcomes", 6, 2, 100)? as usize;
        reader.finish()?;
        Ok(Arc::new(Self::new(players, horizon, win_score, dice_outcomes)))
    }
}

impl Game for Pig {
    fn game_type(&self) -> &GameType {
        &self.game_type
    }

    fn parameters(&self) -> GameParameters {
        GameParameters::from([
            ("players".to_string(), (self.players as i64).into()),
            ("horizon".to_string(), (self.horizon as i64).into()),
            ("winscore".to_string(), i64::from(self.win_score).into()),
            ("diceoutcomes".to_string(), (self.dice_outcomes as i64).into()),
        ])
    }

    fn num_players(&self) -> usize {
        self.players
    }

    /// The horizon caps the number of transitions, die rolls included
    fn max_game_length(&self) -> usize {
        self.horizon
    }

    fn num_distinct_actions(&self) -> std::result::Result<usize, OracleError> {
        Ok(2)
    }

    fn new_initial_state(&self) -> Box<dyn GameState> {
        Box::new(PigState {
            scores: vec![0; self.players],
            turn_total: 0,
            to_move: 0,
            rolling: false,
            win_score: self.win_score,
            dice_outcomes: self.dice_outcomes,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PigState {
    scores: Vec<u32>,
    turn_total: u32,
    to_move: usize,
    /// A roll was chosen and awaits its die face
    rolling: bool,
    win_score: u32,
    dice_outcomes: usize,
}

impl PigState {
    fn winner(&self) -> Option<usize> {
        self.scores.iter().position(|&s| s >= self.win_score)
    }

    fn next_turn(&mut self) {
        self.turn_total = 0;
        self.to_move = (self.to_move + 1) % self.scores.len();
    }

    fn check_player(&self, player: usize) -> std::result::Result<(), OracleError> {
        if player < self.scores.len() {
            Ok(())
        } else {
            Err(OracleError::InvalidPlayer(player))
        }
    }
}

impl fmt::Display for PigState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scores: Vec<String> = self.scores.iter().map(u32::to_string).collect();
        write!(
            f,
            "scores {} turn total {} to move {}",
            scores.join(" "),
            self.turn_total,
            self.to_move
        )
    }
}

impl GameState for PigState {
    fn current_player(&self) -> Player {
        if self.winner().is_some() {
            Player::Terminal
        } else if self.rolling {
            Player::Chance
        } else {
            Player::Id(self.to_move)
        }
    }

    /// Outcome `i` is the die face `i + 1`
    fn chance_outcomes(&self) -> Vec<(ActionId, f64)> {
        if !self.rolling {
            return Vec::new();
        }
        let p = 1.0 / self.dice_outcomes as f64;
        (0..self.dice_outcomes).map(|face| (face, p)).collect()
    }

    fn legal_actions(&self, player: usize) -> std::result::Result<Vec<ActionId>, OracleError> {
        self.check_player(player)?;
        if self.current_player() != Player::Id(player) {
            return Ok(Vec::new());
        }
        Ok(vec![ROLL, STOP])
    }

    fn apply_action(&mut self, action: ActionId) -> std::result::Result<(), OracleError> {
        if self.winner().is_some() {
            return Err(OracleError::InvalidAction {
                action,
                reason: "the game is over".into(),
            });
        }

        if self.rolling {
            if action >= self.dice_outcomes {
                return Err(OracleError::InvalidAction {
                    action,
                    reason: "no such die face".into(),
                });
            }
            self.rolling = false;
            match action + 1 {
                1 => self.next_turn(),
                face => self.turn_total += face as u32,
            }
            return Ok(());
        }

        match action {
            ROLL => self.rolling = true,
            STOP => {
                self.scores[self.to_move] += self.turn_total;
                if self.winner().is_none() {
                    self.next_turn();
                }
            }
            _ => {
                return Err(OracleError::InvalidAction {
                    action,
                    reason: "expected roll or stop".into(),
                })
            }
        }
        Ok(())
    }

    fn apply_actions(
        &mut self,
        _actions: &[Option<ActionId>],
    ) -> std::result::Result<(), OracleError> {
        Err(OracleError::Unsupported("simultaneous moves".into()))
    }

    /// The winner gets 1 and the losers share -1
    fn rewards(&self) -> Vec<f64> {
        let players = self.scores.len();
        match self.winner() {
            Some(winner) => (0..players)
                .map(|p| {
                    if p == winner {
                        1.0
                    } else {
                        -1.0 / (players - 1) as f64
                    }
                })
                .collect(),
            None => vec![0.0; players],
        }
    }

    fn observation_string(&self, player: usize) -> std::result::Result<String, OracleError> {
        self.check_player(player)?;
        Ok(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(players: usize, win_score: u32) -> PigState {
        PigState {
            scores: vec![0; players],
            turn_total: 0,
            to_move: 0,
            rolling: false,
            win_score,
            dice_outcomes: 6,
        }
    }

    #[test]
    fn test_roll_creates_chance_node() {
        let mut s = state(2, 100);
        s.apply_action(ROLL).unwrap();
        assert!(s.is_chance_node());
        let outcomes = s.chance_outcomes();
        assert_eq!(outcomes.len(), 6);
        assert!(s.legal_actions(0).unwrap().is_empty());

        s.apply_action(4).unwrap(); // face 5
        assert_eq!(s.current_player(), Player::Id(0));
        assert_eq!(s.turn_total, 5);
    }

    #[test]
    fn test_rolling_one_passes_turn() {
        let mut s = state(2, 100);
        s.apply_action(ROLL).unwrap();
        s.apply_action(5).unwrap(); // face 6
        s.apply_action(ROLL).unwrap();
        s.apply_action(0).unwrap(); // face 1
        assert_eq!(s.current_player(), Player::Id(1));
        assert_eq!(s.turn_total, 0);
        assert_eq!(s.scores, vec![0, 0]);
    }

    #[test]
    fn test_stop_banks_and_wins() {
        let mut s = state(3, 10);
        s.apply_action(ROLL).unwrap();
        s.apply_action(5).unwrap();
        s.apply_action(ROLL).unwrap();
        s.apply_action(3).unwrap(); // total 10
        s.apply_action(STOP).unwrap();
        assert!(s.is_terminal());
        assert_eq!(s.rewards(), vec![1.0, -0.5, -0.5]);
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut params = GameParameters::new();
        params.insert("sides".into(), 6i64.into());
        assert!(Pig::load(&params).is_err());
    }
}
