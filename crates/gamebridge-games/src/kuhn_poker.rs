//! Kuhn poker for N players.
//!
//! Every player antes one chip and is dealt one card from a deck of N + 1.
//! Players then act once in turn, passing or betting one chip; after a bet
//! each remaining player either calls (bet) or folds (pass). The highest
//! card among the players still in the hand takes the pot.

use gamebridge::oracle::{
    ActionId, ChanceMode, Dynamics, Game, GameParameters, GameState, GameType, OracleError,
    ParamReader, Player,
};
use gamebridge::Result;
use std::fmt;
use std::sync::Arc;

pub const PASS: ActionId = 0;
pub const BET: ActionId = 1;

pub struct KuhnPoker {
    game_type: GameType,
    players: usize,
}

impl KuhnPoker {
    pub fn new(players: usize) -> Self {
        Self {
            game_type: GameType {
                short_name: "kuhn_poker".into(),
                long_name: "Kuhn Poker".into(),
                dynamics: Dynamics::Sequential,
                chance_mode: ChanceMode::ExplicitStochastic,
                provides_observation_tensor: false,
                provides_information_state_tensor: true,
                provides_observation_string: false,
                provides_information_state_string: true,
            },
            players,
        }
    }

    pub fn load(params: &GameParameters) -> Result<Arc<dyn Game>> {
        let mut reader = ParamReader::new("kuhn_poker", params);
        let players = reader.int_in("players", 2, 2, 10)? as usize;
        reader.finish()?;
        Ok(Arc::new(Self::new(players)))
    }

    fn max_betting_actions(&self) -> usize {
        2 * self.players - 1
    }
}

impl Game for KuhnPoker {
    fn game_type(&self) -> &GameType {
        &self.game_type
    }

    fn parameters(&self) -> GameParameters {
        GameParameters::from([("players".to_string(), (self.players as i64).into())])
    }

    fn num_players(&self) -> usize {
        self.players
    }

    fn max_game_length(&self) -> usize {
        self.players + self.max_betting_actions()
    }

    fn num_distinct_actions(&self) -> std::result::Result<usize, OracleError> {
        Ok(2)
    }

    /// Own seat, own card, then two bits per betting action
    fn information_state_tensor_shape(&self) -> Vec<usize> {
        vec![self.players + (self.players + 1) + 2 * self.max_betting_actions()]
    }

    fn new_initial_state(&self) -> Box<dyn GameState> {
        Box::new(KuhnState {
            players: self.players,
            cards: Vec::with_capacity(self.players),
            history: Vec::new(),
            bet_at: None,
            contributions: vec![1; self.players],
        })
    }
}

#[derive(Clone, Debug)]
pub struct KuhnState {
    players: usize,
    /// Cards dealt so far, indexed by player
    cards: Vec<usize>,
    /// Betting actions in order
    history: Vec<ActionId>,
    /// History index of the first bet
    bet_at: Option<usize>,
    contributions: Vec<u32>,
}

impl KuhnState {
    fn dealing(&self) -> bool {
        self.cards.len() < self.players
    }

    fn finished(&self) -> bool {
        if self.dealing() {
            return false;
        }
        match self.bet_at {
            None => self.history.len() == self.players,
            Some(at) => self.history.len() - at == self.players,
        }
    }

    fn to_move(&self) -> usize {
        self.history.len() % self.players
    }

    /// Players who have not folded
    fn contenders(&self) -> Vec<usize> {
        match self.bet_at {
            None => (0..self.players).collect(),
            Some(_) => (0..self.players)
                .filter(|&p| self.contributions[p] == 2)
                .collect(),
        }
    }

    fn winner(&self) -> Option<usize> {
        self.contenders().into_iter().max_by_key(|&p| self.cards[p])
    }

    fn check_player(&self, player: usize) -> std::result::Result<(), OracleError> {
        if player < self.players {
            Ok(())
        } else {
            Err(OracleError::InvalidPlayer(player))
        }
    }

    fn history_string(&self) -> String {
        self.history
            .iter()
            .map(|&a| if a == BET { 'b' } else { 'p' })
            .collect()
    }
}

impl fmt::Display for KuhnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards: Vec<String> = self.cards.iter().map(usize::to_string).collect();
        write!(f, "cards {} history {}", cards.join(" "), self.history_string())
    }
}

impl GameState for KuhnState {
    fn current_player(&self) -> Player {
        if self.dealing() {
            Player::Chance
        } else if self.finished() {
            Player::Terminal
        } else {
            Player::Id(self.to_move())
        }
    }

    fn chance_outcomes(&self) -> Vec<(ActionId, f64)> {
        if !self.dealing() {
            return Vec::new();
        }
        let remaining: Vec<usize> = (0..=self.players)
            .filter(|card| !self.cards.contains(card))
            .collect();
        let p = 1.0 / remaining.len() as f64;
        remaining.into_iter().map(|card| (card, p)).collect()
    }

    fn legal_actions(&self, player: usize) -> std::result::Result<Vec<ActionId>, OracleError> {
        self.check_player(player)?;
        if self.dealing() || self.finished() || player != self.to_move() {
            return Ok(Vec::new());
        }
        Ok(vec![PASS, BET])
    }

    fn apply_action(&mut self, action: ActionId) -> std::result::Result<(), OracleError> {
        if self.dealing() {
            if action > self.players || self.cards.contains(&action) {
                return Err(OracleError::InvalidAction {
                    action,
                    reason: "card is not in the deck".into(),
                });
            }
            self.cards.push(action);
            return Ok(());
        }
        if self.finished() {
            return Err(OracleError::InvalidAction {
                action,
                reason: "the hand is over".into(),
            });
        }

        let player = self.to_move();
        match action {
            PASS => {}
            BET => {
                self.contributions[player] += 1;
                if self.bet_at.is_none() {
                    self.bet_at = Some(self.history.len());
                }
            }
            _ => {
                return Err(OracleError::InvalidAction {
                    action,
                    reason: "expected pass or bet".into(),
                })
            }
        }
        self.history.push(action);
        Ok(())
    }

    fn apply_actions(
        &mut self,
        _actions: &[Option<ActionId>],
    ) -> std::result::Result<(), OracleError> {
        Err(OracleError::Unsupported("simultaneous moves".into()))
    }

    fn rewards(&self) -> Vec<f64> {
        let Some(winner) = self.finished().then(|| self.winner()).flatten() else {
            return vec![0.0; self.players];
        };
        let pot: u32 = self.contributions.iter().sum();
        (0..self.players)
            .map(|p| {
                let paid = f64::from(self.contributions[p]);
                if p == winner {
                    f64::from(pot) - paid
                } else {
                    -paid
                }
            })
            .collect()
    }

    fn information_state_tensor(
        &self,
        player: usize,
    ) -> std::result::Result<Vec<f32>, OracleError> {
        self.check_player(player)?;
        let n = self.players;
        let mut tensor = vec![0.0; n + (n + 1) + 2 * (2 * n - 1)];
        tensor[player] = 1.0;
        if let Some(&card) = self.cards.get(player) {
            tensor[n + card] = 1.0;
        }
        let offset = n + (n + 1);
        for (i, &action) in self.history.iter().enumerate() {
            tensor[offset + 2 * i + action] = 1.0;
        }
        Ok(tensor)
    }

    fn information_state_string(&self, player: usize) -> std::result::Result<String, OracleError> {
        self.check_player(player)?;
        let card = self
            .cards
            .get(player)
            .map_or_else(|| "?".to_string(), usize::to_string);
        Ok(format!("{card}{}", self.history_string()))
    }
}
