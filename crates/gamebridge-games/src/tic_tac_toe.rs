//! Tic-tac-toe: two players alternate marking a 3x3 board.

use gamebridge::oracle::{
    ActionId, ChanceMode, Dynamics, Game, GameParameters, GameState, GameType, OracleError,
    ParamReader, Player,
};
use gamebridge::Result;
use std::fmt;
use std::sync::Arc;

const CELLS: usize = 9;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Empty,
    Cross,
    Nought,
}

impl Cell {
    fn of(player: usize) -> Self {
        if player == 0 {
            Cell::Cross
        } else {
            Cell::Nought
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Cross => 'x',
            Cell::Nought => 'o',
        }
    }

    fn plane(self) -> usize {
        match self {
            Cell::Empty => 0,
            Cell::Cross => 1,
            Cell::Nought => 2,
        }
    }
}

/// Perfect-information, strictly alternating game. Actions are cell indices
/// in row-major order; the observation tensor holds one 3x3 plane per cell
/// state (empty, x, o).
pub struct TicTacToe {
    game_type: GameType,
}

impl TicTacToe {
    pub fn new() -> Self {
        Self {
            game_type: GameType {
                short_name: "tic_tac_toe".into(),
                long_name: "Tic Tac Toe".into(),
                dynamics: Dynamics::Sequential,
                chance_mode: ChanceMode::Deterministic,
                provides_observation_tensor: true,
                provides_information_state_tensor: false,
                provides_observation_string: true,
                provides_information_state_string: false,
            },
        }
    }

    pub fn load(params: &GameParameters) -> Result<Arc<dyn Game>> {
        ParamReader::new("tic_tac_toe", params).finish()?;
        Ok(Arc::new(Self::new()))
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl Game for TicTacToe {
    fn game_type(&self) -> &GameType {
        &self.game_type
    }

    fn num_players(&self) -> usize {
        2
    }

    fn max_game_length(&self) -> usize {
        CELLS
    }

    fn num_distinct_actions(&self) -> std::result::Result<usize, OracleError> {
        Ok(CELLS)
    }

    fn observation_tensor_shape(&self) -> Vec<usize> {
        vec![3, 3, 3]
    }

    fn new_initial_state(&self) -> Box<dyn GameState> {
        Box::new(TicTacToeState::new())
    }
}

/// Board position with the player to move.
#[derive(Clone, Debug)]
pub struct TicTacToeState {
    board: [Cell; CELLS],
    to_move: usize,
    moves: usize,
    winner: Option<usize>,
}

impl TicTacToeState {
    fn new() -> Self {
        Self {
            board: [Cell::Empty; CELLS],
            to_move: 0,
            moves: 0,
            winner: None,
        }
    }

    fn has_line(&self, cell: Cell) -> bool {
        LINES
            .iter()
            .any(|line| line.iter().all(|&i| self.board[i] == cell))
    }

    fn finished(&self) -> bool {
        self.winner.is_some() || self.moves == CELLS
    }

    fn check_player(player: usize) -> std::result::Result<(), OracleError> {
        if player < 2 {
            Ok(())
        } else {
            Err(OracleError::InvalidPlayer(player))
        }
    }
}

impl fmt::Display for TicTacToeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, cells) in self.board.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for cell in cells {
                write!(f, "{}", cell.symbol())?;
            }
        }
        Ok(())
    }
}

impl GameState for TicTacToeState {
    fn current_player(&self) -> Player {
        if self.finished() {
            Player::Terminal
        } else {
            Player::Id(self.to_move)
        }
    }

    fn chance_outcomes(&self) -> Vec<(ActionId, f64)> {
        Vec::new()
    }

    fn legal_actions(&self, player: usize) -> std::result::Result<Vec<ActionId>, OracleError> {
        Self::check_player(player)?;
        if self.finished() || player != self.to_move {
            return Ok(Vec::new());
        }
        Ok((0..CELLS).filter(|&i| self.board[i] == Cell::Empty).collect())
    }

    fn apply_action(&mut self, action: ActionId) -> std::result::Result<(), OracleError> {
        if self.finished() {
            return Err(OracleError::InvalidAction {
                action,
                reason: "the game is over".into(),
            });
        }
        match self.board.get(action) {
            Some(Cell::Empty) => {}
            Some(_) => {
                return Err(OracleError::InvalidAction {
                    action,
                    reason: "cell is occupied".into(),
                })
            }
            None => {
                return Err(OracleError::InvalidAction {
                    action,
                    reason: "no such cell".into(),
                })
            }
        }

        let mark = Cell::of(self.to_move);
        self.board[action] = mark;
        self.moves += 1;
        if self.has_line(mark) {
            self.winner = Some(self.to_move);
        }
        self.to_move = 1 - self.to_move;
        Ok(())
    }

    fn apply_actions(
        &mut self,
        _actions: &[Option<ActionId>],
    ) -> std::result::Result<(), OracleError> {
        Err(OracleError::Unsupported("simultaneous moves".into()))
    }

    fn rewards(&self) -> Vec<f64> {
        match self.winner {
            Some(0) => vec![1.0, -1.0],
            Some(_) => vec![-1.0, 1.0],
            None => vec![0.0, 0.0],
        }
    }

    fn observation_tensor(&self, player: usize) -> std::result::Result<Vec<f32>, OracleError> {
        Self::check_player(player)?;
        let mut tensor = vec![0.0; 3 * CELLS];
        for (i, cell) in self.board.iter().enumerate() {
            tensor[cell.plane() * CELLS + i] = 1.0;
        }
        Ok(tensor)
    }

    fn observation_string(&self, player: usize) -> std::result::Result<String, OracleError> {
        Self::check_player(player)?;
        Ok(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(moves: &[ActionId]) -> TicTacToeState {
        let mut state = TicTacToeState::new();
        for &m in moves {
            state.apply_action(m).unwrap();
        }
        state
    }

    #[test]
    fn test_row_win() {
        let state = play(&[0, 3, 1, 4, 2]);
        assert!(state.is_terminal());
        assert_eq!(state.rewards(), vec![1.0, -1.0]);
        assert_eq!(state.to_string(), "xxx\noo.\n...");
    }

    #[test]
    fn test_draw() {
        let state = play(&[0, 1, 2, 4, 3, 5, 7, 6, 8]);
        assert!(state.is_terminal());
        assert_eq!(state.rewards(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_only_mover_has_legal_actions() {
        let state = play(&[4]);
        assert!(state.legal_actions(0).unwrap().is_empty());
        assert_eq!(state.legal_actions(1).unwrap().len(), 8);
        assert!(matches!(
            state.legal_actions(2),
            Err(OracleError::InvalidPlayer(2))
        ));
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut state = play(&[4]);
        assert!(matches!(
            state.apply_action(4),
            Err(OracleError::InvalidAction { action: 4, .. })
        ));
    }

    #[test]
    fn test_observation_planes() {
        let state = play(&[0, 8]);
        let tensor = state.observation_tensor(0).unwrap();
        assert_eq!(tensor.len(), 27);
        assert_eq!(tensor[CELLS], 1.0); // x on cell 0
        assert_eq!(tensor[2 * CELLS + 8], 1.0); // o on cell 8
        assert_eq!(tensor.iter().sum::<f32>(), 9.0);
    }
}
