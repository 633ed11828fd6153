//! Catch: a single-agent environment speaking the dm_env protocol.

use gamebridge::env::{Action, DmEnvironment, Observation, TimeStep};
use gamebridge::oracle::OracleError;
use gamebridge::spaces::{DType, Spec};
use gamebridge::{BridgeError, Result};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const LEFT: usize = 0;
const STAY: usize = 1;
const RIGHT: usize = 2;

/// A ball falls from a random column of the top row; the agent moves a
/// paddle along the bottom row to catch it. Catching scores +1, missing -1.
///
/// The episode ends with a zero discount when the ball lands. With a time
/// limit shorter than the fall, it is cut short with a discount of one.
pub struct Catch {
    rows: usize,
    columns: usize,
    time_limit: Option<usize>,
    ball: (usize, usize),
    paddle: usize,
    steps: usize,
    needs_reset: bool,
    rng: StdRng,
}

impl Catch {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            time_limit: None,
            ball: (0, 0),
            paddle: columns / 2,
            steps: 0,
            needs_reset: true,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// End episodes after `steps` steps with a truncation
    pub fn with_time_limit(mut self, steps: usize) -> Self {
        self.time_limit = Some(steps);
        self
    }

    fn observation(&self) -> Observation {
        let mut board = Array2::<f32>::zeros((self.rows, self.columns));
        board[self.ball] = 1.0;
        board[(self.rows - 1, self.paddle)] = 1.0;
        Observation::Array(board.into_dyn())
    }

    fn parse_action(action: &Action) -> Result<usize> {
        let index = match action {
            Observation::Discrete(a) => *a,
            Observation::Array(values) if values.len() == 1 => {
                values.iter().next().map_or(0, |v| v.round() as usize)
            }
            _ => {
                return Err(BridgeError::Oracle(OracleError::Other(
                    "catch expects a single discrete action".into(),
                )))
            }
        };
        if index > RIGHT {
            return Err(BridgeError::Oracle(OracleError::InvalidAction {
                action: index,
                reason: "expected left, stay or right".into(),
            }));
        }
        Ok(index)
    }
}

impl Default for Catch {
    fn default() -> Self {
        Self::new(10, 5)
    }
}

impl DmEnvironment for Catch {
    fn observation_spec(&self) -> Spec {
        Spec::BoundedArray {
            shape: vec![self.rows, self.columns],
            dtype: DType::Float32,
            minimum: vec![0.0],
            maximum: vec![1.0],
        }
    }

    fn action_spec(&self) -> Spec {
        Spec::DiscreteArray { num_values: 3 }
    }

    fn reset(&mut self) -> Result<TimeStep> {
        self.ball = (0, self.rng.gen_range(0..self.columns));
        self.paddle = self.columns / 2;
        self.steps = 0;
        self.needs_reset = false;
        Ok(TimeStep::first(self.observation()))
    }

    fn step(&mut self, action: &Action) -> Result<TimeStep> {
        if self.needs_reset {
            return self.reset();
        }
        let action = Self::parse_action(action)?;

        self.paddle = match action {
            LEFT => self.paddle.saturating_sub(1),
            STAY => self.paddle,
            _ => (self.paddle + 1).min(self.columns - 1),
        };
        self.ball.0 += 1;
        self.steps += 1;

        if self.ball.0 == self.rows - 1 {
            self.needs_reset = true;
            let reward = if self.ball.1 == self.paddle { 1.0 } else { -1.0 };
            return Ok(TimeStep::termination(self.observation(), reward));
        }
        if self.time_limit.is_some_and(|limit| self.steps >= limit) {
            self.needs_reset = true;
            return Ok(TimeStep::truncation(self.observation(), 0.0, 1.0));
        }
        Ok(TimeStep::mid(self.observation(), 0.0))
    }

    fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}
