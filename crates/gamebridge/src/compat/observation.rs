use crate::env::Observation;
use crate::oracle::{Game, GameState};
use crate::{BridgeError, Result};
use ndarray::{ArrayD, IxDyn};

/// Which per-player representation the engine reads from the oracle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ObservationSource {
    ObservationTensor(Vec<usize>),
    InformationStateTensor(Vec<usize>),
    ObservationString,
    InformationStateString,
}

impl ObservationSource {
    /// Pick the richest representation the game provides.
    pub fn for_game(game: &dyn Game) -> Result<Self> {
        let game_type = game.game_type();
        if game_type.provides_observation_tensor {
            Ok(Self::ObservationTensor(game.observation_tensor_shape()))
        } else if game_type.provides_information_state_tensor {
            Ok(Self::InformationStateTensor(
                game.information_state_tensor_shape(),
            ))
        } else if game_type.provides_observation_string {
            Ok(Self::ObservationString)
        } else if game_type.provides_information_state_string {
            Ok(Self::InformationStateString)
        } else {
            Err(BridgeError::UnsupportedSpec {
                spec: format!("observation of game '{}'", game.name()),
                reason: "the game provides neither tensor nor string observations".into(),
            })
        }
    }

    pub fn observe(&self, state: &dyn GameState, player: usize) -> Result<Observation> {
        match self {
            Self::ObservationTensor(shape) => {
                reshape(state.observation_tensor(player)?, shape, player)
            }
            Self::InformationStateTensor(shape) => {
                reshape(state.information_state_tensor(player)?, shape, player)
            }
            Self::ObservationString => Ok(Observation::Text(state.observation_string(player)?)),
            Self::InformationStateString => {
                Ok(Observation::Text(state.information_state_string(player)?))
            }
        }
    }
}

fn reshape(values: Vec<f32>, shape: &[usize], player: usize) -> Result<Observation> {
    let len = values.len();
    ArrayD::from_shape_vec(IxDyn(shape), values)
        .map(Observation::Array)
        .map_err(|_| {
            BridgeError::ProtocolViolation(format!(
                "player {player} tensor of length {len} does not fit the declared shape {shape:?}"
            ))
        })
}
