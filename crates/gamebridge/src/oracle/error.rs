use super::ActionId;

/// Errors reported by a game oracle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OracleError {
    #[error("Invalid action {action}: {reason}")]
    InvalidAction { action: ActionId, reason: String },

    #[error("Invalid player {0}")]
    InvalidPlayer(usize),

    #[error("{0} is not supported by this game")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}
