use crate::game::state::Phase;
use thiserror::Error;

/// Errors returned by the public game operations. Validation failures leave
/// the state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("invalid {what} index {index}")]
    InvalidIndex { what: &'static str, index: usize },

    #[error("{op} is not allowed during the {phase} phase")]
    WrongPhase { op: &'static str, phase: Phase },

    #[error("player {actual} acted out of turn, expected player {expected}")]
    OutOfTurn { expected: usize, actual: usize },

    #[error("assignment mapping does not match the resolved trick")]
    InvalidAssignment,

    #[error("inconsistent game state: {0}")]
    InconsistentState(String),
}
