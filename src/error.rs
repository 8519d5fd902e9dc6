use thiserror::Error;

use crate::board::{Pos, Side};
use crate::movegen::Move;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The executor was asked to move a piece from an empty cell.
    #[error("no piece on {0} to move")]
    EmptySource(Pos),
    /// The executor was asked to remove a piece that is not there.
    #[error("no piece on {0} to capture")]
    MissingCapture(Pos),
    #[error("invalid square: {0:?}")]
    InvalidSquare(String),
    #[error("invalid board diagram: {0}")]
    InvalidDiagram(String),
    #[error("illegal move {0}")]
    IllegalMove(Move),
    #[error("the capture chain must continue from {0}")]
    ChainInProgress(Pos),
    #[error("the machine is still deciding")]
    MachineThinking,
    #[error("it is the {0}'s turn")]
    NotYourTurn(Side),
    #[error("the game is over")]
    GameOver,
}
