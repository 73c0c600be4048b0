use thiserror::Error;

use crate::CellIx;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cell {0} is outside the playable track")]
    CellOutOfRange(CellIx),
    #[error("Cell {0} has conflicting classifications")]
    CellConflict(CellIx),
    #[error("Seat index out of range")]
    InvalidSeat,
    #[error("Game already started, tokens are locked")]
    AlreadyStarted,
}

pub type Result<T> = core::result::Result<T, GameError>;
