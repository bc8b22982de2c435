//! Error types

use crate::board::{Coord, Side};

/// Internal-consistency failures of the computer strategy
#[derive(Debug, thiserror::Error)]
pub enum StrategyError {
    #[error("strategy selected non-playable cell {0}")]
    OccupiedCell(Coord),

    #[error("no candidate move available")]
    NoCandidates,
}

/// Rejected play requests
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("game is over")]
    GameOver,

    #[error("it is not {0}'s turn to play here")]
    NotYourTurn(Side),

    #[error("cell {0} is not playable")]
    NotPlayable(Coord),

    #[error(transparent)]
    Strategy(#[from] StrategyError),
}

/// Save-format decode and I/O failures
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown move tag {0}")]
    UnknownMoveTag(u8),

    #[error("invalid {field} byte: {value}")]
    InvalidByte { field: &'static str, value: u8 },

    #[error("invalid board size: {0}")]
    InvalidSize(i32),

    #[error("invalid history length: {0}")]
    InvalidLength(i32),

    #[error("bridge move must carry 2 guards, found {0}")]
    GuardCount(i32),

    #[error("coordinate {0} lies outside the board")]
    InvalidCoord(Coord),

    #[error("strategy for {found} stored in the {slot} slot")]
    StrategySide { slot: Side, found: Side },

    #[error("invalid strategy direction: {0}")]
    InvalidDirection(i32),
}
