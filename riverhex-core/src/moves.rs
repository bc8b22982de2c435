//! Played moves
//!
//! A history entry remembers where a move came from: a plain placement
//! (human, opening, bridge repair), a scored neighbour candidate, or a
//! bridge candidate whose two guard cells must stay empty.

use crate::board::Coord;
use serde::{Deserialize, Serialize};

/// A coordinate with its origin
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Plain(Coord),
    Scored { at: Coord, score: i32 },
    Bridge { at: Coord, score: i32, guards: [Coord; 2] },
}

impl Move {
    /// Save-format variant tag
    pub const TAG_PLAIN: u8 = 1;
    pub const TAG_SCORED: u8 = 2;
    pub const TAG_BRIDGE: u8 = 3;

    pub fn coord(&self) -> Coord {
        match *self {
            Move::Plain(at) => at,
            Move::Scored { at, .. } => at,
            Move::Bridge { at, .. } => at,
        }
    }

    pub fn score(&self) -> Option<i32> {
        match *self {
            Move::Plain(_) => None,
            Move::Scored { score, .. } | Move::Bridge { score, .. } => Some(score),
        }
    }

    /// Guard cells of a bridge move
    pub fn guards(&self) -> Option<[Coord; 2]> {
        match *self {
            Move::Bridge { guards, .. } => Some(guards),
            _ => None,
        }
    }

    pub fn tag(&self) -> u8 {
        match self {
            Move::Plain(_) => Self::TAG_PLAIN,
            Move::Scored { .. } => Self::TAG_SCORED,
            Move::Bridge { .. } => Self::TAG_BRIDGE,
        }
    }

    /// Same move with `bonus` added to its score (plain moves unchanged)
    pub fn with_bonus(self, bonus: i32) -> Self {
        match self {
            Move::Plain(_) => self,
            Move::Scored { at, score } => Move::Scored { at, score: score + bonus },
            Move::Bridge { at, score, guards } => Move::Bridge {
                at,
                score: score + bonus,
                guards,
            },
        }
    }
}

impl From<Coord> for Move {
    fn from(at: Coord) -> Self {
        Move::Plain(at)
    }
}
