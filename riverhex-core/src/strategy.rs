//! Heuristic computer strategy
//!
//! One [`Strategy`] per computer side. A move is chosen by the first
//! applicable phase:
//! 1. Bridge defense: answer an intrusion into one of our bridges, or
//!    close an intact bridge once both borders have been reached.
//! 2. Direction update: note a touched border, or follow the opponent.
//! 3. Scoring: every neighbour and bridge candidate around our stones
//!    gets a base value plus progress and freedom bonuses; the first
//!    maximum wins.
//!
//! `direction` is signed: its sign is the orientation along the
//! connection axis, its magnitude counts reached borders (1 = none,
//! 2 = one, 4 = both).

use crate::board::{Board, Cell, Coord, Side};
use crate::error::StrategyError;
use crate::game::Level;
use crate::moves::Move;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Bonus for a candidate lying on the target border
const BORDER_BONUS: i32 = 10;

/// Freedom bonus for an empty neighbour touching the target border
const FREE_BORDER_BONUS: i32 = 6;

/// Direction magnitude once both borders are reached
const BOTH_BORDERS: i32 = 4;

/// Adjacent cell with its base value
struct NearOffset {
    offset: Coord,
    value: i32,
}

/// Two-step cell with its base value and the two cells in between
struct BridgeOffset {
    offset: Coord,
    value: i32,
    guards: [Coord; 2],
}

const fn near(row: i32, col: i32, value: i32) -> NearOffset {
    NearOffset { offset: Coord::new(row, col), value }
}

const fn bridge(row: i32, col: i32, value: i32, g1: (i32, i32), g2: (i32, i32)) -> BridgeOffset {
    BridgeOffset {
        offset: Coord::new(row, col),
        value,
        guards: [Coord::new(g1.0, g1.1), Coord::new(g2.0, g2.1)],
    }
}

const RED_NEAR: [NearOffset; 6] = [
    near(0, -1, 3),
    near(0, 1, 3),
    near(-1, 0, 2),
    near(1, 0, 2),
    near(-1, 1, 3),
    near(1, -1, 3),
];

const BLUE_NEAR: [NearOffset; 6] = [
    near(0, -1, 2),
    near(0, 1, 2),
    near(-1, 0, 3),
    near(1, 0, 3),
    near(-1, 1, 3),
    near(1, -1, 3),
];

const RED_BRIDGES: [BridgeOffset; 6] = [
    bridge(1, -2, 6, (0, -1), (1, -1)),
    bridge(2, -1, 4, (1, -1), (1, 0)),
    bridge(1, 1, 5, (1, 0), (0, 1)),
    bridge(-1, 2, 6, (-1, 1), (0, 1)),
    bridge(-2, 1, 4, (-1, 1), (-1, 0)),
    bridge(-1, -1, 5, (-1, 0), (0, -1)),
];

const BLUE_BRIDGES: [BridgeOffset; 6] = [
    bridge(1, -2, 4, (0, -1), (1, -1)),
    bridge(2, -1, 6, (1, -1), (1, 0)),
    bridge(1, 1, 5, (1, 0), (0, 1)),
    bridge(-1, 2, 4, (-1, 1), (0, 1)),
    bridge(-2, 1, 6, (-1, 1), (-1, 0)),
    bridge(-1, -1, 5, (-1, 0), (0, -1)),
];

/// Neighbour order for the freedom bonus tables
const FREEDOM_OFFSETS: [Coord; 6] = [
    Coord::new(0, -1),
    Coord::new(0, 1),
    Coord::new(-1, 0),
    Coord::new(1, 0),
    Coord::new(-1, 1),
    Coord::new(1, -1),
];

const RED_FREEDOM_UP: [i32; 6] = [1, 3, 2, 2, 1, 3];
const RED_FREEDOM_DOWN: [i32; 6] = [3, 1, 2, 2, 3, 1];
const BLUE_FREEDOM_UP: [i32; 6] = [2, 1, 1, 3, 3, 2];
const BLUE_FREEDOM_DOWN: [i32; 6] = [2, 3, 3, 1, 1, 2];

// ============================================================================
// STRATEGY STATE
// ============================================================================

/// Strategic phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Expand = 0,
    Consolidate = 1,
}

impl Mode {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Mode::Expand),
            1 => Some(Mode::Consolidate),
            _ => None,
        }
    }
}

/// Computer player state for one side
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    side: Side,
    level: Level,
    mode: Mode,
    direction: i32,
}

impl Strategy {
    pub fn new(side: Side, level: Level) -> Self {
        Self {
            side,
            level,
            mode: Mode::Expand,
            direction: 0,
        }
    }

    /// Rebuild a saved strategy verbatim
    pub fn restore(side: Side, level: Level, mode: Mode, direction: i32) -> Self {
        Self {
            side,
            level,
            mode,
            direction,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn direction(&self) -> i32 {
        self.direction
    }

    /// Choose the next move for this side.
    ///
    /// `own` and `opponent` are the match histories in play order. The
    /// caller commits the returned move to the board and to `own`.
    pub fn compute_move<R: Rng>(
        &mut self,
        board: &Board,
        own: &[Move],
        opponent: &[Move],
        rng: &mut R,
    ) -> Result<Move, StrategyError> {
        let mv = if own.is_empty() {
            self.opening(board, rng)?
        } else {
            self.general(board, own, opponent)?
        };

        if !board.is_playable(mv.coord()) {
            return Err(StrategyError::OccupiedCell(mv.coord()));
        }
        Ok(mv)
    }

    // ========================================================================
    // OPENING
    // ========================================================================

    /// Centre cell, sliding across the connection axis if taken
    fn opening<R: Rng>(&mut self, board: &Board, rng: &mut R) -> Result<Move, StrategyError> {
        self.direction = if rng.gen_bool(0.5) { 1 } else { -1 };

        let mid = (board.size() - 1) / 2;
        let center = Coord::new(mid, mid);
        let step = match self.side {
            Side::Red => Coord::new(-self.direction, 0),
            Side::Blue => Coord::new(0, -self.direction),
        };
        let back = Coord::new(-step.row, -step.col);

        let found = slide(board, center, step).or_else(|| slide(board, center, back));
        let at = found.ok_or(StrategyError::NoCandidates)?;
        debug!(side = %self.side, direction = self.direction, "opening at {}", at);
        Ok(Move::Plain(at))
    }

    // ========================================================================
    // GENERAL PLAY
    // ========================================================================

    fn general(&mut self, board: &Board, own: &[Move], opponent: &[Move]) -> Result<Move, StrategyError> {
        if let Some(at) = self.defend_bridges(board, own) {
            return Ok(Move::Plain(at));
        }

        self.update_direction(board, own, opponent);

        let mut pool = Vec::new();
        for mv in own {
            self.collect_candidates(board, mv.coord(), &mut pool);
        }

        let mut best: Option<Move> = None;
        for candidate in &pool {
            let better = match best {
                Some(b) => candidate.score() > b.score(),
                None => true,
            };
            if better {
                best = Some(*candidate);
            }
        }

        let choice = best.ok_or(StrategyError::NoCandidates)?;
        debug!(
            side = %self.side,
            candidates = pool.len(),
            score = choice.score().unwrap_or_default(),
            "chose {}",
            choice.coord()
        );
        Ok(choice)
    }

    /// Guard cell to play, if a bridge needs it
    fn defend_bridges(&self, board: &Board, own: &[Move]) -> Option<Coord> {
        if self.level == Level::Easy {
            return None;
        }

        let opponent = Cell::from(self.side.opponent());
        let mut repair = None;
        for [first, second] in own.iter().filter_map(Move::guards) {
            match (board.get(first), board.get(second)) {
                (a, Cell::Empty) if a == opponent => {
                    debug!(side = %self.side, "bridge intrusion, defending {}", second);
                    return Some(second);
                }
                (Cell::Empty, b) if b == opponent => {
                    debug!(side = %self.side, "bridge intrusion, defending {}", first);
                    return Some(first);
                }
                (Cell::Empty, Cell::Empty) => repair = Some(first),
                _ => {}
            }
        }

        if self.mode == Mode::Consolidate {
            if let Some(at) = repair {
                debug!(side = %self.side, "consolidating bridge at {}", at);
                return Some(at);
            }
        }
        None
    }

    /// Record a touched border, or mirror the opponent before any border is reached
    fn update_direction(&mut self, board: &Board, own: &[Move], opponent: &[Move]) {
        let Some(last) = own.last() else {
            return;
        };
        let size = board.size();
        let pos = self.side.axis(last.coord());

        let touched = (self.direction < 0 && pos == 0) || (self.direction > 0 && pos == size - 1);
        if touched && self.mode == Mode::Expand {
            self.direction = -self.direction * 2;
            if self.direction.abs() == BOTH_BORDERS {
                self.mode = Mode::Consolidate;
                debug!(side = %self.side, "both borders touched, consolidating");
            } else {
                debug!(side = %self.side, direction = self.direction, "border touched");
            }
        } else if !touched && self.level != Level::Easy && self.direction.abs() < 2 {
            let Some(theirs) = opponent.last() else {
                return;
            };
            let pos = self.side.axis(theirs.coord());
            let middle = size / 2;
            if (pos < middle && self.direction > 0) || (pos > middle && self.direction < 0) {
                self.direction = -self.direction;
                debug!(side = %self.side, direction = self.direction, "following opponent");
            }
        }
    }

    // ========================================================================
    // CANDIDATES AND SCORING
    // ========================================================================

    /// Push the playable candidates around `base`, fully scored
    fn collect_candidates(&self, board: &Board, base: Coord, pool: &mut Vec<Move>) {
        let start = pool.len();
        let (near_table, bridge_table) = match self.side {
            Side::Red => (&RED_NEAR, &RED_BRIDGES),
            Side::Blue => (&BLUE_NEAR, &BLUE_BRIDGES),
        };

        for n in near_table {
            let at = base + n.offset;
            if board.is_playable(at) {
                pool.push(Move::Scored { at, score: n.value });
            }
        }

        if self.level != Level::Easy {
            for b in bridge_table {
                let at = base + b.offset;
                let guards = [base + b.guards[0], base + b.guards[1]];
                if board.is_playable(at) && guards.iter().all(|&g| board.is_playable(g)) {
                    pool.push(Move::Bridge { at, score: b.value, guards });
                }
            }
        }

        for candidate in &mut pool[start..] {
            let mut bonus = self.progress_bonus(board, candidate.coord());
            if self.level == Level::Hard {
                bonus += self.freedom_bonus(board, candidate.coord());
            }
            *candidate = candidate.with_bonus(bonus);
        }
    }

    /// Distance travelled towards the target border, plus a border bonus
    fn progress_bonus(&self, board: &Board, at: Coord) -> i32 {
        let size = board.size();
        let pos = self.side.axis(at);
        let mut bonus = if self.direction < 0 { size - pos } else { pos };
        if (pos == 0 && self.direction < 0) || (pos == size - 1 && self.direction > 0) {
            bonus += BORDER_BONUS;
        }
        bonus
    }

    /// Weighted count of empty neighbours
    fn freedom_bonus(&self, board: &Board, at: Coord) -> i32 {
        let up = self.direction > 0;
        let weights = match (self.side, up) {
            (Side::Red, true) => &RED_FREEDOM_UP,
            (Side::Red, false) => &RED_FREEDOM_DOWN,
            (Side::Blue, true) => &BLUE_FREEDOM_UP,
            (Side::Blue, false) => &BLUE_FREEDOM_DOWN,
        };
        let target = if up { board.size() - 1 } else { 0 };

        let mut bonus = 0;
        for (offset, weight) in FREEDOM_OFFSETS.iter().zip(weights) {
            let neighbour = at + *offset;
            // Off-board neighbours read as empty
            if board.get(neighbour) == Cell::Empty {
                bonus += weight;
                if self.side.axis(neighbour) == target {
                    bonus += FREE_BORDER_BONUS;
                }
            }
        }
        bonus
    }
}

/// First playable cell from `start` stepping by `step`
fn slide(board: &Board, start: Coord, step: Coord) -> Option<Coord> {
    let mut at = start;
    while board.contains(at) {
        if board.is_playable(at) {
            return Some(at);
        }
        at = at + step;
    }
    None
}

// ============================================================================
// TESTS
// ============================================================================
