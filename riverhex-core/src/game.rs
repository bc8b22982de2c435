//! Match orchestration
//!
//! A [`Game`] owns the board, both histories and the lazily created
//! computer strategies. Moves alternate; after every move the board is
//! checked for a completed chain.

use crate::board::{Board, Cell, Coord, Side};
use crate::config::MatchConfig;
use crate::connect::find_winner;
use crate::error::PlayError;
use crate::moves::Move;
use crate::strategy::Strategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Who controls a side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    Human = 0,
    Computer = 1,
}

impl PlayerKind {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(PlayerKind::Human),
            1 => Some(PlayerKind::Computer),
            _ => None,
        }
    }
}

impl FromStr for PlayerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "human" => Ok(PlayerKind::Human),
            "computer" | "cpu" => Ok(PlayerKind::Computer),
            other => Err(anyhow::anyhow!("Unknown player kind: {}", other)),
        }
    }
}

/// Computer playing level
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Easy = 0,
    Medium = 1,
    Hard = 2,
}

impl Level {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Level::Easy),
            1 => Some(Level::Medium),
            2 => Some(Level::Hard),
            _ => None,
        }
    }

    /// Easy -> Medium -> Hard -> Easy
    pub fn next(self) -> Self {
        match self {
            Level::Easy => Level::Medium,
            Level::Medium => Level::Hard,
            Level::Hard => Level::Easy,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Easy => write!(f, "easy"),
            Level::Medium => write!(f, "medium"),
            Level::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Level {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            other => Err(anyhow::anyhow!("Unknown level: {}", other)),
        }
    }
}

// ============================================================================
// GAME
// ============================================================================

/// A match in progress
#[derive(Clone, Debug)]
pub struct Game {
    pub(crate) board: Board,
    pub(crate) kinds: [PlayerKind; 2],
    pub(crate) level: Level,
    pub(crate) first: Side,
    pub(crate) histories: [Vec<Move>; 2],
    pub(crate) strategies: [Option<Strategy>; 2],
    /// `None` once the game has ended
    pub(crate) current: Option<Side>,
    pub(crate) ended: bool,
    pub(crate) winner: Option<Side>,
    pub(crate) winning_path: Vec<Coord>,
    rng: ChaCha8Rng,
}

impl Game {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    pub fn new(config: &MatchConfig) -> Self {
        Self::with_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Deterministic opening choices
    pub fn with_seed(config: &MatchConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(config: &MatchConfig, rng: ChaCha8Rng) -> Self {
        Self {
            board: Board::new(config.size),
            kinds: [config.red, config.blue],
            level: config.level,
            first: config.first,
            histories: [Vec::new(), Vec::new()],
            strategies: [None, None],
            current: Some(config.first),
            ended: false,
            winner: None,
            winning_path: Vec::new(),
            rng,
        }
    }

    /// Assemble a game from decoded parts; used by the save reader
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        board: Board,
        kinds: [PlayerKind; 2],
        level: Level,
        first: Side,
        histories: [Vec<Move>; 2],
        strategies: [Option<Strategy>; 2],
        current: Option<Side>,
        ended: bool,
        winner: Option<Side>,
    ) -> Self {
        let mut game = Self {
            board,
            kinds,
            level,
            first,
            histories,
            strategies,
            current,
            ended: false,
            winner,
            winning_path: Vec::new(),
            rng: ChaCha8Rng::from_entropy(),
        };
        // Rebuild the winning path
        if ended {
            game.check_end_of_game();
            game.ended = true;
        }
        game
    }

    /// Replace the RNG used for opening choices
    pub fn reseed(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }

    /// Settings this game was created with
    pub fn config(&self) -> MatchConfig {
        MatchConfig {
            size: self.board.size(),
            red: self.kinds[Side::Red.index()],
            blue: self.kinds[Side::Blue.index()],
            level: self.level,
            first: self.first,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> i32 {
        self.board.size()
    }

    pub fn history(&self, side: Side) -> &[Move] {
        &self.histories[side.index()]
    }

    pub fn strategy(&self, side: Side) -> Option<&Strategy> {
        self.strategies[side.index()].as_ref()
    }

    pub fn player_kind(&self, side: Side) -> PlayerKind {
        self.kinds[side.index()]
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn first(&self) -> Side {
        self.first
    }

    /// Side to move; `None` once the game has ended
    pub fn current(&self) -> Option<Side> {
        self.current
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub fn winning_path(&self) -> &[Coord] {
        &self.winning_path
    }

    /// No cell owned yet
    pub fn is_empty(&self) -> bool {
        self.board.is_empty()
    }

    /// Is a computer expected to move now
    pub fn computer_to_move(&self) -> bool {
        matches!(self.current, Some(side) if self.player_kind(side) == PlayerKind::Computer)
    }

    // ========================================================================
    // PLAY
    // ========================================================================

    /// Human move at `at`
    pub fn human_play(&mut self, at: Coord) -> Result<(), PlayError> {
        let side = self.current.ok_or(PlayError::GameOver)?;
        if self.ended {
            return Err(PlayError::GameOver);
        }
        if self.player_kind(side) != PlayerKind::Human {
            return Err(PlayError::NotYourTurn(side));
        }
        if !self.board.is_playable(at) {
            return Err(PlayError::NotPlayable(at));
        }

        self.commit(side, Move::Plain(at));
        Ok(())
    }

    /// Let the computer move if it is its turn.
    ///
    /// Returns `Ok(None)` when the game is over or a human is to move.
    pub fn computer_play(&mut self) -> Result<Option<Coord>, PlayError> {
        let side = match self.current {
            Some(side) if !self.ended && self.player_kind(side) == PlayerKind::Computer => side,
            _ => return Ok(None),
        };

        let level = self.level;
        let strategy = self.strategies[side.index()].get_or_insert_with(|| Strategy::new(side, level));
        let mv = strategy.compute_move(
            &self.board,
            &self.histories[side.index()],
            &self.histories[side.opponent().index()],
            &mut self.rng,
        )?;

        self.commit(side, mv);
        Ok(Some(mv.coord()))
    }

    /// Overwrite a cell without touching histories or turn.
    /// Returns false when out of bounds.
    pub fn force_cell(&mut self, at: Coord, cell: Cell) -> bool {
        self.board.set(at, cell)
    }

    fn commit(&mut self, side: Side, mv: Move) {
        self.board.set(mv.coord(), side.into());
        self.histories[side.index()].push(mv);
        self.current = Some(side.opponent());
        self.check_end_of_game();
    }

    fn check_end_of_game(&mut self) {
        if self.ended {
            return;
        }
        if let Some(win) = find_winner(&self.board) {
            info!(winner = %win.side, length = win.path.len(), "game won");
            self.winner = Some(win.side);
            self.winning_path = win.path;
            self.ended = true;
            self.current = None;
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
