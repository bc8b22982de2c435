//! Binary save format
//!
//! Little-endian, order significant:
//! - board size (i32), then size² cell bytes, row-major
//! - red kind, blue kind, level, first side (1 byte each)
//! - red history, blue history: count (i32) then move records
//! - per side: presence flag, then side, level, mode (bytes) and direction (i32)
//! - side to move, ended flag, winner (1 byte each)
//!
//! A move record starts with its tag: 1 = plain (row, col), 2 = scored
//! (adds score), 3 = bridge (adds score, guard count, nested records).

use crate::board::{Board, Cell, Coord, Side, MAX_BOARD_SIZE};
use crate::error::SaveError;
use crate::game::{Game, Level, PlayerKind};
use crate::moves::Move;
use crate::strategy::{Mode, Strategy};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Directions a strategy can reach: unset, then magnitude 1, 2 or 4
const VALID_DIRECTIONS: [i32; 7] = [-4, -2, -1, 0, 1, 2, 4];

// ============================================================================
// GAME
// ============================================================================

/// Encode a game
pub fn write_game<W: Write>(game: &Game, w: &mut W) -> Result<(), SaveError> {
    let size = game.board.size();
    write_i32(w, size)?;
    for cell in game.board.cells() {
        write_u8(w, cell.to_byte())?;
    }

    write_u8(w, game.kinds[Side::Red.index()] as u8)?;
    write_u8(w, game.kinds[Side::Blue.index()] as u8)?;
    write_u8(w, game.level as u8)?;
    write_u8(w, Cell::from(game.first).to_byte())?;

    for history in &game.histories {
        write_i32(w, history.len() as i32)?;
        for mv in history {
            write_move(w, mv)?;
        }
    }

    for strategy in &game.strategies {
        write_bool(w, strategy.is_some())?;
        if let Some(s) = strategy {
            write_u8(w, Cell::from(s.side()).to_byte())?;
            write_u8(w, s.level() as u8)?;
            write_u8(w, s.mode() as u8)?;
            write_i32(w, s.direction())?;
        }
    }

    write_u8(w, side_byte(game.current))?;
    write_bool(w, game.ended)?;
    write_u8(w, side_byte(game.winner))?;
    Ok(())
}

/// Decode a game
pub fn read_game<R: Read>(r: &mut R) -> Result<Game, SaveError> {
    let size = read_i32(r)?;
    if !(1..=MAX_BOARD_SIZE).contains(&size) {
        return Err(SaveError::InvalidSize(size));
    }
    let mut cells = Vec::with_capacity((size * size) as usize);
    for _ in 0..size * size {
        cells.push(read_cell(r, "cell")?);
    }
    let board = Board::from_cells(size, cells).ok_or(SaveError::InvalidSize(size))?;

    let red = read_kind(r)?;
    let blue = read_kind(r)?;
    let level = read_level(r)?;
    let first = read_side(r, "first player")?.ok_or(SaveError::InvalidByte {
        field: "first player",
        value: 0,
    })?;

    let red_history = read_history(r)?;
    let blue_history = read_history(r)?;
    for history in [&red_history, &blue_history] {
        check_history(&board, history)?;
    }

    let red_strategy = read_strategy(r)?;
    let blue_strategy = read_strategy(r)?;
    for (slot, strategy) in [(Side::Red, &red_strategy), (Side::Blue, &blue_strategy)] {
        if let Some(s) = strategy {
            if s.side() != slot {
                return Err(SaveError::StrategySide { slot, found: s.side() });
            }
        }
    }

    let current = read_side(r, "current player")?;
    let ended = read_bool(r)?;
    let winner = read_side(r, "winner")?;

    Ok(Game::from_parts(
        board,
        [red, blue],
        level,
        first,
        [red_history, blue_history],
        [red_strategy, blue_strategy],
        current,
        ended,
        winner,
    ))
}

impl Game {
    /// Write the game to a file
    pub fn save_to(&self, path: &Path) -> Result<(), SaveError> {
        let mut w = BufWriter::new(File::create(path)?);
        write_game(self, &mut w)?;
        w.flush()?;
        Ok(())
    }

    /// Read a game from a file
    pub fn load_from(path: &Path) -> Result<Self, SaveError> {
        let mut r = BufReader::new(File::open(path)?);
        read_game(&mut r)
    }
}

// ============================================================================
// MOVES AND STRATEGIES
// ============================================================================

pub fn write_move<W: Write>(w: &mut W, mv: &Move) -> Result<(), SaveError> {
    let at = mv.coord();
    write_u8(w, mv.tag())?;
    write_i32(w, at.row)?;
    write_i32(w, at.col)?;
    if let Some(score) = mv.score() {
        write_i32(w, score)?;
    }
    if let Some(guards) = mv.guards() {
        write_i32(w, guards.len() as i32)?;
        for guard in guards {
            write_move(w, &Move::Plain(guard))?;
        }
    }
    Ok(())
}

pub fn read_move<R: Read>(r: &mut R) -> Result<Move, SaveError> {
    let tag = read_u8(r)?;
    if !(Move::TAG_PLAIN..=Move::TAG_BRIDGE).contains(&tag) {
        return Err(SaveError::UnknownMoveTag(tag));
    }

    let at = Coord::new(read_i32(r)?, read_i32(r)?);
    if tag == Move::TAG_PLAIN {
        return Ok(Move::Plain(at));
    }

    let score = read_i32(r)?;
    if tag == Move::TAG_SCORED {
        return Ok(Move::Scored { at, score });
    }

    let count = read_i32(r)?;
    if count != 2 {
        return Err(SaveError::GuardCount(count));
    }
    let first = read_move(r)?.coord();
    let second = read_move(r)?.coord();
    Ok(Move::Bridge {
        at,
        score,
        guards: [first, second],
    })
}

fn read_history<R: Read>(r: &mut R) -> Result<Vec<Move>, SaveError> {
    let count = read_i32(r)?;
    if !(0..=MAX_BOARD_SIZE * MAX_BOARD_SIZE).contains(&count) {
        return Err(SaveError::InvalidLength(count));
    }
    (0..count).map(|_| read_move(r)).collect()
}

/// Every recorded cell and bridge guard must lie on the board
fn check_history(board: &Board, history: &[Move]) -> Result<(), SaveError> {
    for mv in history {
        let guards = mv.guards().unwrap_or([mv.coord(); 2]);
        for at in std::iter::once(mv.coord()).chain(guards) {
            if !board.contains(at) {
                return Err(SaveError::InvalidCoord(at));
            }
        }
    }
    Ok(())
}

fn read_strategy<R: Read>(r: &mut R) -> Result<Option<Strategy>, SaveError> {
    if !read_bool(r)? {
        return Ok(None);
    }
    let side = read_side(r, "strategy side")?.ok_or(SaveError::InvalidByte {
        field: "strategy side",
        value: 0,
    })?;
    let level = read_level(r)?;
    let byte = read_u8(r)?;
    let mode = Mode::from_byte(byte).ok_or(SaveError::InvalidByte { field: "mode", value: byte })?;
    let direction = read_i32(r)?;
    if !VALID_DIRECTIONS.contains(&direction) {
        return Err(SaveError::InvalidDirection(direction));
    }
    Ok(Some(Strategy::restore(side, level, mode, direction)))
}

// ============================================================================
// PRIMITIVES
// ============================================================================

fn side_byte(side: Option<Side>) -> u8 {
    side.map(Cell::from).unwrap_or(Cell::Empty).to_byte()
}

fn read_cell<R: Read>(r: &mut R, field: &'static str) -> Result<Cell, SaveError> {
    let byte = read_u8(r)?;
    Cell::from_byte(byte).ok_or(SaveError::InvalidByte { field, value: byte })
}

fn read_side<R: Read>(r: &mut R, field: &'static str) -> Result<Option<Side>, SaveError> {
    Ok(read_cell(r, field)?.side())
}

fn read_kind<R: Read>(r: &mut R) -> Result<PlayerKind, SaveError> {
    let byte = read_u8(r)?;
    PlayerKind::from_byte(byte).ok_or(SaveError::InvalidByte { field: "player kind", value: byte })
}

fn read_level<R: Read>(r: &mut R) -> Result<Level, SaveError> {
    let byte = read_u8(r)?;
    Level::from_byte(byte).ok_or(SaveError::InvalidByte { field: "level", value: byte })
}

fn write_u8<W: Write>(w: &mut W, value: u8) -> Result<(), SaveError> {
    w.write_all(&[value])?;
    Ok(())
}

fn write_bool<W: Write>(w: &mut W, value: bool) -> Result<(), SaveError> {
    write_u8(w, value as u8)
}

fn write_i32<W: Write>(w: &mut W, value: i32) -> Result<(), SaveError> {
    w.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_u8<R: Read>(r: &mut R) -> Result<u8, SaveError> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_bool<R: Read>(r: &mut R) -> Result<bool, SaveError> {
    Ok(read_u8(r)? != 0)
}

fn read_i32<R: Read>(r: &mut R) -> Result<i32, SaveError> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;

    fn encode(game: &Game) -> Vec<u8> {
        let mut bytes = Vec::new();
        write_game(game, &mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_empty_game_layout() {
        let game = Game::with_seed(&MatchConfig::default(), 1);
        let bytes = encode(&game);
        // size + 49 cells + 4 settings + 2 history counts + 2 flags + 3 trailing
        assert_eq!(bytes.len(), 4 + 49 + 4 + 8 + 2 + 3);
        assert_eq!(&bytes[0..4], &7i32.to_le_bytes());
        // red human, blue computer, easy, red first
        assert_eq!(&bytes[53..57], &[0, 1, 0, 1]);
        // current red, not ended, no winner
        assert_eq!(&bytes[bytes.len() - 3..], &[1, 0, 0]);
    }

    #[test]
    fn test_move_records() {
        let mut bytes = Vec::new();
        write_move(&mut bytes, &Move::Plain(Coord::new(1, 2))).unwrap();
        assert_eq!(bytes, [1, 1, 0, 0, 0, 2, 0, 0, 0]);

        let bridge = Move::Bridge {
            at: Coord::new(2, 5),
            score: 11,
            guards: [Coord::new(2, 4), Coord::new(3, 4)],
        };
        let mut bytes = Vec::new();
        write_move(&mut bytes, &bridge).unwrap();
        assert_eq!(bytes[0], 3);
        assert_eq!(bytes.len(), 1 + 8 + 4 + 4 + 2 * 9);
        assert_eq!(read_move(&mut bytes.as_slice()).unwrap(), bridge);
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        let bytes = [4u8, 0, 0, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            read_move(&mut bytes.as_slice()),
            Err(SaveError::UnknownMoveTag(4))
        ));
    }

    #[test]
    fn test_bad_guard_count() {
        let mut bytes = vec![3u8];
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        bytes.extend_from_slice(&5i32.to_le_bytes());
        bytes.extend_from_slice(&1i32.to_le_bytes());
        assert!(matches!(
            read_move(&mut bytes.as_slice()),
            Err(SaveError::GuardCount(1))
        ));
    }

    #[test]
    fn test_out_of_board_history_is_rejected() {
        let mut game = Game::with_seed(&MatchConfig::self_play(7, Level::Medium), 3);
        game.computer_play().unwrap();
        game.histories[0].push(Move::Plain(Coord::new(i32::MAX, 0)));
        assert!(matches!(
            read_game(&mut encode(&game).as_slice()),
            Err(SaveError::InvalidCoord(c)) if c == Coord::new(i32::MAX, 0)
        ));

        let mut game = Game::with_seed(&MatchConfig::self_play(7, Level::Medium), 3);
        game.histories[1].push(Move::Bridge {
            at: Coord::new(1, 1),
            score: 5,
            guards: [Coord::new(1, 0), Coord::new(-1, 2)],
        });
        assert!(matches!(
            read_game(&mut encode(&game).as_slice()),
            Err(SaveError::InvalidCoord(c)) if c == Coord::new(-1, 2)
        ));
    }

    #[test]
    fn test_rejected_history_never_reaches_play() {
        // A corrupt record must fail on load, not inside the next computer move
        let mut game = Game::with_seed(&MatchConfig::self_play(7, Level::Hard), 3);
        game.histories[0].push(Move::Plain(Coord::new(i32::MAX, 0)));
        game.current = Some(Side::Red);
        let bytes = encode(&game);
        match read_game(&mut bytes.as_slice()) {
            Ok(mut loaded) => panic!("corrupt save accepted: {:?}", loaded.computer_play()),
            Err(e) => assert!(matches!(e, SaveError::InvalidCoord(_))),
        }
    }

    #[test]
    fn test_strategy_record_checked() {
        let mut game = Game::with_seed(&MatchConfig::self_play(7, Level::Easy), 1);
        game.strategies[0] = Some(Strategy::new(Side::Blue, Level::Easy));
        assert!(matches!(
            read_game(&mut encode(&game).as_slice()),
            Err(SaveError::StrategySide { slot: Side::Red, found: Side::Blue })
        ));

        let mut game = Game::with_seed(&MatchConfig::self_play(7, Level::Easy), 1);
        game.strategies[1] = Some(Strategy::restore(Side::Blue, Level::Easy, Mode::Expand, i32::MIN));
        assert!(matches!(
            read_game(&mut encode(&game).as_slice()),
            Err(SaveError::InvalidDirection(i32::MIN))
        ));
    }

    #[test]
    fn test_truncated_input() {
        let game = Game::with_seed(&MatchConfig::default(), 1);
        let bytes = encode(&game);
        let cut = &bytes[..bytes.len() - 1];
        assert!(matches!(read_game(&mut &cut[..]), Err(SaveError::Io(_))));
    }

    #[test]
    fn test_invalid_size() {
        let bytes = (-3i32).to_le_bytes();
        assert!(matches!(
            read_game(&mut bytes.as_slice()),
            Err(SaveError::InvalidSize(-3))
        ));
    }

    #[test]
    fn test_round_trip_mid_game() {
        let config = MatchConfig::self_play(9, Level::Hard);
        let mut game = Game::with_seed(&config, 21);
        for _ in 0..8 {
            game.computer_play().unwrap();
        }
        let bytes = encode(&game);
        let mut loaded = read_game(&mut bytes.as_slice()).unwrap();

        assert_eq!(loaded.board(), game.board());
        for side in [Side::Red, Side::Blue] {
            assert_eq!(loaded.history(side), game.history(side));
            assert_eq!(loaded.strategy(side), game.strategy(side));
        }
        assert_eq!(loaded.current(), game.current());
        assert_eq!(encode(&loaded), bytes);

        // Both continue identically
        while !game.is_ended() {
            assert_eq!(loaded.computer_play().unwrap(), game.computer_play().unwrap());
        }
        assert_eq!(loaded.winner(), game.winner());
    }

    #[test]
    fn test_round_trip_finished_game_rebuilds_path() {
        let config = MatchConfig::self_play(7, Level::Medium);
        let mut game = Game::with_seed(&config, 4);
        while !game.is_ended() {
            game.computer_play().unwrap();
        }
        let loaded = read_game(&mut encode(&game).as_slice()).unwrap();
        assert!(loaded.is_ended());
        assert_eq!(loaded.winner(), game.winner());
        assert_eq!(loaded.winning_path(), game.winning_path());
        assert_eq!(loaded.current(), None);
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("riverhex-save-{}.bin", std::process::id()));
        let mut game = Game::with_seed(&MatchConfig::self_play(7, Level::Easy), 2);
        game.computer_play().unwrap();
        game.save_to(&path).unwrap();
        let loaded = Game::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.history(Side::Red), game.history(Side::Red));
    }
}
