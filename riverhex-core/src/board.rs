//! Rhombic hex board with (row, col) coordinates
//!
//! Red owns the column borders (col 0 and col size-1), Blue owns the row
//! borders (row 0 and row size-1). Each cell touches six neighbours.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// Largest board the save format accepts
pub const MAX_BOARD_SIZE: i32 = 32;

/// Cell address, zero-based
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i32,
    pub col: i32,
}

impl Coord {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, other: Coord) -> Coord {
        Coord::new(self.row + other.row, self.col + other.col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Neighbour offsets in path-search order
pub const NEIGHBORS: [Coord; 6] = [
    Coord::new(1, 0),
    Coord::new(-1, 0),
    Coord::new(0, 1),
    Coord::new(0, -1),
    Coord::new(-1, 1),
    Coord::new(1, -1),
];

// ============================================================================
// SIDES AND CELLS
// ============================================================================

/// One of the two competing players
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red = 1,
    Blue = 2,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Red => Side::Blue,
            Side::Blue => Side::Red,
        }
    }

    /// Slot in per-side arrays
    pub fn index(self) -> usize {
        match self {
            Side::Red => 0,
            Side::Blue => 1,
        }
    }

    /// Coordinate component along this side's connection axis
    pub fn axis(self, at: Coord) -> i32 {
        match self {
            Side::Red => at.col,
            Side::Blue => at.row,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Red => write!(f, "red"),
            Side::Blue => write!(f, "blue"),
        }
    }
}

impl FromStr for Side {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "red" | "a" => Ok(Side::Red),
            "blue" | "b" => Ok(Side::Blue),
            other => Err(anyhow::anyhow!("Unknown side: {}", other)),
        }
    }
}

/// Ownership of a single cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty = 0,
    Red = 1,
    Blue = 2,
}

impl Cell {
    pub fn to_byte(self) -> u8 {
        self as u8
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Red),
            2 => Some(Cell::Blue),
            _ => None,
        }
    }

    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Red => Some(Side::Red),
            Cell::Blue => Some(Side::Blue),
        }
    }
}

impl From<Side> for Cell {
    fn from(side: Side) -> Self {
        match side {
            Side::Red => Cell::Red,
            Side::Blue => Cell::Blue,
        }
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// N x N grid of cell ownership, row-major
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: i32,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(size: i32) -> Self {
        let size = size.max(0);
        Self {
            size,
            cells: vec![Cell::Empty; (size * size) as usize],
        }
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    /// Check if a coordinate lies on the board
    pub fn contains(&self, at: Coord) -> bool {
        at.row >= 0 && at.col >= 0 && at.row < self.size && at.col < self.size
    }

    /// Cell state; out-of-bounds reads as empty
    pub fn get(&self, at: Coord) -> Cell {
        if !self.contains(at) {
            return Cell::Empty;
        }
        self.cells[self.index(at)]
    }

    /// In bounds and empty
    pub fn is_playable(&self, at: Coord) -> bool {
        self.contains(at) && self.cells[self.index(at)] == Cell::Empty
    }

    /// Overwrite a cell. Returns false when out of bounds.
    pub fn set(&mut self, at: Coord, cell: Cell) -> bool {
        if !self.contains(at) {
            return false;
        }
        let idx = self.index(at);
        self.cells[idx] = cell;
        true
    }

    /// Number of owned cells
    pub fn occupied(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied() == 0
    }

    /// Cells in row-major order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Build from row-major cells; `None` if the count does not match
    pub fn from_cells(size: i32, cells: Vec<Cell>) -> Option<Self> {
        if size < 0 || cells.len() != (size * size) as usize {
            return None;
        }
        Some(Self { size, cells })
    }

    /// Text rhombus with the given path marked by `*`
    pub fn render_with_path(&self, path: &[Coord]) -> String {
        let mut out = String::new();
        for row in 0..self.size {
            out.push_str(&" ".repeat(row as usize));
            for col in 0..self.size {
                let at = Coord::new(row, col);
                let ch = if path.contains(&at) {
                    '*'
                } else {
                    match self.get(at) {
                        Cell::Empty => '.',
                        Cell::Red => 'R',
                        Cell::Blue => 'B',
                    }
                };
                out.push(ch);
                if col + 1 < self.size {
                    out.push(' ');
                }
            }
            out.push('\n');
        }
        out
    }

    fn index(&self, at: Coord) -> usize {
        (at.row * self.size + at.col) as usize
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_path(&[]))
    }
}
