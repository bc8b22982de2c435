//! Win detection
//!
//! Depth-first search from each border cell. Red searches from `(i, 0)`
//! towards column `size-1`, Blue from `(0, i)` towards row `size-1`. For
//! every border index Red is tried before Blue, and neighbours are explored
//! in [`NEIGHBORS`] order, so a given board always yields the same path.

use crate::board::{Board, Cell, Coord, Side, NEIGHBORS};
use rustc_hash::FxHashSet;

/// A completed chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Win {
    pub side: Side,
    /// Cells from the starting border to the far border
    pub path: Vec<Coord>,
}

/// Find the side (if any) whose cells join its two borders
pub fn find_winner(board: &Board) -> Option<Win> {
    let mut red = PathSearch::new(Side::Red);
    let mut blue = PathSearch::new(Side::Blue);

    for i in 0..board.size() {
        if let Some(path) = red.search(board, Coord::new(i, 0)) {
            return Some(Win { side: Side::Red, path });
        }
        if let Some(path) = blue.search(board, Coord::new(0, i)) {
            return Some(Win { side: Side::Blue, path });
        }
    }
    None
}

/// Check a single side without building a path
pub fn has_won(board: &Board, side: Side) -> bool {
    let mut search = PathSearch::new(side);
    (0..board.size()).any(|i| {
        let start = match side {
            Side::Red => Coord::new(i, 0),
            Side::Blue => Coord::new(0, i),
        };
        search.search(board, start).is_some()
    })
}

/// Per-side search state.
///
/// A cell whose exploration failed cannot lead to the far border from any
/// later path either, so visited cells stay visited across the whole
/// search. The first path found is the one a backtracking simple-path
/// search would return.
struct PathSearch {
    side: Side,
    visited: FxHashSet<Coord>,
}

impl PathSearch {
    fn new(side: Side) -> Self {
        Self {
            side,
            visited: FxHashSet::default(),
        }
    }

    fn search(&mut self, board: &Board, start: Coord) -> Option<Vec<Coord>> {
        let mut path = Vec::new();
        if self.explore(board, start, &mut path) {
            Some(path)
        } else {
            None
        }
    }

    fn explore(&mut self, board: &Board, at: Coord, path: &mut Vec<Coord>) -> bool {
        if !board.contains(at) || board.get(at) != Cell::from(self.side) {
            return false;
        }
        if !self.visited.insert(at) {
            return false;
        }

        path.push(at);
        if self.side.axis(at) == board.size() - 1 {
            return true;
        }
        for offset in NEIGHBORS {
            if self.explore(board, at + offset, path) {
                return true;
            }
        }
        path.pop();
        false
    }
}
