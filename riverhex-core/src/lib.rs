//! RiverHex Core - Connection game engine and AI
//!
//! This crate provides the core game logic for RiverHex:
//! - Board geometry (rhombic grid of hexagonal cells)
//! - Played moves, optionally scored or carrying bridge guards
//! - Win detection by depth-first path search
//! - Heuristic computer strategy (expand / consolidate, bridge defense)
//! - Match orchestration and binary save format

pub mod board;
pub mod moves;
pub mod connect;
pub mod strategy;
pub mod game;
pub mod save;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use board::{Board, Cell, Coord, Side, NEIGHBORS};
pub use moves::Move;
pub use connect::{find_winner, Win};
pub use strategy::{Mode, Strategy};
pub use game::{Game, Level, PlayerKind};
pub use config::MatchConfig;
pub use error::{PlayError, SaveError, StrategyError};
