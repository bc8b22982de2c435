//! Batch command - computer-vs-computer statistics
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play_batch(), report_results()
//! - Level 3: play_single_game(), compute_batch_statistics()
//! - Level 4: formatting utilities

use anyhow::Result;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use riverhex_core::{Game, Level, MatchConfig, Side};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BatchArgs {
    /// Number of games to play (first side alternates)
    #[arg(long, default_value = "100")]
    pub games: usize,

    /// Board size (7, 9 or 11)
    #[arg(long, default_value = "7")]
    pub size: i32,

    /// Computer level for both sides
    #[arg(long, default_value = "medium")]
    pub level: Level,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Result of a single game
#[derive(Clone, Debug)]
struct GameRecord {
    game_number: usize,
    first: Side,
    winner: Side,
    moves: usize,
}

/// Aggregated batch results
#[derive(Clone, Debug)]
struct BatchResults {
    games: Vec<GameRecord>,
    red_wins: usize,
    blue_wins: usize,
    first_player_wins: usize,
    avg_moves: f32,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run batch command
pub fn run(args: BatchArgs, seed: Option<u64>) -> Result<()> {
    MatchConfig::self_play(args.size, args.level).validate()?;

    tracing::info!(
        "Starting batch: {} games, size={}, level={}",
        args.games,
        args.size,
        args.level
    );

    let results = play_batch(&args, seed)?;
    report_results(&results, &args);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Play all games in parallel
fn play_batch(args: &BatchArgs, seed: Option<u64>) -> Result<BatchResults> {
    let mut rng = create_rng(seed);
    let seeds: Vec<u64> = (0..args.games).map(|_| rng.gen()).collect();

    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games ({eta})")?,
    );

    let games = seeds
        .par_iter()
        .enumerate()
        .map(|(i, &game_seed)| {
            let record = play_single_game(i + 1, args, game_seed);
            progress.inc(1);
            record
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish_and_clear();

    Ok(compute_batch_statistics(games))
}

/// Report batch results
fn report_results(results: &BatchResults, args: &BatchArgs) {
    if args.json {
        print_json_results(results);
    } else {
        print_text_results(results);
    }
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Play one game to the end
fn play_single_game(game_number: usize, args: &BatchArgs, seed: u64) -> Result<GameRecord> {
    let mut config = MatchConfig::self_play(args.size, args.level);
    if game_number % 2 == 0 {
        config.first = Side::Blue;
    }

    let mut game = Game::with_seed(&config, seed);
    while !game.is_ended() {
        game.computer_play()?;
    }

    let winner = game
        .winner()
        .ok_or_else(|| anyhow::anyhow!("Game {} ended without a winner", game_number))?;
    let moves = game.history(Side::Red).len() + game.history(Side::Blue).len();
    tracing::debug!("Game {}: {} wins in {} moves", game_number, winner, moves);

    Ok(GameRecord {
        game_number,
        first: config.first,
        winner,
        moves,
    })
}

/// Compute aggregate statistics
fn compute_batch_statistics(games: Vec<GameRecord>) -> BatchResults {
    let red_wins = games.iter().filter(|g| g.winner == Side::Red).count();
    let blue_wins = games.iter().filter(|g| g.winner == Side::Blue).count();
    let first_player_wins = games.iter().filter(|g| g.winner == g.first).count();

    let total_moves: usize = games.iter().map(|g| g.moves).sum();
    let avg_moves = if games.is_empty() {
        0.0
    } else {
        total_moves as f32 / games.len() as f32
    };

    BatchResults {
        games,
        red_wins,
        blue_wins,
        first_player_wins,
        avg_moves,
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

/// Create RNG from seed or random
fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn percent(count: usize, total: usize) -> f32 {
    if total > 0 {
        count as f32 / total as f32 * 100.0
    } else {
        0.0
    }
}

/// Print results as JSON
fn print_json_results(results: &BatchResults) {
    #[derive(serde::Serialize)]
    struct JsonGame {
        game_number: usize,
        first: Side,
        winner: Side,
        moves: usize,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        total_games: usize,
        red_wins: usize,
        blue_wins: usize,
        first_player_wins: usize,
        avg_moves: f32,
        games: Vec<JsonGame>,
    }

    let output = JsonOutput {
        total_games: results.games.len(),
        red_wins: results.red_wins,
        blue_wins: results.blue_wins,
        first_player_wins: results.first_player_wins,
        avg_moves: results.avg_moves,
        games: results
            .games
            .iter()
            .map(|g| JsonGame {
                game_number: g.game_number,
                first: g.first,
                winner: g.winner,
                moves: g.moves,
            })
            .collect(),
    };

    if let Ok(json) = serde_json::to_string_pretty(&output) {
        println!("{}", json);
    }
}

/// Print results as text
fn print_text_results(results: &BatchResults) {
    let total = results.games.len();

    println!("\n=== Batch Results ===");
    println!("Total games:  {}", total);
    println!("Red wins:     {} ({:.1}%)", results.red_wins, percent(results.red_wins, total));
    println!("Blue wins:    {} ({:.1}%)", results.blue_wins, percent(results.blue_wins, total));
    println!(
        "First player: {} ({:.1}%)",
        results.first_player_wins,
        percent(results.first_player_wins, total)
    );
    println!("Avg moves:    {:.1}", results.avg_moves);
}

// ============================================================================
// TESTS
// ============================================================================
