//! Interactive play, resume and show commands

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use riverhex_core::{Coord, Game, Level, MatchConfig, PlayError, PlayerKind, Side};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Match settings JSON file (flags below override it)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Board size (7, 9 or 11)
    #[arg(long)]
    pub size: Option<i32>,

    /// Red player: human or computer
    #[arg(long)]
    pub red: Option<PlayerKind>,

    /// Blue player: human or computer
    #[arg(long)]
    pub blue: Option<PlayerKind>,

    /// Computer level: easy, medium or hard
    #[arg(long)]
    pub level: Option<Level>,

    /// Side moving first
    #[arg(long)]
    pub first: Option<Side>,

    /// Save the match here on exit
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

#[derive(Args)]
pub struct ResumeArgs {
    /// Saved match
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Save the match here on exit (defaults to the input file)
    #[arg(long, value_name = "FILE")]
    pub save: Option<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Saved match
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,
}

// ============================================================================
// COMMANDS
// ============================================================================

/// Start a new match, offering a rematch once it is decided
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    let mut config = build_config(&args)?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    for round in 0u64.. {
        tracing::info!(
            "New match: size={}, red={:?}, blue={:?}, level={}, first={}",
            config.size,
            config.red,
            config.blue,
            config.level,
            config.first
        );
        let mut game = match seed {
            Some(s) => Game::with_seed(&config, s.wrapping_add(round)),
            None => Game::new(&config),
        };
        play_loop(&mut game, &mut lines, args.save.as_deref())?;
        if !game.is_ended() {
            break;
        }

        print!("Play again? [y]es, [s]wap sides, [l]evel up, [n]o: ");
        io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        match rematch_config(&game, line.trim()) {
            Some(next) => config = next,
            None => break,
        }
    }
    Ok(())
}

/// Continue a saved match
pub fn resume(args: ResumeArgs, seed: Option<u64>) -> Result<()> {
    let mut game = Game::load_from(&args.file)
        .with_context(|| format!("Failed to load match: {}", args.file.display()))?;
    if let Some(s) = seed {
        game.reseed(s);
    }
    let save = args.save.unwrap_or(args.file);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    play_loop(&mut game, &mut lines, Some(&save))
}

/// Print a saved match
pub fn show(args: ShowArgs) -> Result<()> {
    let game = Game::load_from(&args.file)
        .with_context(|| format!("Failed to load match: {}", args.file.display()))?;

    let config = game.config();
    println!(
        "Size {}, level {}, {} moved first",
        config.size, config.level, config.first
    );
    print_board(&game);
    for side in [Side::Red, Side::Blue] {
        let moves: Vec<String> = game.history(side).iter().map(|m| m.coord().to_string()).collect();
        println!("{:<5} ({:?}): {}", side.to_string(), game.player_kind(side), moves.join(" "));
        if let Some(strategy) = game.strategy(side) {
            println!(
                "      strategy: level={}, mode={:?}, direction={}",
                strategy.level(),
                strategy.mode(),
                strategy.direction()
            );
        }
    }
    match (game.winner(), game.current()) {
        (Some(winner), _) => println!("Winner: {}", winner),
        (None, Some(side)) => println!("{} to move", side),
        (None, None) => println!("No side to move"),
    }
    Ok(())
}

// ============================================================================
// HELPERS
// ============================================================================

fn build_config(args: &PlayArgs) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => MatchConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => MatchConfig::default(),
    };
    if let Some(size) = args.size {
        config.size = size;
    }
    if let Some(red) = args.red {
        config.red = red;
    }
    if let Some(blue) = args.blue {
        config.blue = blue;
    }
    if let Some(level) = args.level {
        config.level = level;
    }
    if let Some(first) = args.first {
        config.first = first;
    }
    config.validate()?;
    Ok(config)
}

fn play_loop<I>(game: &mut Game, lines: &mut I, save: Option<&Path>) -> Result<()>
where
    I: Iterator<Item = io::Result<String>>,
{
    print_board(game);
    while let Some(side) = game.current() {
        if game.computer_to_move() {
            if let Some(at) = game.computer_play()? {
                println!("{} plays {}", side, at);
            }
        } else {
            print!("{} to move (row col, or quit): ", side);
            io::stdout().flush()?;
            let Some(line) = lines.next().transpose()? else {
                break;
            };
            let line = line.trim();
            if line.eq_ignore_ascii_case("quit") {
                break;
            }
            let Some(at) = parse_coord(line) else {
                println!("Expected two numbers, e.g. `3 4`");
                continue;
            };
            match game.human_play(at) {
                Ok(()) => {}
                Err(PlayError::NotPlayable(at)) => {
                    println!("Cell {} is not playable", at);
                    continue;
                }
                Err(e) => return Err(e.into()),
            }
        }
        print_board(game);
    }

    if let Some(winner) = game.winner() {
        println!("\n{} wins!", winner);
        print!("{}", game.board().render_with_path(game.winning_path()));
    }

    if let Some(path) = save {
        game.save_to(path)
            .with_context(|| format!("Failed to save match: {}", path.display()))?;
        tracing::info!("Saved match to {}", path.display());
    }
    Ok(())
}

/// Settings for the next match: same, sides swapped, or next level
fn rematch_config(game: &Game, answer: &str) -> Option<MatchConfig> {
    let config = game.config();
    match answer.to_ascii_lowercase().as_str() {
        "y" | "yes" => Some(config),
        "s" | "swap" => Some(config.swapped()),
        "l" | "level" => Some(MatchConfig {
            level: config.next_level(),
            ..config
        }),
        _ => None,
    }
}

fn parse_coord(line: &str) -> Option<Coord> {
    let mut parts = line.split(|c: char| c == ',' || c.is_whitespace()).filter(|p| !p.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Coord::new(row, col))
}

fn print_board(game: &Game) {
    println!();
    print!("{}", game.board());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_coord() {
        assert_eq!(parse_coord("3 4"), Some(Coord::new(3, 4)));
        assert_eq!(parse_coord(" 0,6 "), Some(Coord::new(0, 6)));
        assert_eq!(parse_coord("3"), None);
        assert_eq!(parse_coord("a b"), None);
        assert_eq!(parse_coord("1 2 3"), None);
    }

    #[test]
    fn test_build_config_overrides() {
        let args = PlayArgs {
            config: None,
            size: Some(9),
            red: Some(PlayerKind::Computer),
            blue: None,
            level: Some(Level::Hard),
            first: Some(Side::Blue),
            save: None,
        };
        let config = build_config(&args).unwrap();
        assert_eq!(config.size, 9);
        assert_eq!(config.red, PlayerKind::Computer);
        assert_eq!(config.blue, PlayerKind::Computer);
        assert_eq!(config.level, Level::Hard);
        assert_eq!(config.first, Side::Blue);
    }

    #[test]
    fn test_rematch_config() {
        let config = MatchConfig {
            size: 9,
            ..Default::default()
        };
        let game = Game::with_seed(&config, 1);

        assert_eq!(rematch_config(&game, "y"), Some(config.clone()));
        let swapped = rematch_config(&game, "swap").unwrap();
        assert_eq!(swapped.red, PlayerKind::Computer);
        assert_eq!(swapped.blue, PlayerKind::Human);
        assert_eq!(swapped.size, 9);
        assert_eq!(rematch_config(&game, "L").unwrap().level, Level::Medium);
        assert_eq!(rematch_config(&game, "n"), None);
    }

    #[test]
    fn test_human_loop_plays_until_input_ends() {
        let mut game = Game::with_seed(&MatchConfig::default(), 5);
        let mut lines = ["3 3", "bogus", "3 3", "quit"]
            .into_iter()
            .map(|l| Ok::<_, io::Error>(l.to_string()));
        play_loop(&mut game, &mut lines, None).unwrap();

        // Red took (3,3), the computer answered, the repeat was refused
        assert_eq!(game.history(Side::Red).len(), 1);
        assert_eq!(game.history(Side::Blue).len(), 1);
        assert_eq!(game.current(), Some(Side::Red));
    }

    #[test]
    fn test_build_config_rejects_size() {
        let args = PlayArgs {
            config: None,
            size: Some(4),
            red: None,
            blue: None,
            level: None,
            first: None,
            save: None,
        };
        assert!(build_config(&args).is_err());
    }
}
