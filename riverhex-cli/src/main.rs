//! RiverHex CLI - Command-line interface
//!
//! Commands:
//! - play: Start a new match (human moves read from stdin)
//! - resume: Continue a saved match
//! - show: Print a saved match
//! - batch: Play computer-vs-computer matches and report statistics

mod batch;
mod play;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "riverhex")]
#[command(about = "RiverHex connection game with a heuristic computer player")]
struct Cli {
    /// Log engine decisions
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Random seed for reproducible openings
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new match
    Play(play::PlayArgs),
    /// Continue a saved match
    Resume(play::ResumeArgs),
    /// Print a saved match
    Show(play::ShowArgs),
    /// Computer-vs-computer statistics
    Batch(batch::BatchArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Resume(args) => play::resume(args, cli.seed),
        Commands::Show(args) => play::show(args),
        Commands::Batch(args) => batch::run(args, cli.seed),
    }
}

/// RUST_LOG wins over the verbosity flag
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
