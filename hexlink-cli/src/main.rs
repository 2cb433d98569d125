//! HEXLINK CLI - Command-line interface
//!
//! Commands:
//! - suggest: Pick a move for a position read from a file
//! - play: Play a single engine-vs-engine game
//! - tournament: Run pairings in parallel and append a PGN log

mod engines;
mod play_cmd;
mod suggest_cmd;
mod tournament_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexlink")]
#[command(about = "HEXLINK Hex engines: minimax, MCTS and tournaments")]
#[command(version)]
struct Cli {
    /// Seed for reproducible engines
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Debug-level logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest a move for a position
    Suggest(suggest_cmd::SuggestArgs),
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Run a tournament
    Tournament(tournament_cmd::TournamentArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Suggest(args) => suggest_cmd::run(args, cli.seed),
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Tournament(args) => tournament_cmd::run(args, cli.seed),
    }
}

/// Initialize logging to stderr so stdout stays machine-readable
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
