//! Tournament command - run the configured pairings and log the games
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_config(), write_outputs(), print_standings()

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use hexlink_tournament::{pgn, run_tournament, TournamentConfig, TournamentResult};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct TournamentArgs {
    /// Tournament config JSON (defaults to Random / Minimax_depth2 / MCTS)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// PGN log to append game records to
    #[arg(long, value_name = "FILE", default_value = "tournament_results.pgn")]
    pub pgn: PathBuf,

    /// Plain-text summary, one line per game (overwritten)
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Override games per pairing
    #[arg(long)]
    pub games: Option<usize>,

    /// Override board size
    #[arg(long)]
    pub size: Option<usize>,

    /// Swap colors on every other game
    #[arg(long)]
    pub alternate_colors: bool,

    /// Run games one at a time
    #[arg(long)]
    pub sequential: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run tournament command
pub fn run(args: TournamentArgs, seed: Option<u64>) -> Result<()> {
    let config = load_config(&args, seed)?;
    let result = run_tournament(&config)?;

    write_outputs(&args, &result)?;
    print_standings(&result);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the config file (or defaults) and apply command-line overrides
fn load_config(args: &TournamentArgs, seed: Option<u64>) -> Result<TournamentConfig> {
    let mut config = match &args.config {
        Some(path) => TournamentConfig::load(path)?,
        None => TournamentConfig::default(),
    };

    if let Some(games) = args.games {
        config = config.with_games_per_pairing(games);
    }
    if let Some(size) = args.size {
        config = config.with_board_size(size);
    }
    if args.alternate_colors {
        config = config.with_alternate_colors(true);
    }
    if args.sequential {
        config = config.with_parallel(false);
    }
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    config.validate()?;
    Ok(config)
}

fn write_outputs(args: &TournamentArgs, result: &TournamentResult) -> Result<()> {
    for record in result.games() {
        println!("{}", pgn::summary_line(record));
    }

    pgn::append_pgn(&args.pgn, result.games())?;
    tracing::info!("Appended {} games to {}", result.games().count(), args.pgn.display());

    if let Some(path) = &args.summary {
        pgn::write_summary(path, result.games())?;
        tracing::info!("Wrote summary to {}", path.display());
    }
    Ok(())
}

fn print_standings(result: &TournamentResult) {
    println!("\n=== Standings ===");
    println!(
        "{:<4} {:<20} {:>6} {:>4} {:>4} {:>4} {:>12}",
        "#", "Name", "Score", "W", "L", "D", "ms/move"
    );
    for (rank, s) in result.standings.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>6.1} {:>4} {:>4} {:>4} {:>12.2}",
            rank + 1,
            s.name,
            s.score,
            s.wins,
            s.losses,
            s.draws,
            s.avg_move_time().as_secs_f64() * 1000.0
        );
    }
}
