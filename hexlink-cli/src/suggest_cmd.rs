//! Suggest command - pick one move for a position read from a file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_board(), choose_move()
//! - Level 4: formatting utilities

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;

use hexlink_core::{choose_move_minimax, Board, Cell, GameState, Player};
use hexlink_mcts::{choose_move_mcts, SearchBudget};
use hexlink_tournament::AiPlayer;

use crate::engines::{EngineArgs, EngineKind};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SuggestArgs {
    /// Board file: one row per line, `.` empty, `R` red, `B` blue
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Side to move
    #[arg(long, default_value = "red")]
    pub player: Player,

    /// Engine to ask
    #[arg(long, value_enum, default_value = "minimax")]
    pub engine: EngineKind,

    #[command(flatten)]
    pub search: EngineArgs,

    /// Output the move as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run suggest command
pub fn run(args: SuggestArgs, seed: Option<u64>) -> Result<()> {
    let board = load_board(&args.board)?;
    let empty_count = board.count_empty();

    tracing::info!(
        "Suggesting a {} move with {:?} on a {}x{} board ({} empty)",
        args.player,
        args.engine,
        board.size(),
        board.size(),
        empty_count
    );

    let start = Instant::now();
    let mv = choose_move(&board, empty_count, &args, seed)?;
    tracing::debug!("Decision took {:?}", start.elapsed());

    report(mv, args.json);
    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Read and parse a board file
pub fn load_board(path: &Path) -> Result<Board> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file: {}", path.display()))?;
    text.parse::<Board>()
        .with_context(|| format!("Failed to parse board file: {}", path.display()))
}

/// Dispatch to the driver entry points, or a seeded engine when reproducibility
/// or a deadline is requested
fn choose_move(
    board: &Board,
    empty_count: usize,
    args: &SuggestArgs,
    seed: Option<u64>,
) -> Result<Option<Cell>> {
    let search = &args.search;
    let mv = match args.engine {
        EngineKind::Minimax if search.time_ms.is_none() => {
            choose_move_minimax(board, args.player, empty_count, search.depth)?
        }
        EngineKind::Mcts if seed.is_none() && search.time_ms.is_none() => choose_move_mcts(
            board,
            args.player,
            empty_count,
            SearchBudget::Iterations(search.iterations),
        )?,
        kind => {
            let state = GameState::from_board(board.clone(), args.player, empty_count)?;
            let mut ai = AiPlayer::from_config(&search.ai_config(kind), seed)?;
            ai.choose_move(&state)
        }
    };
    Ok(mv)
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn report(mv: Option<Cell>, json: bool) {
    if json {
        let value = match mv {
            Some(cell) => serde_json::json!({ "x": cell.x, "y": cell.y }),
            None => serde_json::Value::Null,
        };
        println!("{}", value);
        return;
    }
    match mv {
        Some(cell) => println!("{}", cell),
        None => println!("no move"),
    }
}
