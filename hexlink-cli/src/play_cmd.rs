//! Play command - one engine-vs-engine game
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: play(), report_results()
//! - Level 4: formatting utilities

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use hexlink_core::{GameState, Player, DEFAULT_BOARD_SIZE};
use hexlink_tournament::{AiPlayer, GameOutcome, GameRunner};

use crate::engines::{EngineArgs, EngineKind};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct PlayArgs {
    /// Engine playing Red (top to bottom)
    #[arg(long, value_enum, default_value = "minimax")]
    pub red: EngineKind,

    /// Engine playing Blue (left to right)
    #[arg(long, value_enum, default_value = "mcts")]
    pub blue: EngineKind,

    /// Board edge length
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    pub size: usize,

    #[command(flatten)]
    pub search: EngineArgs,

    /// Per-player thinking clock in milliseconds
    #[arg(long, value_name = "MS")]
    pub clock_ms: Option<u64>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run play command
pub fn run(args: PlayArgs, seed: Option<u64>) -> Result<()> {
    tracing::info!(
        "Starting game: {:?} (red) vs {:?} (blue) on {}x{}",
        args.red,
        args.blue,
        args.size,
        args.size
    );

    let outcome = play(&args, seed)?;
    let final_state = replay(args.size, &outcome)?;

    report_results(&args, &outcome, &final_state)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn play(args: &PlayArgs, seed: Option<u64>) -> Result<GameOutcome> {
    let mut runner = GameRunner::new(args.size)?;
    if let Some(ms) = args.clock_ms {
        runner = runner.with_clock(Duration::from_millis(ms));
    }

    let mut red = AiPlayer::from_config(&args.search.ai_config(args.red), seed)?;
    let mut blue = AiPlayer::from_config(
        &args.search.ai_config(args.blue),
        seed.map(|s| s.wrapping_add(1)),
    )?;

    Ok(runner.play_game(&mut red, &mut blue))
}

/// Rebuild the final position from the move list
fn replay(size: usize, outcome: &GameOutcome) -> Result<GameState> {
    let mut state = GameState::new(size)?;
    for &mv in &outcome.moves {
        state = state.apply_move(mv)?;
    }
    Ok(state)
}

fn report_results(args: &PlayArgs, outcome: &GameOutcome, final_state: &GameState) -> Result<()> {
    if args.json {
        print_json_results(args, outcome)?;
    } else {
        print_text_results(args, outcome, final_state);
    }
    Ok(())
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

fn winner_label(outcome: &GameOutcome) -> &'static str {
    outcome.winner().map(Player::name).unwrap_or("draw")
}

/// Print results as JSON
fn print_json_results(args: &PlayArgs, outcome: &GameOutcome) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonKpi {
        moves: u32,
        time_secs: f64,
    }

    #[derive(serde::Serialize)]
    struct JsonOutput {
        size: usize,
        red: String,
        blue: String,
        winner: &'static str,
        end: String,
        moves: Vec<(usize, usize)>,
        red_kpi: JsonKpi,
        blue_kpi: JsonKpi,
    }

    let output = JsonOutput {
        size: args.size,
        red: format!("{:?}", args.red),
        blue: format!("{:?}", args.blue),
        winner: winner_label(outcome),
        end: format!("{:?}", outcome.end),
        moves: outcome.moves.iter().map(|c| (c.x, c.y)).collect(),
        red_kpi: JsonKpi {
            moves: outcome.red.moves,
            time_secs: outcome.red.think_time.as_secs_f64(),
        },
        blue_kpi: JsonKpi {
            moves: outcome.blue.moves,
            time_secs: outcome.blue.think_time.as_secs_f64(),
        },
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize game result")?;
    println!("{}", json);
    Ok(())
}

/// Print results as text
fn print_text_results(args: &PlayArgs, outcome: &GameOutcome, final_state: &GameState) {
    println!("\n=== Final Board ===");
    print!("{}", final_state.board());
    println!("\n=== Result ===");
    println!("Red:    {:?}", args.red);
    println!("Blue:   {:?}", args.blue);
    println!("Winner: {} ({:?})", winner_label(outcome), outcome.end);
    println!(
        "Red:    {} moves, {:.2}s",
        outcome.red.moves,
        outcome.red.think_time.as_secs_f64()
    );
    println!(
        "Blue:   {} moves, {:.2}s",
        outcome.blue.moves,
        outcome.blue.think_time.as_secs_f64()
    );
}
