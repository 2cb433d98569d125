//! MCTS vs Alpha-Beta Performance Benchmark
//!
//! Compares:
//! 1. Time to find a move at various depths/iteration counts
//! 2. Move quality via head-to-head games

use std::time::Instant;

use hexlink_core::{AlphaBetaAI, GameResult, GameState, Player};
use hexlink_mcts::{MctsConfig, MctsPlayer};

// ============================================================================
// TEST POSITIONS
// ============================================================================

/// Empty 7x7 board, Red to move
fn test_position_opening() -> GameState {
    GameState::new(7).unwrap()
}

/// A 7x7 middlegame with both sides half way across
fn test_position_midgame() -> GameState {
    let board = "\
        . . . R . . .\n\
        . . R . . . .\n\
        . B B R . . .\n\
        . . . B . . .\n\
        . . R B . . .\n\
        . . . . . . .\n\
        . . . . . . .";
    GameState::from_position(board.parse().unwrap(), Player::Red)
}

// ============================================================================
// BENCHMARK STRUCTURES
// ============================================================================

#[derive(Clone, Debug)]
struct BenchmarkResult {
    player: String,
    config: String,
    avg_move_time_ms: f64,
    total_time_ms: f64,
}

impl BenchmarkResult {
    fn to_table_row(&self) -> String {
        format!(
            "| {:<11} | {:<13} | {:>10.2}ms | {:>9.0}ms |",
            self.player, self.config, self.avg_move_time_ms, self.total_time_ms
        )
    }
}

// ============================================================================
// BENCHMARK: Time to Find Move
// ============================================================================

fn benchmark_move_time(state: &GameState, position_name: &str) -> Vec<BenchmarkResult> {
    print_header(&format!("MOVE TIME: {}", position_name));
    let mut results = Vec::new();

    // Alpha-Beta at various depths
    for depth in [1, 2, 3] {
        print!("  AB depth {} ... ", depth);
        let mut ai = AlphaBetaAI::new(depth);
        let mut total_time = 0.0;
        let iterations = 3;

        for _ in 0..iterations {
            let start = Instant::now();
            let _ = ai.best_move(state);
            total_time += start.elapsed().as_secs_f64() * 1000.0;
        }

        let avg_time = total_time / iterations as f64;
        results.push(BenchmarkResult {
            player: "Alpha-Beta".to_string(),
            config: format!("Depth {}", depth),
            avg_move_time_ms: avg_time,
            total_time_ms: total_time,
        });

        println!("{:.2}ms", avg_time);
    }

    // MCTS with various iteration counts
    for iterations_per_move in [100, 500, 1000, 5000] {
        print!("  MCTS {} iters ... ", iterations_per_move);
        let config = MctsConfig::iterations(iterations_per_move).with_seed(7);
        let mut player = match MctsPlayer::new(config) {
            Ok(player) => player,
            Err(e) => {
                println!("skipped: {}", e);
                continue;
            }
        };
        let mut total_time = 0.0;
        let iterations = 3;

        for _ in 0..iterations {
            let start = Instant::now();
            let _ = player.best_move(state);
            total_time += start.elapsed().as_secs_f64() * 1000.0;
        }

        let avg_time = total_time / iterations as f64;
        results.push(BenchmarkResult {
            player: "MCTS".to_string(),
            config: format!("{} iters", iterations_per_move),
            avg_move_time_ms: avg_time,
            total_time_ms: total_time,
        });

        println!("{:.2}ms", avg_time);
    }

    results
}

// ============================================================================
// BENCHMARK: Move Quality (Head-to-Head Games)
// ============================================================================

fn benchmark_move_quality(size: usize, games: u64) {
    print_header(&format!("MOVE QUALITY: AB D2 vs MCTS 1000 on {}x{}", size, size));
    let mut ab_wins = 0;
    let mut mcts_wins = 0;

    for game_num in 0..games {
        let mut ab = AlphaBetaAI::new(2);
        let Ok(mut mcts) = MctsPlayer::new(MctsConfig::iterations(1000).with_seed(game_num)) else {
            return;
        };
        // Alternate who plays Red
        let ab_color = if game_num % 2 == 0 { Player::Red } else { Player::Blue };

        let Ok(mut state) = GameState::new(size) else {
            return;
        };
        let mut moves = 0;

        while !state.is_terminal() {
            let mv = if state.current_player() == ab_color {
                ab.best_move(&state)
            } else {
                mcts.best_move(&state)
            };
            let Some(mv) = mv else { break };
            state = state.play(mv);
            moves += 1;
        }

        let winner = match state.result() {
            GameResult::RedWins => Some(Player::Red),
            GameResult::BlueWins => Some(Player::Blue),
            GameResult::Ongoing | GameResult::Draw => None,
        };
        let label = match winner {
            Some(color) if color == ab_color => {
                ab_wins += 1;
                format!("AB D2 ({})", color)
            }
            Some(color) => {
                mcts_wins += 1;
                format!("MCTS 1000 ({})", color)
            }
            None => "Draw".to_string(),
        };

        println!("  Game {}: {} ({} moves)", game_num + 1, label, moves);
    }

    println!("  AB D2 {} - {} MCTS 1000", ab_wins, mcts_wins);
}

// ============================================================================
// MAIN
// ============================================================================

fn main() {
    print_header("HEXLINK: MCTS vs Alpha-Beta Benchmark");

    let mut all_results = Vec::new();
    all_results.extend(benchmark_move_time(&test_position_opening(), "Opening 7x7"));
    all_results.extend(benchmark_move_time(&test_position_midgame(), "Mid-Game 7x7"));

    benchmark_move_quality(5, 4);

    print_header("BENCHMARK RESULTS TABLE");
    println!("| Player      | Config        | Avg Move Time | Total Time |");
    println!("├─────────────┼───────────────┼───────────────┼────────────┤");
    for result in &all_results {
        println!("{}", result.to_table_row());
    }

    println!("\n• MCTS Iteration Scaling:");
    let counts = [100, 500, 1000, 5000];
    for pair in counts.windows(2) {
        let find = |n: u32| {
            all_results
                .iter()
                .find(|r| r.player == "MCTS" && r.config == format!("{} iters", n))
        };
        if let (Some(prev), Some(next)) = (find(pair[0]), find(pair[1])) {
            let scaling = next.avg_move_time_ms / prev.avg_move_time_ms;
            println!("  {} → {} iters: {:.2}x slower", pair[0], pair[1], scaling);
        }
    }

    println!();
}

// ============================================================================
// HELPER: Print section header
// ============================================================================

fn print_header(title: &str) {
    println!("\n╔{}╗", "═".repeat(title.chars().count() + 4));
    println!("║  {}  ║", title);
    println!("╚{}╝", "═".repeat(title.chars().count() + 4));
}
