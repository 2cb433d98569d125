//! Match play - multiple games between two participants
//!
//! Level 2 - Phase-level implementation

use std::time::Duration;

use hexlink_core::{HexError, Player};
use rayon::prelude::*;
use tracing::info;

use crate::config::Participant;
use crate::game_runner::{AiPlayer, GameOutcome, GameRunner};

/// One finished game with the names behind each color
#[derive(Clone, Debug)]
pub struct GameRecord {
    /// 1-based game number within the tournament
    pub round: usize,
    pub red_name: String,
    pub blue_name: String,
    pub outcome: GameOutcome,
}

impl GameRecord {
    /// Name of the winner, None for a draw
    pub fn winner_name(&self) -> Option<&str> {
        self.outcome.winner().map(|player| match player {
            Player::Red => self.red_name.as_str(),
            Player::Blue => self.blue_name.as_str(),
        })
    }
}

/// Result of a match (multiple games)
#[derive(Clone, Debug)]
pub struct MatchResult {
    /// Participant listed first in the pairing
    pub first: String,
    /// Participant listed second in the pairing
    pub second: String,
    /// Wins for the first participant
    pub first_wins: u32,
    /// Wins for the second participant
    pub second_wins: u32,
    /// Draws (games that ended without a winner)
    pub draws: u32,
    /// Total games played
    pub games_played: u32,
    /// Individual games, in round order
    pub games: Vec<GameRecord>,
}

impl MatchResult {
    /// Create empty result
    pub fn empty(first: &str, second: &str) -> Self {
        Self {
            first: first.to_string(),
            second: second.to_string(),
            first_wins: 0,
            second_wins: 0,
            draws: 0,
            games_played: 0,
            games: Vec::new(),
        }
    }

    /// Get win rate for the first participant
    pub fn first_win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.first_wins as f32 / self.games_played as f32
        }
    }

    /// Wins = 1.0, Draws = 0.5, Losses = 0.0
    pub fn score_for_first(&self) -> f32 {
        self.first_wins as f32 + 0.5 * self.draws as f32
    }

    pub fn score_for_second(&self) -> f32 {
        self.second_wins as f32 + 0.5 * self.draws as f32
    }
}

/// Settings shared by every game of a match
#[derive(Clone, Debug)]
pub struct MatchSettings {
    pub board_size: usize,
    pub games: usize,
    pub alternate_colors: bool,
    pub parallel: bool,
    pub clock: Option<Duration>,
    pub seed: Option<u64>,
    /// Round number given to the first game
    pub first_round: usize,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            board_size: hexlink_core::DEFAULT_BOARD_SIZE,
            games: 5,
            alternate_colors: false,
            parallel: true,
            clock: None,
            seed: None,
            first_round: 1,
        }
    }
}

/// Play a match between two participants (Level 2 phase)
///
/// `first` opens as Red; with `alternate_colors` the odd games swap sides.
pub fn play_match(
    first: &Participant,
    second: &Participant,
    settings: &MatchSettings,
) -> Result<MatchResult, HexError> {
    if settings.games == 0 {
        return Ok(MatchResult::empty(&first.name, &second.name));
    }

    let mut runner = GameRunner::new(settings.board_size)?;
    if let Some(clock) = settings.clock {
        runner = runner.with_clock(clock);
    }

    let game_configs = prepare_game_configs(settings);
    let records = if settings.parallel {
        game_configs
            .par_iter()
            .map(|gc| play_single_game(&runner, first, second, gc, settings.seed))
            .collect::<Result<Vec<_>, _>>()?
    } else {
        game_configs
            .iter()
            .map(|gc| play_single_game(&runner, first, second, gc, settings.seed))
            .collect::<Result<Vec<_>, _>>()?
    };

    Ok(aggregate_results(first, second, records))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Configuration for a single game in a match
#[derive(Clone, Copy, Debug)]
struct GameConfig {
    /// Whether the first participant plays Red this game
    first_is_red: bool,
    /// Game index (for seeding)
    game_index: usize,
    round: usize,
}

/// Prepare game configurations for a match
fn prepare_game_configs(settings: &MatchSettings) -> Vec<GameConfig> {
    (0..settings.games)
        .map(|i| GameConfig {
            first_is_red: !settings.alternate_colors || i % 2 == 0,
            game_index: i,
            round: settings.first_round + i,
        })
        .collect()
}

/// Play a single game with fresh agents
fn play_single_game(
    runner: &GameRunner,
    first: &Participant,
    second: &Participant,
    gc: &GameConfig,
    base_seed: Option<u64>,
) -> Result<GameRecord, HexError> {
    let (red, blue) = if gc.first_is_red {
        (first, second)
    } else {
        (second, first)
    };

    // Distinct stream per game and side
    let seed_for = |side: u64| {
        base_seed.map(|s| {
            s.wrapping_add((gc.round as u64).wrapping_mul(2))
                .wrapping_add(side)
        })
    };
    let mut red_ai = AiPlayer::from_config(&red.ai, seed_for(0))?;
    let mut blue_ai = AiPlayer::from_config(&blue.ai, seed_for(1))?;

    let outcome = runner.play_game(&mut red_ai, &mut blue_ai);

    let record = GameRecord {
        round: gc.round,
        red_name: red.name.clone(),
        blue_name: blue.name.clone(),
        outcome,
    };
    info!(
        round = record.round,
        game = gc.game_index + 1,
        red = %record.red_name,
        blue = %record.blue_name,
        winner = record.winner_name().unwrap_or("draw"),
        "game finished"
    );
    Ok(record)
}

/// Aggregate game outcomes into a match result
fn aggregate_results(
    first: &Participant,
    second: &Participant,
    games: Vec<GameRecord>,
) -> MatchResult {
    let mut result = MatchResult::empty(&first.name, &second.name);

    for record in &games {
        // Attribute wins correctly based on who was playing which color
        match record.winner_name() {
            Some(name) if name == first.name => result.first_wins += 1,
            Some(_) => result.second_wins += 1,
            None => result.draws += 1,
        }
    }

    result.games_played = games.len() as u32;
    result.games = games;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AiConfig;

    fn settings(games: usize) -> MatchSettings {
        MatchSettings {
            board_size: 4,
            games,
            seed: Some(7),
            ..Default::default()
        }
    }

    #[test]
    fn test_match_result_empty() {
        let result = MatchResult::empty("a", "b");
        assert_eq!(result.games_played, 0);
        assert_eq!(result.first_win_rate(), 0.0);
    }

    #[test]
    fn test_match_result_scores() {
        let result = MatchResult {
            first_wins: 3,
            second_wins: 2,
            draws: 2,
            games_played: 7,
            ..MatchResult::empty("a", "b")
        };

        // First: 3 wins + 0.5 * 2 draws = 4.0
        assert_eq!(result.score_for_first(), 4.0);
        assert_eq!(result.score_for_second(), 3.0);
    }

    #[test]
    fn test_prepare_game_configs() {
        let mut s = settings(4);
        s.first_round = 6;
        let configs = prepare_game_configs(&s);
        assert!(configs.iter().all(|c| c.first_is_red));
        assert_eq!(configs[3].round, 9);

        s.alternate_colors = true;
        let configs = prepare_game_configs(&s);
        assert!(configs[0].first_is_red);
        assert!(!configs[1].first_is_red);
        assert!(configs[2].first_is_red);
        assert!(!configs[3].first_is_red);
    }

    #[test]
    fn test_play_match_basic() {
        let a = Participant::new("a", AiConfig::random());
        let b = Participant::new("b", AiConfig::random());

        let result = play_match(&a, &b, &settings(4)).unwrap();

        assert_eq!(result.games_played, 4);
        assert_eq!(result.first_wins + result.second_wins + result.draws, 4);
        let rounds: Vec<usize> = result.games.iter().map(|g| g.round).collect();
        assert_eq!(rounds, vec![1, 2, 3, 4]);
        assert!(result.games.iter().all(|g| g.red_name == "a"));
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let a = Participant::new("a", AiConfig::random());
        let b = Participant::new("b", AiConfig::mcts(10));

        let parallel = play_match(&a, &b, &settings(3)).unwrap();
        let sequential = play_match(
            &a,
            &b,
            &MatchSettings {
                parallel: false,
                ..settings(3)
            },
        )
        .unwrap();

        for (p, s) in parallel.games.iter().zip(&sequential.games) {
            assert_eq!(p.outcome.moves, s.outcome.moves);
        }
        assert_eq!(parallel.first_wins, sequential.first_wins);
    }

    #[test]
    fn test_alternation_credits_the_right_side() {
        let a = Participant::new("a", AiConfig::random());
        let b = Participant::new("b", AiConfig::random());
        let s = MatchSettings {
            alternate_colors: true,
            ..settings(4)
        };

        let result = play_match(&a, &b, &s).unwrap();

        assert_eq!(result.games[1].red_name, "b");
        let first_wins = result
            .games
            .iter()
            .filter(|g| g.winner_name() == Some("a"))
            .count() as u32;
        assert_eq!(result.first_wins, first_wins);
    }

    #[test]
    fn test_play_match_zero_games() {
        let a = Participant::new("a", AiConfig::random());
        let b = Participant::new("b", AiConfig::random());
        let result = play_match(&a, &b, &settings(0)).unwrap();
        assert_eq!(result.games_played, 0);
    }
}
