//! Tournament execution over configured pairings
//!
//! Level 1 - Orchestration and Level 2 - Phases

use std::time::Duration;

use hexlink_core::HexError;
use tracing::info;

use crate::config::{Participant, TournamentConfig};
use crate::match_play::{play_match, GameRecord, MatchResult, MatchSettings};

/// Standing of a participant in the tournament
#[derive(Clone, Debug)]
pub struct Standing {
    /// Index of the participant in the config
    pub index: usize,
    /// Name of the participant
    pub name: String,
    /// Total score (wins + 0.5 * draws)
    pub score: f32,
    /// Total wins
    pub wins: u32,
    /// Total losses
    pub losses: u32,
    /// Total draws
    pub draws: u32,
    /// Games played
    pub games_played: u32,
    /// Moves made across all games
    pub moves: u32,
    /// Thinking time across all games
    pub think_time: Duration,
}

impl Standing {
    fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_string(),
            score: 0.0,
            wins: 0,
            losses: 0,
            draws: 0,
            games_played: 0,
            moves: 0,
            think_time: Duration::ZERO,
        }
    }

    /// Win rate
    pub fn win_rate(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.wins as f32 / self.games_played as f32
        }
    }

    /// Normalized score (0.0 to 1.0)
    pub fn normalized_score(&self) -> f32 {
        if self.games_played == 0 {
            0.0
        } else {
            self.score / self.games_played as f32
        }
    }

    /// Average thinking time per move
    pub fn avg_move_time(&self) -> Duration {
        if self.moves == 0 {
            Duration::ZERO
        } else {
            self.think_time / self.moves
        }
    }
}

/// Result of a tournament
#[derive(Clone, Debug)]
pub struct TournamentResult {
    /// Final standings sorted by score (descending)
    pub standings: Vec<Standing>,
    /// Match results in pairing order
    pub matches: Vec<MatchResult>,
}

impl TournamentResult {
    /// Get winner (top standing)
    pub fn winner(&self) -> Option<&Standing> {
        self.standings.first()
    }

    /// Get standing for a participant by name
    pub fn standing_for(&self, name: &str) -> Option<&Standing> {
        self.standings.iter().find(|s| s.name == name)
    }

    /// Every game in round order
    pub fn games(&self) -> impl Iterator<Item = &GameRecord> {
        self.matches.iter().flat_map(|m| m.games.iter())
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Run a tournament (Level 1 orchestration)
///
/// Pairings run one after another; games inside a pairing run in parallel
/// when the config asks for it. Rounds are numbered across the whole event.
pub fn run_tournament(config: &TournamentConfig) -> Result<TournamentResult, HexError> {
    config.validate()?;
    let pairings = config.resolved_pairings();

    info!(
        participants = config.participants.len(),
        pairings = pairings.len(),
        games_per_pairing = config.games_per_pairing,
        board_size = config.board_size,
        "starting tournament"
    );

    let mut matches = Vec::with_capacity(pairings.len());
    for (i, pairing) in pairings.iter().enumerate() {
        let red = lookup(config, &pairing.red)?;
        let blue = lookup(config, &pairing.blue)?;
        let settings = MatchSettings {
            board_size: config.board_size,
            games: config.games_per_pairing,
            alternate_colors: config.alternate_colors,
            parallel: config.parallel,
            clock: config.clock(),
            seed: config.seed,
            first_round: 1 + i * config.games_per_pairing,
        };

        let result = play_match(red, blue, &settings)?;
        info!(
            first = %result.first,
            second = %result.second,
            first_wins = result.first_wins,
            second_wins = result.second_wins,
            draws = result.draws,
            "pairing finished"
        );
        matches.push(result);
    }

    let standings = compute_standings(&config.participants, &matches);
    Ok(TournamentResult { standings, matches })
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

fn lookup<'a>(config: &'a TournamentConfig, name: &str) -> Result<&'a Participant, HexError> {
    config
        .participant(name)
        .ok_or_else(|| HexError::InvalidParameter(format!("unknown participant '{}'", name)))
}

/// Compute final standings from game records
fn compute_standings(participants: &[Participant], matches: &[MatchResult]) -> Vec<Standing> {
    let mut standings: Vec<Standing> = participants
        .iter()
        .enumerate()
        .map(|(i, p)| Standing::new(i, &p.name))
        .collect();

    for record in matches.iter().flat_map(|m| m.games.iter()) {
        let winner = record.winner_name();
        for (name, kpi) in [
            (&record.red_name, &record.outcome.red),
            (&record.blue_name, &record.outcome.blue),
        ] {
            let Some(standing) = standings.iter_mut().find(|s| &s.name == name) else {
                continue;
            };
            standing.games_played += 1;
            standing.moves += kpi.moves;
            standing.think_time += kpi.think_time;
            match winner {
                Some(w) if w == name.as_str() => standing.wins += 1,
                Some(_) => standing.losses += 1,
                None => standing.draws += 1,
            }
        }
    }

    for standing in &mut standings {
        standing.score = standing.wins as f32 + 0.5 * standing.draws as f32;
    }

    // Sort by score (descending), then wins (descending)
    standings.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| b.wins.cmp(&a.wins))
    });

    standings
}
