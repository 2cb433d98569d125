//! PGN-style game log and plain-text summaries
//!
//! Level 4 - Utilities
//!
//! Red is recorded as White and Blue as Black, so standard PGN tooling can
//! rate the entrants.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use hexlink_core::GameResult;

use crate::match_play::GameRecord;

/// Result tag from Red's (White's) point of view
pub fn result_tag(result: GameResult) -> &'static str {
    match result {
        GameResult::RedWins => "1-0",
        GameResult::BlueWins => "0-1",
        GameResult::Draw | GameResult::Ongoing => "1/2-1/2",
    }
}

/// Format one game as a PGN tag block followed by a blank line
pub fn format_record(record: &GameRecord, date: NaiveDate) -> String {
    let outcome = &record.outcome;
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "[Event \"Hex Tournament\"]");
    let _ = writeln!(out, "[Site \"Local\"]");
    let _ = writeln!(out, "[Date \"{}\"]", date.format("%Y.%m.%d"));
    let _ = writeln!(out, "[Round \"{}\"]", record.round);
    let _ = writeln!(out, "[White \"{}\"]", record.red_name);
    let _ = writeln!(out, "[Black \"{}\"]", record.blue_name);
    let _ = writeln!(out, "[Result \"{}\"]", result_tag(outcome.result));
    let _ = writeln!(out, "[RedMoves \"{}\"]", outcome.red.moves);
    let _ = writeln!(out, "[BlueMoves \"{}\"]", outcome.blue.moves);
    let _ = writeln!(out, "[RedTime \"{:.2}\"]", outcome.red.think_time.as_secs_f64());
    let _ = writeln!(out, "[BlueTime \"{:.2}\"]", outcome.blue.think_time.as_secs_f64());
    out.push('\n');
    out
}

/// Append records to a PGN file, creating it if needed
pub fn append_pgn<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a GameRecord>,
) -> anyhow::Result<()> {
    let date = Local::now().date_naive();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open PGN log {}", path.display()))?;

    for record in records {
        file.write_all(format_record(record, date).as_bytes())
            .with_context(|| format!("Failed to write to {}", path.display()))?;
    }
    Ok(())
}

/// One human-readable line per game
pub fn summary_line(record: &GameRecord) -> String {
    let outcome = &record.outcome;
    format!(
        "{} (red) vs {} (blue) | Winner: {} | red moves: {}, blue moves: {} | red time: {:.2}s, blue time: {:.2}s",
        record.red_name,
        record.blue_name,
        outcome.winner().map(|p| p.name()).unwrap_or("draw"),
        outcome.red.moves,
        outcome.blue.moves,
        outcome.red.think_time.as_secs_f64(),
        outcome.blue.think_time.as_secs_f64(),
    )
}

/// Overwrite `path` with one summary line per game
pub fn write_summary<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a GameRecord>,
) -> anyhow::Result<()> {
    let mut content = String::new();
    for record in records {
        content.push_str(&summary_line(record));
        content.push('\n');
    }
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write summary {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_runner::{EndReason, GameOutcome, PlayerKpi};
    use std::time::Duration;

    fn sample(result: GameResult) -> GameRecord {
        GameRecord {
            round: 4,
            red_name: "Minimax_depth2".to_string(),
            blue_name: "MCTS".to_string(),
            outcome: GameOutcome {
                result,
                end: EndReason::Connection,
                moves: vec![],
                red: PlayerKpi { moves: 31, think_time: Duration::from_millis(1234) },
                blue: PlayerKpi { moves: 30, think_time: Duration::from_millis(56) },
            },
        }
    }

    #[test]
    fn test_result_tags() {
        assert_eq!(result_tag(GameResult::RedWins), "1-0");
        assert_eq!(result_tag(GameResult::BlueWins), "0-1");
        assert_eq!(result_tag(GameResult::Draw), "1/2-1/2");
    }

    #[test]
    fn test_format_record() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        let text = format_record(&sample(GameResult::BlueWins), date);
        assert_eq!(
            text,
            "[Event \"Hex Tournament\"]\n\
             [Site \"Local\"]\n\
             [Date \"2024.03.07\"]\n\
             [Round \"4\"]\n\
             [White \"Minimax_depth2\"]\n\
             [Black \"MCTS\"]\n\
             [Result \"0-1\"]\n\
             [RedMoves \"31\"]\n\
             [BlueMoves \"30\"]\n\
             [RedTime \"1.23\"]\n\
             [BlueTime \"0.06\"]\n\n"
        );
    }

    #[test]
    fn test_summary_line() {
        let line = summary_line(&sample(GameResult::RedWins));
        assert_eq!(
            line,
            "Minimax_depth2 (red) vs MCTS (blue) | Winner: red | red moves: 31, blue moves: 30 | red time: 1.23s, blue time: 0.06s"
        );
    }

    #[test]
    fn test_append_pgn_appends() {
        let path = std::env::temp_dir().join(format!("hexlink_pgn_{}.pgn", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let first = sample(GameResult::RedWins);
        append_pgn(&path, [&first]).unwrap();
        append_pgn(&path, [&first, &first]).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("[Event \"Hex Tournament\"]").count(), 3);
        assert!(content.ends_with("\n\n"));
        let _ = std::fs::remove_file(&path);
    }
}
