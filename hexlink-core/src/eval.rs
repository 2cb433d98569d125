//! Position evaluation by shortest-path distance

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::board::{Cell, Mark};
use crate::game::{GameState, Player};

/// Distance reported when a player has no path left
pub const UNREACHABLE: u32 = 1_000_000;

/// Score for a decided position
pub const WIN_VALUE: f32 = f32::INFINITY;

/// Cost to enter a cell for `player`, `None` when blocked
#[inline]
fn entry_cost(mark: Mark, own: Mark) -> Option<u32> {
    if mark == own {
        Some(0)
    } else if mark == Mark::Empty {
        Some(1)
    } else {
        None
    }
}

/// Minimum number of stones `player` still needs to connect its edges.
///
/// Dijkstra seeded from the whole start edge: own stones cost 0, empty
/// cells cost 1, opponent stones are impassable.
pub fn shortest_path_distance(state: &GameState, player: Player) -> u32 {
    let board = state.board();
    let n = board.size();
    let own = player.mark();
    let mut dist = vec![UNREACHABLE; n * n];
    let mut heap = BinaryHeap::new();

    for i in 0..n {
        let start = match player {
            Player::Red => Cell::new(i, 0),
            Player::Blue => Cell::new(0, i),
        };
        let idx = board.index(start);
        if let Some(cost) = entry_cost(board.mark_at(idx), own) {
            if cost < dist[idx] {
                dist[idx] = cost;
                heap.push(Reverse((cost, idx)));
            }
        }
    }

    while let Some(Reverse((cost, idx))) = heap.pop() {
        if cost > dist[idx] {
            continue;
        }
        let cell = Cell::new(idx % n, idx / n);
        for next in board.neighbors(cell) {
            let next_idx = board.index(next);
            let Some(step) = entry_cost(board.mark_at(next_idx), own) else {
                continue;
            };
            let candidate = cost + step;
            if candidate < dist[next_idx] {
                dist[next_idx] = candidate;
                heap.push(Reverse((candidate, next_idx)));
            }
        }
    }

    (0..n)
        .map(|i| match player {
            Player::Red => dist[board.index(Cell::new(i, n - 1))],
            Player::Blue => dist[board.index(Cell::new(n - 1, i))],
        })
        .min()
        .unwrap_or(UNREACHABLE)
}

/// Evaluate a position from `player`'s perspective.
///
/// Decided positions score +inf / -inf (0 for a filled board with no
/// winner); otherwise the opponent's distance minus the player's.
pub fn evaluate(state: &GameState, player: Player) -> f32 {
    if state.is_terminal() {
        return match state.winner() {
            Some(winner) if winner == player => WIN_VALUE,
            Some(_) => -WIN_VALUE,
            None => 0.0,
        };
    }

    let own = shortest_path_distance(state, player) as f32;
    let opponent = shortest_path_distance(state, player.opponent()) as f32;
    opponent - own
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_from(text: &str, player: Player) -> GameState {
        GameState::from_position(text.parse().unwrap(), player)
    }

    #[test]
    fn test_empty_board_distance_is_size() {
        for n in 1..=11 {
            let state = GameState::new(n).unwrap();
            assert_eq!(shortest_path_distance(&state, Player::Red), n as u32);
            assert_eq!(shortest_path_distance(&state, Player::Blue), n as u32);
        }
    }

    #[test]
    fn test_own_stones_are_free() {
        let state = state_from(". R .\n. R .\n. . .", Player::Blue);
        assert_eq!(shortest_path_distance(&state, Player::Red), 1);
        // Blue has to route around the red wall
        assert_eq!(shortest_path_distance(&state, Player::Blue), 3);
    }

    #[test]
    fn test_blocked_player_is_unreachable() {
        let state = state_from("B B B\n. . .\n. . .", Player::Red);
        assert_eq!(shortest_path_distance(&state, Player::Red), UNREACHABLE);
    }

    #[test]
    fn test_terminal_evaluation() {
        let state = state_from("R . .\nR . .\nR . .", Player::Blue);
        assert!(state.check_win(Player::Red));
        assert_eq!(evaluate(&state, Player::Red), f32::INFINITY);
        assert_eq!(evaluate(&state, Player::Blue), f32::NEG_INFINITY);
    }

    #[test]
    fn test_evaluation_sign() {
        let state = state_from(". R .\n. R .\n. . .", Player::Blue);
        // Red needs 1, Blue needs 3
        assert_eq!(evaluate(&state, Player::Red), 2.0);
        assert_eq!(evaluate(&state, Player::Blue), -2.0);
    }

    #[test]
    fn test_empty_board_is_balanced() {
        let state = GameState::new(5).unwrap();
        assert_eq!(evaluate(&state, Player::Red), 0.0);
        assert_eq!(evaluate(&state, Player::Blue), 0.0);
    }

    #[test]
    fn test_evaluate_is_pure() {
        let state = state_from("R . B\n. . .\nB R .", Player::Red);
        let before = state.clone();
        let first = evaluate(&state, Player::Red);
        let second = evaluate(&state, Player::Red);
        assert_eq!(first, second);
        assert_eq!(state, before);
    }
}
