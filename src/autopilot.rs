//! Idle/demo mode - a greedy bot that plays the game
//!
//! Used by the headless binary. It only reads the game state and feeds
//! its choice back through the normal input path.

use crate::input::admits_direction;
use crate::sim::{Cell, Direction, GameState};

/// Pick the next move: the safe step closest to the target.
///
/// A step is safe if it stays on the grid and does not land on any body
/// cell (tail included, matching the collision rule). Among equally close
/// steps, ones with more free neighbours win, then keeping the current
/// heading. Returns `None` when every step is fatal.
pub fn choose_direction(state: &GameState) -> Option<Direction> {
    let snake = &state.snake;
    let head = snake.head();
    let is_free = |cell: Cell| !snake.contains(cell);

    Direction::ALL
        .into_iter()
        .filter(|&dir| admits_direction(dir, snake.direction, snake.len()))
        .filter_map(|dir| {
            let next = state.grid.step(head, dir).filter(|&c| is_free(c))?;
            let exits = Direction::ALL
                .into_iter()
                .filter_map(|d| state.grid.step(next, d))
                .filter(|&c| c != head && is_free(c))
                .count();
            let distance = state.grid.distance(next, state.target);
            Some((dir, distance, exits))
        })
        .min_by_key(|&(dir, distance, exits)| {
            (distance, usize::MAX - exits, dir != snake.direction)
        })
        .map(|(dir, _, _)| dir)
}
