//! Fixed timestep simulation tick
//!
//! Advances the snake one cell and applies collision, growth and
//! consumption rules. Phase transitions are left to the session.

use super::state::{GameState, LossCause, SessionState};
use crate::events::GameEvent;

/// What a tick did, for the session to act on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running, nothing happened
    Skipped,
    /// Moved without eating
    Moved,
    /// Moved onto the target and grew
    Consumed,
    /// Run is over
    Lost(LossCause),
    /// Body reached the win length
    Won,
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState) -> TickOutcome {
    if state.phase != SessionState::Running {
        return TickOutcome::Skipped;
    }
    state.time_ticks += 1;

    // Commit the pending intent (at most one per tick)
    if let Some(dir) = state.pending_intent.take() {
        state.snake.direction = dir;
    }

    let Some(next) = state.grid.step(state.snake.head(), state.snake.direction) else {
        return TickOutcome::Lost(LossCause::Boundary);
    };

    // Checked against the whole pre-move body, tail included, even though
    // the tail would be vacated this tick.
    if state.snake.contains(next) {
        return TickOutcome::Lost(LossCause::SelfCollision);
    }

    state.snake.push_head(next);

    let outcome = if next == state.target {
        state.score += 1;
        state.events.push(GameEvent::Consumed {
            score: state.score,
            cell: next,
        });
        // Relocate even on the winning bite so the final snapshot never shows
        // the target under the head. Only a full grid leaves it in place, and
        // validated win lengths never exceed the cell count.
        state.spawn_target();
        if state.snake.len() >= state.win_length {
            TickOutcome::Won
        } else {
            TickOutcome::Consumed
        }
    } else {
        state.snake.drop_tail();
        TickOutcome::Moved
    };

    state.events.push(GameEvent::Snapshot(state.snapshot()));
    outcome
}
