//! Input translation
//!
//! Raw device events become one of two things: a directional intent or a
//! pause toggle. Keyboard and pointer paths share the same reversal filter.

pub mod gesture;
pub mod keys;

pub use gesture::{Gesture, GestureConfig, GestureRecognizer, classify_swipe};
pub use keys::{KeyCommand, map_key};

use crate::sim::Direction;

/// Whether `requested` may become the pending intent.
///
/// A body longer than one cell may not reverse onto itself: the exact
/// opposite of the committed direction (the one last applied by a tick)
/// is refused, however many intents arrive before the next tick.
pub fn admits_direction(requested: Direction, committed: Direction, body_len: usize) -> bool {
    body_len <= 1 || !requested.is_opposite(committed)
}
