//! Deterministic simulation module
//!
//! All gameplay rules live here. This module must be pure and deterministic:
//! - One step per tick, no wall-clock reads
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod grid;
pub mod state;
pub mod tick;

pub use grid::{Cell, Direction, Grid};
pub use state::{GameState, LossCause, SessionState, Snake, Snapshot};
pub use tick::{TickOutcome, tick};
