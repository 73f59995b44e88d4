//! Grid Serpent - a fixed-tick grid arcade game engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, movement, collisions, game state)
//! - `session`: Lifecycle state machine and command surface for hosts
//! - `input`: Keyboard and pointer gesture translation
//! - `events`: Typed event stream delivered to host adapters
//! - `schedule`: Injectable repeating timer abstraction
//! - `settings`: Data-driven configuration

pub mod adapters;
pub mod audio;
pub mod autopilot;
pub mod events;
pub mod input;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod sim;

pub use events::{Adapter, EventBus, GameEvent};
pub use session::Session;
pub use settings::{BoundaryPolicy, Settings, SettingsError};
pub use sim::{Cell, Direction, SessionState, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Grid is N x N cells
    pub const DEFAULT_GRID_DIMENSION: u32 = 30;
    /// Smallest grid that fits the starting body with room to turn
    pub const MIN_GRID_DIMENSION: u32 = 6;
    pub const MAX_GRID_DIMENSION: u32 = 1024;

    /// Fixed simulation period (10 Hz)
    pub const DEFAULT_TICK_PERIOD_MS: u64 = 100;
    /// Maximum ticks per update call to prevent spiral of death
    pub const MAX_TICKS_PER_UPDATE: u32 = 8;

    /// Cells in the body at session start
    pub const INITIAL_LENGTH: usize = 3;
    /// Shortest configurable win length (must exceed the starting body)
    pub const MIN_WIN_LENGTH: usize = INITIAL_LENGTH + 1;

    /// Pointer gesture defaults (CSS pixels / milliseconds)
    pub const SWIPE_THRESHOLD_PX: f32 = 30.0;
    pub const DOUBLE_TAP_WINDOW_MS: f64 = 300.0;
    pub const DOUBLE_TAP_DISTANCE_PX: f32 = 40.0;

    /// Random placement attempts before falling back to enumerating free cells
    pub const TARGET_SAMPLE_ATTEMPTS: u32 = 64;
}
