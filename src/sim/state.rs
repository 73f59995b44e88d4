//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives here.

use std::collections::{HashSet, VecDeque};

use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Direction, Grid};
use crate::consts::*;
use crate::events::GameEvent;
use crate::settings::Settings;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Constructed, waiting for the first start command
    Idle,
    /// Ticks are executing
    Running,
    /// Timer cancelled, state preserved
    Paused,
    /// Run ended by a collision
    Lost,
    /// Run ended by reaching the win length
    Won,
}

impl SessionState {
    /// Lost or Won
    pub fn is_ended(self) -> bool {
        matches!(self, SessionState::Lost | SessionState::Won)
    }
}

/// Why a run was lost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LossCause {
    /// Head moved onto the body
    SelfCollision,
    /// Head left a bounded grid
    Boundary,
}

/// The player-controlled chain of cells, head first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Cell>,
    /// Direction last applied by a tick
    pub direction: Direction,
}

impl Snake {
    pub fn new(cells: impl IntoIterator<Item = Cell>, direction: Direction) -> Self {
        let body: VecDeque<Cell> = cells.into_iter().collect();
        debug_assert!(!body.is_empty(), "snake needs at least a head");
        Self { body, direction }
    }

    /// Starting layout: horizontal, facing right, head a third of the way in
    pub fn initial(grid: &Grid) -> Self {
        let c = grid.dimension / 3;
        Self::new(
            (0..INITIAL_LENGTH as i32).map(|i| Cell::new(c - i, c)),
            Direction::Right,
        )
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.body.contains(&cell)
    }

    /// Body cells, head first
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.body.iter().copied()
    }

    pub(crate) fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

/// Immutable per-tick view handed to presentation adapters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Body cells, head first
    pub body: Vec<Cell>,
    /// Never on the body, except on a completely filled grid where no
    /// free cell remains and the target stays on the final head
    pub target: Cell,
    pub score: u32,
    pub state: SessionState,
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was built from
    pub seed: u64,
    rng: Pcg32,
    /// Playfield, fixed for the lifetime of this state
    pub grid: Grid,
    /// Body length that wins the run
    pub win_length: usize,
    /// Current phase
    pub phase: SessionState,
    pub snake: Snake,
    pub target: Cell,
    pub score: u32,
    /// Latest accepted direction not yet applied
    pub pending_intent: Option<Direction>,
    /// Ticks executed since the last start
    pub time_ticks: u64,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle game with the starting layout and a placed target.
    ///
    /// `settings` must already be validated; hosts go through `Session`.
    pub(crate) fn new(settings: &Settings, seed: u64) -> Self {
        let grid = Grid::new(settings.grid_dimension, settings.boundary);
        let snake = Snake::initial(&grid);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            grid,
            win_length: settings.effective_win_length(),
            phase: SessionState::Idle,
            target: snake.head(),
            snake,
            score: 0,
            pending_intent: None,
            time_ticks: 0,
            events: Vec::new(),
        };
        state.spawn_target();
        state
    }

    /// Put the board back to the starting layout (phase is left to the caller)
    pub fn reset(&mut self) {
        self.snake = Snake::initial(&self.grid);
        self.score = 0;
        self.pending_intent = None;
        self.time_ticks = 0;
        self.spawn_target();
    }

    /// Relocate the target to a uniformly random free cell.
    ///
    /// Returns `None` (target unchanged) when the body covers the grid.
    pub fn spawn_target(&mut self) -> Option<Cell> {
        let n = self.grid.dimension;
        for _ in 0..TARGET_SAMPLE_ATTEMPTS {
            let cell = Cell::new(self.rng.random_range(0..n), self.rng.random_range(0..n));
            if !self.snake.contains(cell) {
                self.target = cell;
                return Some(cell);
            }
        }

        // Crowded board: pick among the free cells directly
        let occupied: HashSet<Cell> = self.snake.cells().collect();
        let cell = self
            .grid
            .cells()
            .filter(|c| !occupied.contains(c))
            .choose(&mut self.rng)?;
        self.target = cell;
        Some(cell)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            body: self.snake.cells().collect(),
            target: self.target,
            score: self.score,
            state: self.phase,
        }
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
