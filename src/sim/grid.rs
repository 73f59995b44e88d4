//! Discrete N x N coordinate space and step arithmetic

use serde::{Deserialize, Serialize};

use crate::settings::BoundaryPolicy;

/// A grid cell (x = column, y = row; row 0 is the top)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Movement direction, one cell per tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit delta in grid coordinates
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }
}

/// The playfield: dimension plus edge policy, fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub dimension: i32,
    pub policy: BoundaryPolicy,
}

impl Grid {
    pub fn new(dimension: u32, policy: BoundaryPolicy) -> Self {
        Self {
            dimension: dimension as i32,
            policy,
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.dimension).contains(&cell.x) && (0..self.dimension).contains(&cell.y)
    }

    pub fn cell_count(&self) -> usize {
        let n = self.dimension as usize;
        n * n
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.dimension).flat_map(move |y| (0..self.dimension).map(move |x| Cell::new(x, y)))
    }

    /// Move one cell in `dir`.
    ///
    /// Under `Wrap` the result re-enters from the opposite edge. Under
    /// `Bounded` leaving the grid yields `None`, which callers treat as a
    /// terminal collision.
    pub fn step(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let n = self.dimension;
        match self.policy {
            BoundaryPolicy::Wrap => Some(Cell::new(
                (cell.x + dx + n).rem_euclid(n),
                (cell.y + dy + n).rem_euclid(n),
            )),
            BoundaryPolicy::Bounded => {
                let next = Cell::new(cell.x + dx, cell.y + dy);
                self.contains(next).then_some(next)
            }
        }
    }

    /// Manhattan distance, taking the short way around under `Wrap`
    pub fn distance(&self, a: Cell, b: Cell) -> i32 {
        let axis = |p: i32, q: i32| {
            let d = (p - q).abs();
            match self.policy {
                BoundaryPolicy::Wrap => d.min(self.dimension - d),
                BoundaryPolicy::Bounded => d,
            }
        };
        axis(a.x, b.x) + axis(a.y, b.y)
    }
}
