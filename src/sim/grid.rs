//! Grid geometry
//!
//! Discrete cells are addressed by [`GridPosition`] (col = x, row = y, row 0
//! at the bottom). [`GridLayout`] maps them to viewport space and back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A cell on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub col: usize,
    pub row: usize,
}

impl GridPosition {
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }

    /// Centre cell of a grid
    pub const fn center(grid_size: usize) -> Self {
        Self::new(grid_size / 2, grid_size / 2)
    }

    /// Neighbour in `direction`, or `None` if it would leave the grid
    pub fn step(self, direction: Direction, grid_size: usize) -> Option<Self> {
        let Self { col, row } = self;
        match direction {
            Direction::Up if row + 1 < grid_size => Some(Self::new(col, row + 1)),
            Direction::Down if row > 0 => Some(Self::new(col, row - 1)),
            Direction::Left if col > 0 => Some(Self::new(col - 1, row)),
            Direction::Right if col + 1 < grid_size => Some(Self::new(col + 1, row)),
            _ => None,
        }
    }
}

/// Decoded swipe command
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

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "Up",
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
        }
    }
}

/// Axis-aligned rectangle in viewport space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Overlap test; touching edges do not count
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Placement of the grid inside the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub grid_size: usize,
    pub cell_size: f32,
    /// Bottom-left corner of cell (0, 0)
    pub origin: Vec2,
}

impl GridLayout {
    /// Fit a square grid into the viewport's shorter side, centred
    pub fn compute(viewport: Vec2, grid_size: usize) -> Self {
        let cells = grid_size.max(1) as f32;
        let cell_size = viewport.x.min(viewport.y).max(0.0) / cells;
        let extent = cell_size * cells;
        let origin = (viewport - Vec2::splat(extent)) * 0.5;
        Self {
            grid_size,
            cell_size,
            origin,
        }
    }

    /// Side length of the whole grid
    pub fn extent(&self) -> f32 {
        self.cell_size * self.grid_size as f32
    }

    pub fn contains(&self, pos: GridPosition) -> bool {
        pos.col < self.grid_size && pos.row < self.grid_size
    }

    pub fn cell_center(&self, pos: GridPosition) -> Vec2 {
        self.origin
            + Vec2::new(
                (pos.col as f32 + 0.5) * self.cell_size,
                (pos.row as f32 + 0.5) * self.cell_size,
            )
    }

    pub fn cell_rect(&self, pos: GridPosition) -> Rect {
        Rect::from_center_size(self.cell_center(pos), Vec2::splat(self.cell_size))
    }

    /// Cell under a viewport point, if any
    pub fn position_at(&self, point: Vec2) -> Option<GridPosition> {
        if self.cell_size <= 0.0 {
            return None;
        }
        let local = (point - self.origin) / self.cell_size;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let pos = GridPosition::new(local.x.floor() as usize, local.y.floor() as usize);
        self.contains(pos).then_some(pos)
    }

    /// Y coordinate of a row centre; rows outside the grid extrapolate
    pub fn row_center_y(&self, row: f32) -> f32 {
        self.origin.y + (row + 0.5) * self.cell_size
    }

    /// X coordinate of a column centre
    pub fn col_center_x(&self, col: usize) -> f32 {
        self.origin.x + (col as f32 + 0.5) * self.cell_size
    }
}
