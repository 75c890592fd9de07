//! Player token on the grid

use serde::{Deserialize, Serialize};

use super::grid::{Direction, GridLayout, GridPosition, Rect};

/// Player lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerLife {
    Alive,
    /// Death animation running since `since` (game time)
    Dying { since: f64 },
}

/// Result of a movement command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Moved(GridPosition),
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub position: GridPosition,
    pub life: PlayerLife,
    /// Where the player (re)spawns
    pub spawn: GridPosition,
}

impl Player {
    pub fn new(spawn: GridPosition) -> Self {
        Self {
            position: spawn,
            life: PlayerLife::Alive,
            spawn,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.life == PlayerLife::Alive
    }

    /// Move one cell; edges of the grid block the move
    pub fn try_move(&mut self, direction: Direction, grid_size: usize) -> MoveOutcome {
        match self.position.step(direction, grid_size) {
            Some(next) => {
                self.position = next;
                MoveOutcome::Moved(next)
            }
            None => MoveOutcome::Blocked,
        }
    }

    pub fn kill(&mut self, now: f64) {
        if self.is_alive() {
            self.life = PlayerLife::Dying { since: now };
        }
    }

    /// Back to the spawn cell, alive
    pub fn respawn(&mut self) {
        self.position = self.spawn;
        self.life = PlayerLife::Alive;
    }

    /// Hitbox in viewport space, `scale` of a cell around the cell centre
    pub fn hitbox(&self, layout: &GridLayout, scale: f32) -> Rect {
        player_rect(layout, self.position, scale)
    }
}

pub fn player_rect(layout: &GridLayout, position: GridPosition, scale: f32) -> Rect {
    let size = layout.cell_size * scale;
    Rect::from_center_size(layout.cell_center(position), glam::Vec2::splat(size))
}
