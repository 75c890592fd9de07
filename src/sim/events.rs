//! Simulation output: gameplay events and per-frame render commands
//!
//! The core never touches sprites or audio directly. Each frame it returns
//! what happened ([`GameEvent`]) and what should be on screen
//! ([`RenderCommand`]); the host turns those into sprites and sounds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Direction, GridPosition};

/// Hazard family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardKind {
    Zap,
    Laser,
    Boulder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted,
    PlayerMoved {
        to: GridPosition,
        direction: Direction,
    },
    MoveBlocked {
        direction: Direction,
    },
    ZapSpawned {
        position: GridPosition,
        activation_time: f64,
    },
    ZapActivated {
        position: GridPosition,
        hit: bool,
    },
    LaserPlaced {
        row: usize,
    },
    LaserBlast {
        row: usize,
    },
    LaserExpired {
        row: usize,
    },
    BoulderRolling {
        column: usize,
        from_top: bool,
    },
    BoulderFinished {
        column: usize,
    },
    LevelUp {
        level: u32,
    },
    PlayerHit {
        hazard: HazardKind,
    },
    RoundOver {
        survival_time: f64,
        level: u32,
    },
    Paused,
    Resumed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    Player {
        position: GridPosition,
        dying: bool,
    },
    /// Scheduled zap cell; intensity 0 outside the warning window
    ZapWarning {
        position: GridPosition,
        intensity: f32,
    },
    /// Zap cell fired this frame
    ZapFlash {
        position: GridPosition,
    },
    /// Emitters at both ends of the laser row; `lit` alternates while charging
    LaserNubs {
        row: usize,
        lit: bool,
    },
    /// Visible beam, `offset_y` is cosmetic wobble in cell units
    LaserBeam {
        row: usize,
        offset_y: f32,
    },
    /// Boulder centre in viewport space plus cosmetic wobble in cell units
    Boulder {
        column: usize,
        center: Vec2,
        offset_x: f32,
    },
}

/// Everything one frame produced
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameOutput {
    pub events: Vec<GameEvent>,
    pub render: Vec<RenderCommand>,
}

impl FrameOutput {
    pub fn hit_by(&self) -> Option<HazardKind> {
        self.events.iter().find_map(|e| match e {
            GameEvent::PlayerHit { hazard } => Some(*hazard),
            _ => None,
        })
    }

    pub fn contains(&self, pred: impl Fn(&GameEvent) -> bool) -> bool {
        self.events.iter().any(pred)
    }
}
