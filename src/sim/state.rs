//! Game state and round lifecycle
//!
//! `GameState` owns every simulation component. Hazards get what they need
//! (layout, player hitbox, level) as call arguments; nothing holds a
//! reference back into the state.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boulder::Boulder;
use super::clock::SimClock;
use super::events::GameEvent;
use super::grid::{GridLayout, GridPosition, Rect};
use super::laser::LaserBeam;
use super::level::{DifficultyParams, LevelController};
use super::player::Player;
use super::rng::seeded;
use super::zap::ZapField;
use crate::session::SessionStats;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Clock gated; no updates or spawns
    Paused,
}

/// Next spawn time per hazard family (game time)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    pub zap: f64,
    pub laser: f64,
    pub boulder: f64,
}

impl SpawnSchedule {
    /// First spawns, one interval after the epoch
    pub fn first(difficulty: &DifficultyParams) -> Self {
        Self {
            zap: difficulty.zap_interval,
            laser: difficulty.laser_interval,
            boulder: difficulty.boulder_interval,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub layout: GridLayout,
    pub phase: GamePhase,
    pub player: Player,
    pub zaps: ZapField,
    pub laser: LaserBeam,
    pub boulder: Boulder,
    pub level: LevelController,
    pub difficulty: DifficultyParams,
    pub schedule: SpawnSchedule,
    pub clock: SimClock,
    /// Every finished round so far
    pub session: SessionStats,
    pub(crate) rng: Pcg32,
    /// Events raised between frames (input, pause), flushed by the next frame
    pub(crate) pending: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game for a viewport; the first frame starts the round
    pub fn new(seed: u64, tuning: Tuning, viewport: Vec2) -> Self {
        let layout = GridLayout::compute(viewport, tuning.grid_size);
        let difficulty = DifficultyParams::for_level(1, &tuning);
        Self {
            seed,
            layout,
            phase: GamePhase::Playing,
            player: Player::new(GridPosition::center(tuning.grid_size)),
            zaps: ZapField::new(&tuning),
            laser: LaserBeam::new(&tuning),
            boulder: Boulder::new(&tuning),
            level: LevelController::new(&tuning),
            schedule: SpawnSchedule::first(&difficulty),
            difficulty,
            clock: SimClock::new(),
            session: SessionStats::new(),
            rng: seeded(seed),
            pending: Vec::new(),
            tuning,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Current game time for a wall timestamp
    pub fn game_time(&self, wall: f64) -> f64 {
        self.clock.game_time(wall)
    }

    pub fn survival_time(&self, wall: f64) -> f64 {
        self.level.survival_time(self.game_time(wall))
    }

    pub fn player_hitbox(&self) -> Rect {
        self.player.hitbox(&self.layout, self.tuning.player_scale)
    }

    /// Apply difficulty for `level` to every hazard family
    pub(crate) fn apply_level(&mut self, level: u32) {
        self.difficulty = DifficultyParams::for_level(level, &self.tuning);
        self.zaps.set_charge_reduction(self.difficulty.zap_charge_reduction);
    }

    /// Fresh round: player home, hazards gone, level 1, clock waiting for
    /// the next frame to set its epoch
    pub fn reset_round(&mut self) {
        self.player.respawn();
        self.zaps.clear();
        self.laser.clear();
        self.boulder.clear();
        self.level.reset();
        self.apply_level(1);
        self.schedule = SpawnSchedule::first(&self.difficulty);
        self.clock.restart();
        self.phase = GamePhase::Playing;
    }
}
