//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Timestamps come from the host, once per frame
//! - Seeded or injected randomness only
//! - Fixed hazard update order (Zap, Laser, Boulder)
//! - No rendering, audio playback or platform dependencies

pub mod boulder;
pub mod clock;
pub mod events;
pub mod grid;
pub mod laser;
pub mod level;
pub mod player;
pub mod rng;
pub mod state;
pub mod tick;
pub mod zap;

pub use boulder::{Boulder, BoulderPhase};
pub use clock::SimClock;
pub use events::{FrameOutput, GameEvent, HazardKind, RenderCommand};
pub use grid::{Direction, GridLayout, GridPosition, Rect};
pub use laser::{LaserBeam, LaserPhase};
pub use level::{DifficultyParams, LevelController};
pub use player::{MoveOutcome, Player, PlayerLife};
pub use rng::{RandomSource, ScriptedRng};
pub use state::{GamePhase, GameState, SpawnSchedule};
pub use tick::{TickInput, idle_direction, tick};
pub use zap::{ZapCell, ZapField};
