//! Laser beam: a full-width row strike
//!
//! Timeline for a placement with full duration `D`:
//! - `elapsed <= 30/60 D`: charging, emitters blink at 1 Hz, no hitbox
//! - `30/60 D < elapsed <= 31/60 D`: beam appears, blast cue plays once
//! - `31/60 D < elapsed < D`: beam is lethal
//! - `elapsed >= D`: expired

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, RenderCommand};
use super::grid::{GridLayout, Rect};
use super::rng::{RandomSource, pick_with_retries};
use crate::consts::{LASER_LETHAL_FRACTION, LASER_VISIBLE_FRACTION};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaserPhase {
    Idle,
    Charging,
    Firing,
    Expired,
}

/// Phase implied by time since placement
pub fn phase_at(elapsed: f64, full_duration: f64) -> LaserPhase {
    if elapsed >= full_duration {
        LaserPhase::Expired
    } else if elapsed > LASER_VISIBLE_FRACTION * full_duration {
        LaserPhase::Firing
    } else {
        LaserPhase::Charging
    }
}

/// Whether the beam hitbox is live at `elapsed`
pub fn is_lethal(elapsed: f64, full_duration: f64) -> bool {
    elapsed > LASER_LETHAL_FRACTION * full_duration && elapsed < full_duration
}

/// Cosmetic wobble, never used for collision
pub fn jitter(elapsed: f64, amplitude: f32, frequency: f32) -> f32 {
    ((elapsed as f32) * std::f32::consts::PI * frequency).sin() * amplitude
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserBeam {
    pub row: usize,
    pub phase: LaserPhase,
    pub start_time: f64,
    blast_fired: bool,
    full_duration: f64,
    thickness: f32,
    jitter_amplitude: f32,
    jitter_frequency: f32,
    placement_attempts: u32,
    grid_size: usize,
}

impl LaserBeam {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            row: tuning.grid_size / 2,
            phase: LaserPhase::Idle,
            start_time: 0.0,
            blast_fired: false,
            full_duration: tuning.laser_full_duration,
            thickness: tuning.laser_thickness,
            jitter_amplitude: tuning.jitter_amplitude,
            jitter_frequency: tuning.jitter_frequency,
            placement_attempts: tuning.placement_attempts,
            grid_size: tuning.grid_size,
        }
    }

    /// Charging or firing
    pub fn is_active(&self) -> bool {
        matches!(self.phase, LaserPhase::Charging | LaserPhase::Firing)
    }

    /// Move to a new row (redrawn while it matches `avoid_row`) and start charging.
    /// Any beam in progress is discarded.
    pub fn place<R: RandomSource + ?Sized>(
        &mut self,
        now: f64,
        avoid_row: usize,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        let size = self.grid_size;
        self.row = pick_with_retries(rng, self.placement_attempts, |r| r.index(size), |&row| {
            row != avoid_row
        });
        self.phase = LaserPhase::Charging;
        self.start_time = now;
        self.blast_fired = false;
        log::debug!("Laser placed on row {} at {:.2}", self.row, now);
        events.push(GameEvent::LaserPlaced { row: self.row });
    }

    /// Beam hitbox: full grid width, centred on the row
    pub fn beam_rect(&self, layout: &GridLayout) -> Rect {
        let center = Vec2::new(
            layout.origin.x + layout.extent() * 0.5,
            layout.row_center_y(self.row as f32),
        );
        Rect::from_center_size(
            center,
            Vec2::new(layout.extent(), layout.cell_size * self.thickness),
        )
    }

    /// Advance the beam. Returns true if the lethal beam overlaps `player`.
    pub fn update(
        &mut self,
        now: f64,
        layout: &GridLayout,
        player: &Rect,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match self.phase {
            LaserPhase::Idle => return false,
            LaserPhase::Expired => {
                self.phase = LaserPhase::Idle;
                return false;
            }
            LaserPhase::Charging | LaserPhase::Firing => {}
        }

        let elapsed = now - self.start_time;
        self.phase = phase_at(elapsed, self.full_duration);
        match self.phase {
            LaserPhase::Expired => {
                log::debug!("Laser on row {} expired", self.row);
                events.push(GameEvent::LaserExpired { row: self.row });
                false
            }
            LaserPhase::Firing => {
                if !self.blast_fired {
                    self.blast_fired = true;
                    events.push(GameEvent::LaserBlast { row: self.row });
                }
                is_lethal(elapsed, self.full_duration) && self.beam_rect(layout).intersects(player)
            }
            _ => false,
        }
    }

    pub fn render(&self, now: f64, out: &mut Vec<RenderCommand>) {
        if !self.is_active() {
            return;
        }
        let elapsed = now - self.start_time;
        let lit = match self.phase {
            LaserPhase::Firing => true,
            _ => elapsed.rem_euclid(1.0) >= 0.5,
        };
        out.push(RenderCommand::LaserNubs { row: self.row, lit });
        if self.phase == LaserPhase::Firing {
            let offset_y = if is_lethal(elapsed, self.full_duration) {
                jitter(elapsed, self.jitter_amplitude, self.jitter_frequency)
            } else {
                0.0
            };
            out.push(RenderCommand::LaserBeam {
                row: self.row,
                offset_y,
            });
        }
    }

    pub fn clear(&mut self) {
        self.phase = LaserPhase::Idle;
        self.blast_fired = false;
    }
}
