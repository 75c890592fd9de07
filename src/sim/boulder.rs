//! Rolling boulder: a column sweep
//!
//! The boulder parks one cell off-grid at its starting end for `wait`
//! seconds, then crosses the column linearly over `roll` seconds to one cell
//! past the far end. Its position is a pure function of elapsed time, so
//! the collision test and the rendered position always agree within a frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::{GameEvent, RenderCommand};
use super::grid::{GridLayout, Rect};
use super::laser::jitter;
use super::rng::{RandomSource, pick_with_retries};
use crate::tuning::{BoulderTiming, Tuning, timing_for_level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoulderPhase {
    Idle,
    Rolling,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boulder {
    pub column: usize,
    pub phase: BoulderPhase,
    pub start_time: f64,
    /// Rolls top to bottom when true
    pub from_top: bool,
    pub wait: f64,
    pub roll: f64,
    timings: Vec<BoulderTiming>,
    placement_attempts: u32,
    grid_size: usize,
    jitter_amplitude: f32,
    jitter_frequency: f32,
}

impl Boulder {
    pub fn new(tuning: &Tuning) -> Self {
        let timing = tuning.boulder_timing(1);
        Self {
            column: tuning.grid_size / 2,
            phase: BoulderPhase::Idle,
            start_time: 0.0,
            from_top: false,
            wait: timing.wait,
            roll: timing.roll,
            timings: tuning.boulder_timings.clone(),
            placement_attempts: tuning.placement_attempts,
            grid_size: tuning.grid_size,
            jitter_amplitude: tuning.jitter_amplitude,
            jitter_frequency: tuning.jitter_frequency,
        }
    }

    pub fn is_rolling(&self) -> bool {
        self.phase == BoulderPhase::Rolling
    }

    /// Pick a new column and direction and schedule the traversal
    pub fn start_roll<R: RandomSource + ?Sized>(
        &mut self,
        now: f64,
        level: u32,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        let size = self.grid_size;
        let current = self.column;
        self.column = pick_with_retries(rng, self.placement_attempts, |r| r.index(size), |&col| {
            col != current
        });
        self.from_top = !rng.coin();
        let timing = timing_for_level(&self.timings, level);
        self.wait = timing.wait;
        self.roll = timing.roll;
        self.start_time = now;
        self.phase = BoulderPhase::Rolling;
        log::debug!(
            "Boulder in column {} ({}), wait {:.2}s roll {:.2}s",
            self.column,
            if self.from_top { "from top" } else { "from bottom" },
            self.wait,
            self.roll
        );
        events.push(GameEvent::BoulderRolling {
            column: self.column,
            from_top: self.from_top,
        });
    }

    /// Vertical position in row units: -1 is just below the grid,
    /// `grid_size` just above it
    pub fn row_at(&self, now: f64) -> f32 {
        let (start, end) = if self.from_top {
            (self.grid_size as f32, -1.0)
        } else {
            (-1.0, self.grid_size as f32)
        };
        let moving = now - self.start_time - self.wait;
        if moving <= 0.0 {
            return start;
        }
        let progress = (moving / self.roll).min(1.0) as f32;
        start + (end - start) * progress
    }

    pub fn center(&self, layout: &GridLayout, now: f64) -> Vec2 {
        Vec2::new(
            layout.col_center_x(self.column),
            layout.row_center_y(self.row_at(now)),
        )
    }

    pub fn rect(&self, layout: &GridLayout, now: f64) -> Rect {
        Rect::from_center_size(self.center(layout, now), Vec2::splat(layout.cell_size))
    }

    /// Advance the roll. Returns true if the boulder overlaps `player`.
    pub fn update(
        &mut self,
        now: f64,
        layout: &GridLayout,
        player: &Rect,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !self.is_rolling() {
            return false;
        }
        if now - self.start_time >= self.wait + self.roll {
            self.phase = BoulderPhase::Idle;
            log::debug!("Boulder finished column {}", self.column);
            events.push(GameEvent::BoulderFinished {
                column: self.column,
            });
            return false;
        }
        self.rect(layout, now).intersects(player)
    }

    pub fn render(&self, layout: &GridLayout, now: f64, out: &mut Vec<RenderCommand>) {
        if !self.is_rolling() {
            return;
        }
        let elapsed = now - self.start_time;
        out.push(RenderCommand::Boulder {
            column: self.column,
            center: self.center(layout, now),
            offset_x: jitter(elapsed, self.jitter_amplitude, self.jitter_frequency),
        });
    }

    /// Remove from play, cancelling any traversal in flight
    pub fn clear(&mut self) {
        self.phase = BoulderPhase::Idle;
    }
}
