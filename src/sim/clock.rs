//! Pausable game clock
//!
//! The host hands us monotonic wall timestamps once per frame. Every
//! simulation timer runs on game time instead: seconds since the round epoch
//! with all paused spans removed. Pausing freezes game time, so nothing
//! inside the simulation can observe how long a pause lasted.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimClock {
    epoch: Option<f64>,
    paused_total: f64,
    paused_at: Option<f64>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// No epoch yet; the next frame only records one
    pub fn needs_epoch(&self) -> bool {
        self.epoch.is_none()
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.epoch.is_some() && !self.is_paused()
    }

    /// Start game time at zero from `wall`
    pub fn start(&mut self, wall: f64) {
        self.epoch = Some(wall);
        self.paused_total = 0.0;
        self.paused_at = None;
    }

    /// Game time at `wall`; frozen while paused
    pub fn game_time(&self, wall: f64) -> f64 {
        let Some(epoch) = self.epoch else {
            return 0.0;
        };
        let sample = self.paused_at.unwrap_or(wall);
        (sample - epoch - self.paused_total).max(0.0)
    }

    pub fn pause(&mut self, wall: f64) {
        if self.epoch.is_some() && self.paused_at.is_none() {
            self.paused_at = Some(wall);
        }
    }

    pub fn resume(&mut self, wall: f64) {
        if let Some(at) = self.paused_at.take() {
            self.paused_total += (wall - at).max(0.0);
        }
    }

    /// Forget the epoch; the next frame starts a fresh round
    pub fn restart(&mut self) {
        *self = Self::default();
    }
}
