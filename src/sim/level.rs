//! Difficulty progression
//!
//! Level is derived from accumulated survival time only. The controller is a
//! stopwatch: pausing folds the live interval into the accumulated total.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Level for a survival time, 1-based and capped
pub fn level_for(survival_time: f64, seconds_between_levels: f64, max_level: u32) -> u32 {
    let steps = (survival_time.max(0.0) / seconds_between_levels).floor();
    let level = if steps >= max_level as f64 {
        max_level
    } else {
        steps as u32 + 1
    };
    level.clamp(1, max_level.max(1))
}

/// Outcome of a level tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelTick {
    pub level: u32,
    pub leveled_up: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelController {
    level: u32,
    accumulated: f64,
    running_since: Option<f64>,
    seconds_between_levels: f64,
    max_level: u32,
}

impl LevelController {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            accumulated: 0.0,
            running_since: None,
            seconds_between_levels: tuning.seconds_between_levels,
            max_level: tuning.max_level,
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    /// Accumulated time plus the live interval since the last resume
    pub fn survival_time(&self, now: f64) -> f64 {
        let live = self
            .running_since
            .map(|since| (now - since).max(0.0))
            .unwrap_or(0.0);
        self.accumulated + live
    }

    /// Recompute the level. Never goes down.
    pub fn tick(&mut self, now: f64) -> LevelTick {
        let computed = level_for(
            self.survival_time(now),
            self.seconds_between_levels,
            self.max_level,
        );
        let leveled_up = computed > self.level;
        if leveled_up {
            self.level = computed;
            log::info!("Level up: {}", self.level);
        }
        LevelTick {
            level: self.level,
            leveled_up,
        }
    }

    pub fn pause(&mut self, now: f64) {
        if let Some(since) = self.running_since.take() {
            self.accumulated += (now - since).max(0.0);
        }
    }

    pub fn resume(&mut self, now: f64) {
        if self.running_since.is_none() {
            self.running_since = Some(now);
        }
    }

    /// Zero the stopwatch and return to level 1 (stopped)
    pub fn reset(&mut self) {
        self.level = 1;
        self.accumulated = 0.0;
        self.running_since = None;
    }
}

/// Hazard parameters derived from the current level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    pub level: u32,
    pub zap_interval: f64,
    pub laser_interval: f64,
    pub boulder_interval: f64,
    /// Fraction of the zap charge window removed, see `ZapField::set_charge_reduction`
    pub zap_charge_reduction: f64,
}

impl DifficultyParams {
    pub fn for_level(level: u32, tuning: &Tuning) -> Self {
        let above_first = level.saturating_sub(1) as f64;
        Self {
            level,
            zap_interval: tuning.zap_interval.at_level(level, tuning.interval_step),
            laser_interval: tuning.laser_interval.at_level(level, tuning.interval_step),
            boulder_interval: tuning
                .boulder_interval
                .at_level(level, tuning.interval_step),
            zap_charge_reduction: (tuning.charge_reduction_step * above_first)
                .min(tuning.charge_reduction_cap),
        }
    }
}
