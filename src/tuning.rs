//! Data-driven game balance
//!
//! Every timing and difficulty constant lives in [`Tuning`]. The defaults
//! reproduce the shipped balance; a JSON file can override any subset.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Spawn cadence for one hazard family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnInterval {
    /// Interval at level 1 (seconds)
    pub base: f64,
    /// Interval never drops below this
    pub floor: f64,
}

impl SpawnInterval {
    pub const fn new(base: f64, floor: f64) -> Self {
        Self { base, floor }
    }

    /// Interval at `level`, shrinking by `step` per level above 1
    pub fn at_level(&self, level: u32, step: f64) -> f64 {
        let reduced = self.base - step * level.saturating_sub(1) as f64;
        reduced.max(self.floor)
    }
}

/// Boulder timings that apply from `min_level` upward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoulderTiming {
    pub min_level: u32,
    /// Time spent parked off-grid before rolling (seconds)
    pub wait: f64,
    /// Time to cross the full column (seconds)
    pub roll: f64,
}

/// Game balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub grid_size: usize,
    /// Player hitbox as a fraction of a cell
    pub player_scale: f32,

    pub zap_base_delay: f64,
    pub zap_warning_duration: f64,
    /// Draws before a zap spawn accepts a taken cell
    pub zap_spawn_attempts: u32,

    /// Redraws before a laser/boulder accepts its previous row/column
    pub placement_attempts: u32,

    pub laser_full_duration: f64,
    pub laser_thickness: f32,

    pub jitter_amplitude: f32,
    pub jitter_frequency: f32,

    /// Sorted by `min_level`; the last entry at or below the level wins
    pub boulder_timings: Vec<BoulderTiming>,

    pub seconds_between_levels: f64,
    pub max_level: u32,

    pub zap_interval: SpawnInterval,
    pub laser_interval: SpawnInterval,
    pub boulder_interval: SpawnInterval,
    /// Seconds shaved off every spawn interval per level
    pub interval_step: f64,

    /// Zap charge reduction gained per level
    pub charge_reduction_step: f64,
    pub charge_reduction_cap: f64,

    pub death_grace: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_size: GRID_SIZE,
            player_scale: PLAYER_SCALE,

            zap_base_delay: ZAP_BASE_DELAY,
            zap_warning_duration: ZAP_WARNING_DURATION,
            zap_spawn_attempts: 5,

            placement_attempts: 3,

            laser_full_duration: LASER_FULL_DURATION,
            laser_thickness: LASER_THICKNESS,

            jitter_amplitude: JITTER_AMPLITUDE,
            jitter_frequency: JITTER_FREQUENCY,

            boulder_timings: vec![
                BoulderTiming {
                    min_level: 1,
                    wait: 2.0,
                    roll: 3.5,
                },
                BoulderTiming {
                    min_level: 4,
                    wait: 1.75,
                    roll: 3.0,
                },
                BoulderTiming {
                    min_level: 5,
                    wait: 1.5,
                    roll: 2.0,
                },
            ],

            seconds_between_levels: SECONDS_BETWEEN_LEVELS,
            max_level: MAX_LEVEL,

            zap_interval: SpawnInterval::new(3.0, 1.0),
            laser_interval: SpawnInterval::new(7.0, 3.5),
            boulder_interval: SpawnInterval::new(8.0, 5.0),
            interval_step: 0.5,

            charge_reduction_step: 0.1,
            charge_reduction_cap: 0.8,

            death_grace: DEATH_GRACE,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning (grid {}x{})", tuning.grid_size, tuning.grid_size);
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
            TuningError::Invalid {
                field,
                reason: reason.into(),
            }
        }

        if self.grid_size == 0 {
            return Err(invalid("grid_size", "must be at least 1"));
        }
        if !(self.player_scale > 0.0 && self.player_scale <= 1.0) {
            return Err(invalid("player_scale", "must be in (0, 1]"));
        }
        for (field, value) in [
            ("zap_base_delay", self.zap_base_delay),
            ("zap_warning_duration", self.zap_warning_duration),
            ("laser_full_duration", self.laser_full_duration),
            ("seconds_between_levels", self.seconds_between_levels),
        ] {
            if !(value > 0.0) {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }
        if self.death_grace < 0.0 {
            return Err(invalid("death_grace", "must not be negative"));
        }
        if self.zap_spawn_attempts == 0 {
            return Err(invalid("zap_spawn_attempts", "must be at least 1"));
        }
        if self.max_level == 0 {
            return Err(invalid("max_level", "must be at least 1"));
        }
        if !(0.0..=ZAP_MAX_CHARGE_REDUCTION).contains(&self.charge_reduction_cap) {
            return Err(invalid(
                "charge_reduction_cap",
                format!("must be within [0, {ZAP_MAX_CHARGE_REDUCTION}]"),
            ));
        }
        if !(self.laser_thickness > 0.0 && self.laser_thickness <= 1.0) {
            return Err(invalid("laser_thickness", "must be in (0, 1]"));
        }
        if self.placement_attempts == 0 {
            return Err(invalid("placement_attempts", "must be at least 1"));
        }
        if self.charge_reduction_step < 0.0 {
            return Err(invalid("charge_reduction_step", "must not be negative"));
        }
        if self.interval_step < 0.0 {
            return Err(invalid("interval_step", "must not be negative"));
        }
        for (field, interval) in [
            ("zap_interval", self.zap_interval),
            ("laser_interval", self.laser_interval),
            ("boulder_interval", self.boulder_interval),
        ] {
            if !(interval.floor > 0.0) || interval.floor > interval.base {
                return Err(invalid(field, "floor must be positive and not above base"));
            }
        }
        match self.boulder_timings.first() {
            Some(first) if first.min_level <= 1 => {}
            _ => return Err(invalid("boulder_timings", "needs an entry covering level 1")),
        }
        if self
            .boulder_timings
            .windows(2)
            .any(|w| w[0].min_level >= w[1].min_level)
        {
            return Err(invalid("boulder_timings", "must be sorted by min_level"));
        }
        if self
            .boulder_timings
            .iter()
            .any(|t| t.wait < 0.0 || !(t.roll > 0.0))
        {
            return Err(invalid("boulder_timings", "wait >= 0 and roll > 0 required"));
        }
        Ok(())
    }

    /// Boulder wait/roll durations for a level
    pub fn boulder_timing(&self, level: u32) -> BoulderTiming {
        timing_for_level(&self.boulder_timings, level)
    }
}

/// Last entry whose `min_level` is at or below `level`
pub fn timing_for_level(timings: &[BoulderTiming], level: u32) -> BoulderTiming {
    timings
        .iter()
        .rev()
        .find(|t| t.min_level <= level)
        .or(timings.first())
        .copied()
        .unwrap_or(BoulderTiming {
            min_level: 1,
            wait: 2.0,
            roll: 3.5,
        })
}
