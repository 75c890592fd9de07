//! No Hit Mania - a grid-dodging arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, hazards, difficulty, frame loop)
//! - `audio`: Sound/music cues and the sinks that receive them
//! - `tuning`: Data-driven game balance
//! - `session`: Per-session round statistics

pub mod audio;
pub mod session;
pub mod sim;
pub mod tuning;

pub use audio::{AudioSettings, AudioSink, MusicTrack, SoundEffect};
pub use session::{RoundSummary, SessionStats};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Cells per side of the square play grid
    pub const GRID_SIZE: usize = 5;

    /// Player sprite covers 80% of a cell
    pub const PLAYER_SCALE: f32 = 0.8;

    /// Zap cell: base delay between spawn and activation (seconds)
    pub const ZAP_BASE_DELAY: f64 = 2.0;
    /// Zap cell: warning window before activation (seconds)
    pub const ZAP_WARNING_DURATION: f64 = 1.5;
    /// Charge reduction is clamped to this so the warning never fully vanishes
    pub const ZAP_MAX_CHARGE_REDUCTION: f64 = 0.9;

    /// Laser: time from placement to expiry (seconds)
    pub const LASER_FULL_DURATION: f64 = 6.0;
    /// Beam becomes visible past this fraction of the full duration
    pub const LASER_VISIBLE_FRACTION: f64 = 30.0 / 60.0;
    /// Beam hitbox is live past this fraction of the full duration
    pub const LASER_LETHAL_FRACTION: f64 = 31.0 / 60.0;
    /// Beam thickness as a fraction of a cell
    pub const LASER_THICKNESS: f32 = 2.0 / 3.0;

    /// Visual wobble shared by the beam and the boulder (cell units / Hz)
    pub const JITTER_AMPLITUDE: f32 = 0.5;
    pub const JITTER_FREQUENCY: f32 = 4.0;

    /// Player death animation before the round resets (seconds)
    pub const DEATH_GRACE: f64 = 0.3;

    /// Difficulty progression
    pub const SECONDS_BETWEEN_LEVELS: f64 = 5.0;
    pub const MAX_LEVEL: u32 = 5;
}

/// Format a survival time as `MM:SS.hh`
pub fn format_survival_time(secs: f64) -> String {
    let secs = secs.max(0.0);
    let total = secs.floor() as u64;
    let minutes = total / 60;
    let seconds = total % 60;
    let hundredths = ((secs - total as f64) * 100.0).floor() as u64;
    format!("{:02}:{:02}.{:02}", minutes, seconds, hundredths.min(99))
}
