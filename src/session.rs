//! Session statistics
//!
//! A session is every round played by one `GameState`. Each death folds the
//! round into the running totals; nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::sim::HazardKind;

/// How one round ended
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub survival_time: f64,
    pub level: u32,
    pub hazard: HazardKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    rounds_played: u32,
    longest: Option<RoundSummary>,
    last: Option<RoundSummary>,
    peak_level: u32,
    total_survival: f64,
    /// Deaths per hazard, indexed Zap, Laser, Boulder
    deaths: [u32; 3],
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a finished round in. Returns true if it is the session's longest.
    pub fn record(&mut self, round: RoundSummary) -> bool {
        self.rounds_played += 1;
        self.total_survival += round.survival_time.max(0.0);
        self.deaths[hazard_slot(round.hazard)] += 1;
        self.note_level(round.level);
        self.last = Some(round);

        let longer = self
            .longest
            .is_none_or(|best| round.survival_time > best.survival_time);
        if longer {
            self.longest = Some(round);
        }
        longer
    }

    /// Track a level reached mid-round
    pub fn note_level(&mut self, level: u32) {
        self.peak_level = self.peak_level.max(level);
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    pub fn longest(&self) -> Option<&RoundSummary> {
        self.longest.as_ref()
    }

    pub fn last(&self) -> Option<&RoundSummary> {
        self.last.as_ref()
    }

    /// Highest level seen in any round, live or finished (0 before play)
    pub fn peak_level(&self) -> u32 {
        self.peak_level
    }

    pub fn total_survival(&self) -> f64 {
        self.total_survival
    }

    pub fn mean_survival(&self) -> Option<f64> {
        (self.rounds_played > 0).then(|| self.total_survival / self.rounds_played as f64)
    }

    pub fn deaths_by(&self, hazard: HazardKind) -> u32 {
        self.deaths[hazard_slot(hazard)]
    }
}

fn hazard_slot(hazard: HazardKind) -> usize {
    match hazard {
        HazardKind::Zap => 0,
        HazardKind::Laser => 1,
        HazardKind::Boulder => 2,
    }
}
