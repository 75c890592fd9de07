//! Zap cells: single-cell strikes with a warning window
//!
//! A cell is scheduled with an absolute activation time. On the first update
//! at or past that time it fires once, hits the player only if the player is
//! standing on it at that instant, and is removed.

use serde::{Deserialize, Serialize};

use super::events::{GameEvent, RenderCommand};
use super::grid::GridPosition;
use super::rng::{RandomSource, pick_with_retries};
use crate::consts::ZAP_MAX_CHARGE_REDUCTION;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZapCell {
    pub position: GridPosition,
    pub activation_time: f64,
}

impl ZapCell {
    /// 0 → 1 as activation approaches, 0 outside the warning window
    pub fn warning_intensity(&self, now: f64, warning_duration: f64) -> f32 {
        let until = self.activation_time - now;
        if until <= 0.0 || until > warning_duration {
            return 0.0;
        }
        (1.0 - until / warning_duration) as f32
    }
}

/// Every scheduled zap cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZapField {
    cells: Vec<ZapCell>,
    charge_reduction: f64,
    base_delay: f64,
    warning_duration: f64,
    spawn_attempts: u32,
    grid_size: usize,
}

impl ZapField {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            cells: Vec::new(),
            charge_reduction: 0.0,
            base_delay: tuning.zap_base_delay,
            warning_duration: tuning.zap_warning_duration,
            spawn_attempts: tuning.zap_spawn_attempts,
            grid_size: tuning.grid_size,
        }
    }

    pub fn cells(&self) -> &[ZapCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn charge_reduction(&self) -> f64 {
        self.charge_reduction
    }

    /// Shorten the charge window; clamped to [0, 0.9]
    pub fn set_charge_reduction(&mut self, reduction: f64) {
        self.charge_reduction = reduction.clamp(0.0, ZAP_MAX_CHARGE_REDUCTION);
        log::debug!("Zap charge reduction: {:.2}", self.charge_reduction);
    }

    /// Delay between spawn and activation at the current reduction
    pub fn activation_delay(&self) -> f64 {
        self.base_delay * (1.0 - self.charge_reduction)
    }

    pub fn is_scheduled(&self, position: GridPosition) -> bool {
        self.cells.iter().any(|c| c.position == position)
    }

    /// Schedule a cell away from `avoid` and existing cells, if the draws allow
    pub fn spawn<R: RandomSource + ?Sized>(
        &mut self,
        now: f64,
        avoid: GridPosition,
        rng: &mut R,
    ) -> ZapCell {
        let size = self.grid_size;
        let position = pick_with_retries(
            rng,
            self.spawn_attempts,
            |r| {
                let idx = r.index(size * size);
                GridPosition::new(idx % size, idx / size)
            },
            |&pos| pos != avoid && !self.is_scheduled(pos),
        );
        self.schedule(position, now + self.activation_delay())
    }

    /// Schedule a cell at an explicit activation time
    pub fn schedule(&mut self, position: GridPosition, activation_time: f64) -> ZapCell {
        let cell = ZapCell {
            position,
            activation_time,
        };
        log::debug!(
            "Zap cell at ({},{}) fires at {:.2}",
            position.col,
            position.row,
            activation_time
        );
        self.cells.push(cell);
        cell
    }

    /// Fire due cells. Returns true if any fired cell was under the player.
    pub fn update(&mut self, now: f64, player: GridPosition, events: &mut Vec<GameEvent>) -> bool {
        let mut hit = false;
        self.cells.retain(|cell| {
            if now < cell.activation_time {
                return true;
            }
            let struck = cell.position == player;
            log::trace!(
                "Zap cell ({},{}) fired, hit={}",
                cell.position.col,
                cell.position.row,
                struck
            );
            events.push(GameEvent::ZapActivated {
                position: cell.position,
                hit: struck,
            });
            hit |= struck;
            false
        });
        hit
    }

    pub fn render(&self, now: f64, out: &mut Vec<RenderCommand>) {
        for cell in &self.cells {
            out.push(RenderCommand::ZapWarning {
                position: cell.position,
                intensity: cell.warning_intensity(now, self.warning_duration),
            });
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::rng::ScriptedRng;

    fn field() -> ZapField {
        ZapField::new(&Tuning::default())
    }

    #[test]
    fn test_activation_hits_player_on_cell() {
        let mut zaps = field();
        let mut events = Vec::new();
        zaps.schedule(GridPosition::new(2, 2), 5.0);

        assert!(!zaps.update(4.99, GridPosition::new(2, 2), &mut events));
        assert_eq!(zaps.len(), 1);

        assert!(zaps.update(5.0, GridPosition::new(2, 2), &mut events));
        assert_eq!(zaps.len(), 0);
        assert_eq!(
            events,
            vec![GameEvent::ZapActivated {
                position: GridPosition::new(2, 2),
                hit: true
            }]
        );
    }

    #[test]
    fn test_activation_removes_cell_on_miss() {
        let mut zaps = field();
        let mut events = Vec::new();
        zaps.schedule(GridPosition::new(1, 3), 2.0);

        assert!(!zaps.update(2.5, GridPosition::new(1, 2), &mut events));
        assert!(zaps.is_empty());
        // Stepping onto the cell afterwards is safe
        assert!(!zaps.update(3.0, GridPosition::new(1, 3), &mut events));
    }

    #[test]
    fn test_cells_fire_independently() {
        let mut zaps = field();
        let mut events = Vec::new();
        zaps.schedule(GridPosition::new(0, 0), 1.0);
        zaps.schedule(GridPosition::new(4, 4), 3.0);

        assert!(!zaps.update(1.0, GridPosition::new(4, 4), &mut events));
        assert_eq!(zaps.cells()[0].position, GridPosition::new(4, 4));
        assert!(zaps.update(3.0, GridPosition::new(4, 4), &mut events));
        assert!(zaps.is_empty());
    }

    #[test]
    fn test_spawn_avoids_player_and_existing() {
        let mut zaps = field();
        // idx 12 = (2,2) = player, idx 6 = (1,1) already taken, idx 8 = (3,1)
        zaps.schedule(GridPosition::new(1, 1), 10.0);
        let mut rng = ScriptedRng::new([12, 6, 8]);
        let cell = zaps.spawn(0.0, GridPosition::new(2, 2), &mut rng);
        assert_eq!(cell.position, GridPosition::new(3, 1));
        assert_eq!(cell.activation_time, 2.0);
    }

    #[test]
    fn test_spawn_falls_back_after_retries() {
        let mut zaps = field();
        let mut rng = ScriptedRng::new([12; 5]);
        let cell = zaps.spawn(0.0, GridPosition::new(2, 2), &mut rng);
        assert_eq!(cell.position, GridPosition::new(2, 2));
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn test_charge_reduction_shortens_delay() {
        let mut zaps = field();
        zaps.set_charge_reduction(0.4);
        let cell = zaps.spawn(10.0, GridPosition::new(2, 2), &mut ScriptedRng::new([0]));
        assert!((cell.activation_time - 11.2).abs() < 1e-9);

        zaps.set_charge_reduction(5.0);
        assert!((zaps.activation_delay() - 0.2).abs() < 1e-9);
        zaps.set_charge_reduction(-1.0);
        assert_eq!(zaps.activation_delay(), 2.0);
    }

    #[test]
    fn test_warning_intensity_window() {
        let cell = ZapCell {
            position: GridPosition::new(0, 0),
            activation_time: 10.0,
        };
        assert_eq!(cell.warning_intensity(8.0, 1.5), 0.0);
        assert!((cell.warning_intensity(8.5, 1.5) - 0.0).abs() < 1e-6);
        assert!((cell.warning_intensity(9.25, 1.5) - 0.5).abs() < 1e-6);
        assert_eq!(cell.warning_intensity(10.0, 1.5), 0.0);
        assert_eq!(cell.warning_intensity(11.0, 1.5), 0.0);
    }

    #[test]
    fn test_clear() {
        let mut zaps = field();
        zaps.schedule(GridPosition::new(0, 0), 1.0);
        zaps.clear();
        assert!(zaps.is_empty());
        assert!(!zaps.update(5.0, GridPosition::new(0, 0), &mut Vec::new()));
    }
}
