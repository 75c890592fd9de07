//! Per-frame orchestration
//!
//! The host calls [`tick`] once per rendered frame with a monotonic wall
//! timestamp. Order within a frame: pause toggle, restart, movement, then
//! level tick, spawns, and hazard updates (Zap, Laser, Boulder, stopping at
//! the first hit).

use super::events::{FrameOutput, GameEvent, HazardKind, RenderCommand};
use super::grid::{Direction, GridPosition};
use super::player::{MoveOutcome, PlayerLife};
use super::state::{GamePhase, GameState};
use crate::audio::{self, AudioSink};
use crate::session::RoundSummary;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Decoded swipe
    pub direction: Option<Direction>,
    /// Pause toggle
    pub pause: bool,
    /// Abandon the round and start over
    pub restart: bool,
    /// Idle/demo mode - built-in dodger steers the player
    pub idle_mode: bool,
}

/// Advance the game by one frame at wall time `now`
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    now: f64,
    audio: &mut dyn AudioSink,
) -> FrameOutput {
    if input.pause {
        if state.is_paused() {
            state.resume(now);
        } else {
            state.pause(now);
        }
    }

    if input.restart {
        state.restart();
    }

    let direction = if input.idle_mode && input.direction.is_none() {
        idle_direction(state)
    } else {
        input.direction
    };
    if let Some(direction) = direction {
        state.on_input(direction);
    }

    state.on_frame(now, audio)
}

impl GameState {
    /// Apply a movement command. `None` when input is ignored (dying or paused).
    pub fn on_input(&mut self, direction: Direction) -> Option<MoveOutcome> {
        if self.is_paused() || !self.player.is_alive() {
            return None;
        }
        let outcome = self.player.try_move(direction, self.tuning.grid_size);
        match outcome {
            MoveOutcome::Moved(to) => {
                log::trace!("Moved {}", direction.as_str());
                self.pending.push(GameEvent::PlayerMoved { to, direction });
            }
            MoveOutcome::Blocked => {
                log::trace!("Can't move {}", direction.as_str());
                self.pending.push(GameEvent::MoveBlocked { direction });
            }
        }
        Some(outcome)
    }

    /// Freeze game time. Hazards keep their state and pick up where they
    /// left off on resume.
    pub fn pause(&mut self, now: f64) {
        if self.is_paused() {
            return;
        }
        let t = self.clock.game_time(now);
        self.clock.pause(now);
        self.level.pause(t);
        self.phase = GamePhase::Paused;
        log::info!("Paused at {:.2}s", t);
        self.pending.push(GameEvent::Paused);
    }

    pub fn resume(&mut self, now: f64) {
        if !self.is_paused() {
            return;
        }
        self.clock.resume(now);
        let t = self.clock.game_time(now);
        // A dying player's stopwatch stays stopped until the round resets
        if self.player.is_alive() && !self.clock.needs_epoch() {
            self.level.resume(t);
        }
        self.phase = GamePhase::Playing;
        log::info!("Resumed at {:.2}s", t);
        self.pending.push(GameEvent::Resumed);
    }

    /// Drop the current round; the next frame starts a fresh one
    pub fn restart(&mut self) {
        log::info!("Round restarted");
        self.reset_round();
    }

    /// Run one frame and route its audio cues to `audio`
    pub fn on_frame(&mut self, now: f64, audio: &mut dyn AudioSink) -> FrameOutput {
        let mut out = FrameOutput {
            events: std::mem::take(&mut self.pending),
            render: Vec::new(),
        };
        self.step(now, &mut out);
        audio::dispatch(&out.events, audio);
        out
    }

    fn step(&mut self, now: f64, out: &mut FrameOutput) {
        if self.is_paused() {
            self.render(self.clock.game_time(now), out);
            return;
        }

        if self.clock.needs_epoch() {
            self.clock.start(now);
            self.level.resume(0.0);
            log::info!(
                "Round {} started (seed {})",
                self.session.rounds_played() + 1,
                self.seed
            );
            out.events.push(GameEvent::RoundStarted);
            self.render(0.0, out);
            return;
        }

        let t = self.clock.game_time(now);

        if let PlayerLife::Dying { since } = self.player.life {
            if t - since >= self.tuning.death_grace {
                self.reset_round();
                self.render(0.0, out);
            } else {
                self.render(t, out);
            }
            return;
        }

        let level = self.level.tick(t);
        if level.leveled_up {
            self.apply_level(level.level);
            self.session.note_level(level.level);
            out.events.push(GameEvent::LevelUp { level: level.level });
        }

        self.spawn_due(t, level.level, &mut out.events);

        if let Some(hazard) = self.update_hazards(t, &mut out.events) {
            self.on_hit(t, hazard, &mut out.events);
        }

        self.render(t, out);
    }

    /// Spawn every family whose next spawn time has come
    fn spawn_due(&mut self, t: f64, level: u32, events: &mut Vec<GameEvent>) {
        if t >= self.schedule.zap {
            let cell = self.zaps.spawn(t, self.player.position, &mut self.rng);
            events.push(GameEvent::ZapSpawned {
                position: cell.position,
                activation_time: cell.activation_time,
            });
            self.schedule.zap = t + self.difficulty.zap_interval;
        }
        if t >= self.schedule.laser {
            let avoid = self.laser.row;
            self.laser.place(t, avoid, &mut self.rng, events);
            self.schedule.laser = t + self.difficulty.laser_interval;
        }
        if t >= self.schedule.boulder {
            self.boulder.start_roll(t, level, &mut self.rng, events);
            self.schedule.boulder = t + self.difficulty.boulder_interval;
        }
    }

    /// First family to report a hit, if any; later families are skipped
    fn update_hazards(&mut self, t: f64, events: &mut Vec<GameEvent>) -> Option<HazardKind> {
        let hitbox = self.player_hitbox();
        if self.zaps.update(t, self.player.position, events) {
            return Some(HazardKind::Zap);
        }
        if self.laser.update(t, &self.layout, &hitbox, events) {
            return Some(HazardKind::Laser);
        }
        if self.boulder.update(t, &self.layout, &hitbox, events) {
            return Some(HazardKind::Boulder);
        }
        None
    }

    fn on_hit(&mut self, t: f64, hazard: HazardKind, events: &mut Vec<GameEvent>) {
        self.player.kill(t);
        self.level.pause(t);
        let survival_time = self.level.survival_time(t);
        let level = self.level.level();
        let longest = self.session.record(RoundSummary {
            survival_time,
            level,
            hazard,
        });
        log::info!(
            "Hit by {:?} after {} at level {}{}",
            hazard,
            crate::format_survival_time(survival_time),
            level,
            if longest { " (session best)" } else { "" }
        );
        events.push(GameEvent::PlayerHit { hazard });
        events.push(GameEvent::RoundOver {
            survival_time,
            level,
        });
    }

    fn render(&self, t: f64, out: &mut FrameOutput) {
        out.render.push(RenderCommand::Player {
            position: self.player.position,
            dying: !self.player.is_alive(),
        });
        self.zaps.render(t, &mut out.render);
        for event in &out.events {
            if let GameEvent::ZapActivated { position, .. } = event {
                out.render.push(RenderCommand::ZapFlash {
                    position: *position,
                });
            }
        }
        self.laser.render(t, &mut out.render);
        self.boulder.render(&self.layout, t, &mut out.render);
    }

    /// Whether a hazard is currently aimed at `position`
    pub fn is_threatened(&self, position: GridPosition) -> bool {
        self.zaps.is_scheduled(position)
            || (self.laser.is_active() && self.laser.row == position.row)
            || (self.boulder.is_rolling() && self.boulder.column == position.col)
    }
}

/// Demo dodger: step off a threatened cell onto the first safe neighbour
pub fn idle_direction(state: &GameState) -> Option<Direction> {
    if state.is_paused() || !state.player.is_alive() {
        return None;
    }
    let here = state.player.position;
    if !state.is_threatened(here) {
        return None;
    }
    Direction::ALL.into_iter().find(|&direction| {
        here.step(direction, state.tuning.grid_size)
            .is_some_and(|next| !state.is_threatened(next))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{MusicTrack, NullAudio, RecordingAudio, SoundEffect};
    use crate::sim::rng::ScriptedRng;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const FRAME: f64 = 1.0 / 64.0;

    fn new_state(seed: u64) -> GameState {
        GameState::new(seed, Tuning::default(), Vec2::new(1080.0, 1920.0))
    }

    /// State with its epoch at wall time 0
    fn started(seed: u64) -> GameState {
        let mut state = new_state(seed);
        state.on_frame(0.0, &mut NullAudio);
        state
    }

    fn frame(state: &mut GameState, now: f64) -> FrameOutput {
        tick(state, &TickInput::default(), now, &mut NullAudio)
    }

    #[test]
    fn test_first_frame_starts_round() {
        let mut state = new_state(7);
        let mut sink = RecordingAudio::default();
        let out = state.on_frame(42.0, &mut sink);
        assert_eq!(out.events, vec![GameEvent::RoundStarted]);
        assert_eq!(sink.last_music(), Some(MusicTrack::Game));
        assert_eq!(state.game_time(43.5), 1.5);
        assert!(out.render.contains(&RenderCommand::Player {
            position: GridPosition::new(2, 2),
            dying: false
        }));
    }

    #[test]
    fn test_zap_hit_ends_round() {
        let mut state = started(1);
        state.zaps.schedule(GridPosition::new(2, 2), 1.0);

        let out = frame(&mut state, 0.5);
        assert_eq!(out.hit_by(), None);

        let mut sink = RecordingAudio::default();
        let out = tick(&mut state, &TickInput::default(), 1.0, &mut sink);
        assert_eq!(out.hit_by(), Some(HazardKind::Zap));
        assert!(out.contains(|e| matches!(e, GameEvent::RoundOver { level: 1, .. })));
        assert!(out.render.contains(&RenderCommand::ZapFlash {
            position: GridPosition::new(2, 2)
        }));
        assert!(sink.effects().any(|e| e == SoundEffect::PlayerDeath));
        assert!(!state.player.is_alive());
        assert_eq!(state.session.rounds_played(), 1);
        assert_eq!(
            state.session.longest().map(|r| (r.survival_time, r.hazard)),
            Some((1.0, HazardKind::Zap))
        );
    }

    #[test]
    fn test_laser_hit_in_lethal_window() {
        let mut state = started(1);
        state
            .laser
            .place(0.0, usize::MAX, &mut ScriptedRng::new([2]), &mut Vec::new());

        assert_eq!(frame(&mut state, 3.0).hit_by(), None);
        assert_eq!(frame(&mut state, 3.6).hit_by(), Some(HazardKind::Laser));
    }

    #[test]
    fn test_hits_short_circuit_in_order() {
        let mut state = started(1);
        state.zaps.schedule(GridPosition::new(2, 2), 1.0);
        // Lethal at t = 1.0 on the player's row
        state
            .laser
            .place(-2.6, usize::MAX, &mut ScriptedRng::new([2]), &mut Vec::new());

        let out = frame(&mut state, 1.0);
        assert_eq!(out.hit_by(), Some(HazardKind::Zap));
        let hits = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 1);
        // Laser was never updated this frame
        assert!(!out.contains(|e| matches!(e, GameEvent::LaserBlast { .. })));
    }

    #[test]
    fn test_death_grace_then_reset() {
        let mut state = started(1);
        state.zaps.schedule(GridPosition::new(2, 2), 1.0);
        state.zaps.schedule(GridPosition::new(0, 0), 9.0);
        state.player.position = GridPosition::new(2, 2);
        frame(&mut state, 1.0);

        // Survival time is frozen during the grace delay
        frame(&mut state, 1.25);
        assert!(!state.player.is_alive());
        assert_eq!(state.level.survival_time(1.25), 1.0);

        let out = frame(&mut state, 1.5);
        assert!(out.render.contains(&RenderCommand::Player {
            position: GridPosition::new(2, 2),
            dying: false
        }));
        assert!(state.player.is_alive());
        assert!(state.zaps.is_empty());
        assert_eq!(state.level.level(), 1);
        assert!(state.clock.needs_epoch());

        let out = frame(&mut state, 2.0);
        assert_eq!(out.events, vec![GameEvent::RoundStarted]);
        assert_eq!(state.game_time(2.5), 0.5);
    }

    /// Boulder in column 3 rolling up from below at level 5 timings:
    /// parked until 1.5, then row = -1 + 3 * (t - 1.5)
    fn roll_column_three(state: &mut GameState) {
        let mut rng = ScriptedRng::new([3]).with_coins([true]);
        state.boulder.start_roll(0.0, 5, &mut rng, &mut Vec::new());
    }

    #[test]
    fn test_boulder_hit_through_frame() {
        let mut state = started(1);
        state.player.position = GridPosition::new(3, 2);
        roll_column_three(&mut state);

        assert_eq!(frame(&mut state, 1.0).hit_by(), None);
        let out = frame(&mut state, 2.5);
        assert_eq!(out.hit_by(), Some(HazardKind::Boulder));
        assert!(out.contains(|e| matches!(e, GameEvent::RoundOver { .. })));
        assert_eq!(state.session.deaths_by(HazardKind::Boulder), 1);
    }

    #[test]
    fn test_laser_checked_before_boulder() {
        let mut state = started(1);
        state.player.position = GridPosition::new(3, 2);
        roll_column_three(&mut state);
        // Lethal at t = 2.5 on the player's row
        state
            .laser
            .place(-1.1, usize::MAX, &mut ScriptedRng::new([2]), &mut Vec::new());

        let out = frame(&mut state, 2.5);
        assert_eq!(out.hit_by(), Some(HazardKind::Laser));
        let hits = out
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::PlayerHit { .. }))
            .count();
        assert_eq!(hits, 1);
        assert_eq!(state.session.deaths_by(HazardKind::Boulder), 0);
    }

    #[test]
    fn test_spawn_cadence_follows_level() {
        let mut state = started(5);

        let out = frame(&mut state, 3.0);
        assert!(out.contains(|e| matches!(e, GameEvent::ZapSpawned { .. })));
        assert!(!out.contains(|e| matches!(e, GameEvent::LaserPlaced { .. })));
        assert_eq!(state.schedule.zap, 6.0);

        // Level 2 is reached before spawning, so the new intervals apply
        let out = frame(&mut state, 7.0);
        assert!(out.contains(|e| *e == GameEvent::LevelUp { level: 2 }));
        assert!(out.contains(|e| matches!(e, GameEvent::LaserPlaced { .. })));
        assert!(!out.contains(|e| matches!(e, GameEvent::BoulderRolling { .. })));
        assert_eq!(state.laser.start_time, 7.0);

        let out = frame(&mut state, 8.0);
        assert!(out.contains(|e| matches!(e, GameEvent::BoulderRolling { .. })));
        assert_eq!(state.boulder.start_time, 8.0);
        assert_eq!(
            state.schedule,
            crate::sim::SpawnSchedule {
                zap: 9.5,
                laser: 13.5,
                boulder: 15.5,
            }
        );
    }

    #[test]
    fn test_pause_freezes_rolling_boulder() {
        let mut state = started(1);
        state.player.position = GridPosition::new(3, 4);
        roll_column_three(&mut state);

        let before = frame(&mut state, 2.0);
        let row = state.boulder.row_at(state.game_time(2.0));
        state.pause(2.0);

        // Wall time passes the moment the boulder would reach row 4
        for now in [3.0, 3.2, 10.0] {
            let out = frame(&mut state, now);
            assert_eq!(out.hit_by(), None);
            assert_eq!(out.render, before.render);
        }

        state.resume(10.0);
        assert_eq!(state.boulder.row_at(state.game_time(10.0)), row);
        assert!(state.boulder.is_rolling());
        assert_eq!(frame(&mut state, 11.2).hit_by(), Some(HazardKind::Boulder));
    }

    #[test]
    fn test_move_feedback() {
        let mut state = started(1);
        assert_eq!(
            state.on_input(Direction::Up),
            Some(MoveOutcome::Moved(GridPosition::new(2, 3)))
        );
        state.on_input(Direction::Up);
        assert_eq!(state.on_input(Direction::Up), Some(MoveOutcome::Blocked));

        let out = frame(&mut state, 0.1);
        assert_eq!(
            out.events[0],
            GameEvent::PlayerMoved {
                to: GridPosition::new(2, 3),
                direction: Direction::Up
            }
        );
        assert_eq!(
            out.events[2],
            GameEvent::MoveBlocked {
                direction: Direction::Up
            }
        );
    }

    #[test]
    fn test_input_ignored_while_paused_or_dying() {
        let mut state = started(1);
        state.pause(0.5);
        assert_eq!(state.on_input(Direction::Left), None);
        state.resume(0.6);

        state.zaps.schedule(GridPosition::new(2, 2), 1.0);
        frame(&mut state, 1.5);
        assert_eq!(state.on_input(Direction::Left), None);
        assert_eq!(state.player.position, GridPosition::new(2, 2));
    }

    #[test]
    fn test_pause_toggle_and_music() {
        let mut state = started(1);
        let mut sink = RecordingAudio::default();
        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };

        let out = tick(&mut state, &toggle, 1.0, &mut sink);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(out.contains(|e| *e == GameEvent::Paused));
        assert_eq!(sink.last_music(), Some(MusicTrack::Pause));

        // Frames while paused do nothing
        frame(&mut state, 50.0);
        assert_eq!(state.game_time(50.0), 1.0);

        tick(&mut state, &toggle, 60.0, &mut sink);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(sink.last_music(), Some(MusicTrack::GameFromPause));
        assert_eq!(state.survival_time(60.5), 1.5);
    }

    #[test]
    fn test_pause_holds_zap_timer() {
        let mut state = started(1);
        state.zaps.schedule(GridPosition::new(2, 2), 2.0);
        frame(&mut state, 1.0);
        state.pause(1.0);
        frame(&mut state, 30.0);
        state.resume(30.0);
        // 0.5 s of game time since the pause: still short of activation
        assert_eq!(frame(&mut state, 30.5).hit_by(), None);
        assert_eq!(frame(&mut state, 31.0).hit_by(), Some(HazardKind::Zap));
    }

    #[test]
    fn test_restart_clears_hazards() {
        let mut state = started(1);
        for i in 1..=600 {
            frame(&mut state, i as f64 * FRAME);
        }
        state.zaps.schedule(GridPosition::new(4, 4), 20.0);
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        let out = tick(&mut state, &restart, 10.0, &mut NullAudio);
        assert_eq!(out.events, vec![GameEvent::RoundStarted]);
        assert!(state.zaps.is_empty());
        assert!(!state.laser.is_active());
        assert!(!state.boulder.is_rolling());
        assert_eq!(state.level.level(), 1);
        assert_eq!(state.game_time(10.0), 0.0);
    }

    #[test]
    fn test_level_up_tightens_zaps() {
        let mut state = started(3);
        let mut sink = RecordingAudio::default();
        let out = tick(&mut state, &TickInput::default(), 5.0, &mut sink);
        assert!(out.contains(|e| *e == GameEvent::LevelUp { level: 2 }));
        assert!(sink.effects().any(|e| e == SoundEffect::LevelUp));
        assert!((state.zaps.charge_reduction() - 0.1).abs() < 1e-9);
        assert_eq!(state.difficulty.zap_interval, 2.5);
        let spawned = out.events.iter().find_map(|e| match e {
            GameEvent::ZapSpawned {
                activation_time, ..
            } => Some(*activation_time),
            _ => None,
        });
        assert!(spawned.is_some_and(|at| (at - 6.8).abs() < 1e-9));
    }

    #[test]
    fn test_idle_steps_off_threatened_cell() {
        let mut state = started(1);
        assert_eq!(idle_direction(&state), None);

        state.zaps.schedule(GridPosition::new(2, 2), 5.0);
        // Up is (2,3), laser row 3 makes it unsafe; Down is (2,1)
        state
            .laser
            .place(0.0, usize::MAX, &mut ScriptedRng::new([3]), &mut Vec::new());
        assert_eq!(idle_direction(&state), Some(Direction::Down));

        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        tick(&mut state, &idle, 0.5, &mut NullAudio);
        assert_eq!(state.player.position, GridPosition::new(2, 1));
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(99_999);
        let mut b = new_state(99_999);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for i in 0..(64 * 40) {
            let now = i as f64 * FRAME;
            let out_a = tick(&mut a, &idle, now, &mut NullAudio);
            let out_b = tick(&mut b, &idle, now, &mut NullAudio);
            assert_eq!(out_a, out_b);
        }
        assert_eq!(a.session, b.session);
        assert_eq!(a.player.position, b.player.position);
    }

    #[test]
    fn test_pause_gap_is_invisible() {
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let toggle = TickInput {
            pause: true,
            ..idle.clone()
        };
        let gap = 100.0;
        let pause_frame = 64 * 6;
        let total = 64 * 30;

        let mut straight = new_state(4242);
        let mut last_straight = FrameOutput::default();
        for i in 0..total {
            last_straight = tick(&mut straight, &idle, i as f64 * FRAME, &mut NullAudio);
        }

        let mut paused = new_state(4242);
        let mut last_paused = FrameOutput::default();
        for i in 0..pause_frame {
            tick(&mut paused, &idle, i as f64 * FRAME, &mut NullAudio);
        }
        // Pause takes effect before the frame at `pause_frame` is simulated
        tick(&mut paused, &toggle, pause_frame as f64 * FRAME, &mut NullAudio);
        for j in 1..(64 * 10) {
            tick(
                &mut paused,
                &idle,
                pause_frame as f64 * FRAME + j as f64 * FRAME * 10.0,
                &mut NullAudio,
            );
        }
        for i in pause_frame..total {
            let input = if i == pause_frame { &toggle } else { &idle };
            last_paused = tick(&mut paused, input, gap + i as f64 * FRAME, &mut NullAudio);
        }

        assert_eq!(last_paused.render, last_straight.render);
        assert_eq!(paused.session, straight.session);
        assert_eq!(paused.level.level(), straight.level.level());
        assert_eq!(
            paused.survival_time(gap + total as f64 * FRAME),
            straight.survival_time(total as f64 * FRAME)
        );
        assert_eq!(paused.zaps.cells(), straight.zaps.cells());
        assert_eq!(paused.laser.start_time, straight.laser.start_time);
        assert_eq!(paused.boulder.start_time, straight.boulder.start_time);
        assert_eq!(paused.schedule, straight.schedule);
    }
}
