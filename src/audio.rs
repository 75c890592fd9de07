//! Audio cues
//!
//! The simulation decides *when* a sound plays; the host decides *how*.
//! Gameplay events map to fire-and-forget cues that are pushed into an
//! [`AudioSink`] handed to the frame loop.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Laser emitters start charging
    LaserCharge,
    /// Laser beam appears
    LaserBlast,
    /// Boulder starts its roll
    BoulderRoll,
    /// Zap cell fires
    ZapStrike,
    /// Player was hit
    PlayerDeath,
    /// Difficulty increased
    LevelUp,
}

impl SoundEffect {
    /// Asset name the host resolves to a file
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEffect::LaserCharge => "lazerCharge",
            SoundEffect::LaserBlast => "lazerBlast",
            SoundEffect::BoulderRoll => "boulderRoll",
            SoundEffect::ZapStrike => "zap",
            SoundEffect::PlayerDeath => "playerDeath",
            SoundEffect::LevelUp => "levelUp",
        }
    }
}

/// Background music states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicTrack {
    Game,
    /// Game theme re-entered after a pause
    GameFromPause,
    Pause,
    None,
}

impl MusicTrack {
    pub fn file_name(&self) -> &'static str {
        match self {
            MusicTrack::Game => "GameMusic.wav",
            MusicTrack::GameFromPause => "GameMusicFromPause.mp3",
            MusicTrack::Pause => "PauseMusic.mp3",
            MusicTrack::None => "",
        }
    }
}

/// A single cue sent to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    Effect(SoundEffect),
    Music(MusicTrack),
}

/// Receives audio cues from the simulation
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    fn change_music(&mut self, track: MusicTrack);
}

/// Cue for a gameplay event, if it has one
pub fn cue_for(event: &GameEvent) -> Option<AudioCue> {
    let cue = match event {
        GameEvent::RoundStarted => AudioCue::Music(MusicTrack::Game),
        GameEvent::Paused => AudioCue::Music(MusicTrack::Pause),
        GameEvent::Resumed => AudioCue::Music(MusicTrack::GameFromPause),
        GameEvent::LaserPlaced { .. } => AudioCue::Effect(SoundEffect::LaserCharge),
        GameEvent::LaserBlast { .. } => AudioCue::Effect(SoundEffect::LaserBlast),
        GameEvent::BoulderRolling { .. } => AudioCue::Effect(SoundEffect::BoulderRoll),
        GameEvent::ZapActivated { .. } => AudioCue::Effect(SoundEffect::ZapStrike),
        GameEvent::PlayerHit { .. } => AudioCue::Effect(SoundEffect::PlayerDeath),
        GameEvent::LevelUp { .. } => AudioCue::Effect(SoundEffect::LevelUp),
        _ => return None,
    };
    Some(cue)
}

/// Forward the cues for `events`, in order
pub fn dispatch(events: &[GameEvent], sink: &mut dyn AudioSink) {
    for cue in events.iter().filter_map(cue_for) {
        match cue {
            AudioCue::Effect(effect) => sink.play(effect),
            AudioCue::Music(track) => sink.change_music(track),
        }
    }
}

/// Volume levels (kept in memory only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    pub master_volume: f32,
    pub sfx_volume: f32,
    pub music_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
        }
    }
}

impl AudioSettings {
    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    pub fn effective_sfx_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }
}

/// Drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
    fn change_music(&mut self, _track: MusicTrack) {}
}

/// Keeps every cue, for tests and replays
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    pub cues: Vec<AudioCue>,
}

impl RecordingAudio {
    pub fn effects(&self) -> impl Iterator<Item = SoundEffect> + '_ {
        self.cues.iter().filter_map(|c| match c {
            AudioCue::Effect(effect) => Some(*effect),
            AudioCue::Music(_) => None,
        })
    }

    pub fn last_music(&self) -> Option<MusicTrack> {
        self.cues.iter().rev().find_map(|c| match c {
            AudioCue::Music(track) => Some(*track),
            AudioCue::Effect(_) => None,
        })
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.cues.push(AudioCue::Effect(effect));
    }

    fn change_music(&mut self, track: MusicTrack) {
        self.cues.push(AudioCue::Music(track));
    }
}

/// Logs cues instead of playing them (headless runs)
#[derive(Debug, Clone)]
pub struct LogAudio {
    settings: AudioSettings,
    current_music: MusicTrack,
}

impl LogAudio {
    pub fn new(settings: AudioSettings) -> Self {
        Self {
            settings,
            current_music: MusicTrack::None,
        }
    }

    pub fn current_music(&self) -> MusicTrack {
        self.current_music
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }
        log::debug!("sfx {} (vol {:.2})", effect.asset_name(), vol);
    }

    fn change_music(&mut self, track: MusicTrack) {
        if track == self.current_music {
            return;
        }
        self.current_music = track;
        log::debug!(
            "music -> {:?} '{}' (vol {:.2})",
            track,
            track.file_name(),
            self.settings.effective_music_volume()
        );
    }
}
