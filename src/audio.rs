//! Sound effects
//!
//! The simulation never plays audio itself. The driver maps `GameEvent`s to
//! `SoundEffect`s and hands them to an `AudioSink` through the `AudioManager`,
//! which applies the player's volume settings. Playback is fire-and-forget.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Balloon popped (also used, quietly, for the pig at game over)
    Pop,
    /// Balloon escaped
    Miss,
    /// Extra misses granted
    Bonus,
}

impl SoundEffect {
    /// Asset path of the sample
    pub fn asset(&self) -> &'static str {
        match self {
            SoundEffect::Pop => "Audio/pop2.wav",
            SoundEffect::Miss => "Audio/miss.wav",
            SoundEffect::Bonus => "Audio/bonus.wav",
        }
    }
}

/// Backend that actually makes noise
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32, pitch: f32, looped: bool);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32, pitch: f32, _looped: bool) {
        log::debug!(
            "play {} (volume {:.2}, pitch {:.1})",
            effect.asset(),
            volume,
            pitch
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Manager with volumes taken from settings
    pub fn from_settings(sink: S, settings: &Settings) -> Self {
        let mut audio = Self::new(sink);
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a one-shot effect at `volume` (scaled by settings) and `pitch`
    pub fn play(&mut self, effect: SoundEffect, volume: f32, pitch: f32) {
        let vol = self.effective_volume() * volume;
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol, pitch, false);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Sink that remembers what it was asked to play
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSink {
        pub played: Vec<(SoundEffect, f32, f32)>,
    }

    impl AudioSink for RecordingSink {
        fn play(&mut self, effect: SoundEffect, volume: f32, pitch: f32, looped: bool) {
            assert!(!looped);
            self.played.push((effect, volume, pitch));
        }
    }

    #[test]
    fn test_volume_mixing() {
        let mut audio = AudioManager::new(RecordingSink::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(0.5);
        audio.play(SoundEffect::Pop, 1.0, 1.3);
        audio.play(SoundEffect::Pop, 0.1, 1.0);
        let played = &audio.sink().played;
        assert_eq!(played[0], (SoundEffect::Pop, 0.25, 1.3));
        assert!((played[1].1 - 0.025).abs() < 1e-6);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let mut audio = AudioManager::new(RecordingSink::default());
        audio.set_muted(true);
        audio.play(SoundEffect::Miss, 1.0, 1.0);
        assert!(audio.sink().played.is_empty());
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioManager::new(RecordingSink::default());
        audio.set_master_volume(3.0);
        audio.set_sfx_volume(-1.0);
        audio.play(SoundEffect::Bonus, 1.0, 1.0);
        assert!(audio.sink().played.is_empty());
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::Bonus, 1.0, 1.0);
        assert_eq!(audio.sink().played[0].1, 1.0);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        let mut audio = AudioManager::from_settings(RecordingSink::default(), &settings);
        audio.play(SoundEffect::Pop, 1.0, 1.0);
        assert!(audio.sink().played.is_empty());
    }
}
