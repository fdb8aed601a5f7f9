//! Music and sound cues
//!
//! Audio is a capability behind `AudioSink`. `KiraAudio` plays the looping
//! music track and one-shot cues through Kira. With no output device the game
//! runs on `SilentAudio`; an asset that fails to decode is skipped on its own.

use std::path::Path;

use kira::sound::static_sound::{StaticSoundData, StaticSoundHandle};
use kira::{AudioManager, AudioManagerSettings, DefaultBackend, Tween};

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Player destroyed
    Death,
}

/// Something that can play the game's music and cues
pub trait AudioSink {
    /// Start the background loop
    fn play_music(&mut self);
    fn stop_music(&mut self);
    fn play(&mut self, cue: SoundCue);
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn play_music(&mut self) {
        (**self).play_music();
    }

    fn stop_music(&mut self) {
        (**self).stop_music();
    }

    fn play(&mut self, cue: SoundCue) {
        (**self).play(cue);
    }
}

/// Kira-backed audio
pub struct KiraAudio {
    manager: AudioManager<DefaultBackend>,
    music: Option<StaticSoundData>,
    death_cue: Option<StaticSoundData>,
    music_handle: Option<StaticSoundHandle>,
}

impl KiraAudio {
    /// Open the output device and decode the configured assets
    pub fn new(settings: &Settings) -> Result<Self> {
        let manager = AudioManager::<DefaultBackend>::new(AudioManagerSettings::default())
            .map_err(|e| Error::Audio(format!("no output device ({e})")))?;

        let music = decode(&settings.music_path).map(|data| data.loop_region(..));
        let death_cue = decode(&settings.death_cue_path);
        if music.is_some() && death_cue.is_some() {
            log::info!("Sounds loaded");
        }

        Ok(Self {
            manager,
            music,
            death_cue,
            music_handle: None,
        })
    }

    pub fn has_music(&self) -> bool {
        self.music.is_some()
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_handle.is_some()
    }
}

/// Decode a sound file; a missing or unreadable asset is logged and skipped
fn decode(path: &Path) -> Option<StaticSoundData> {
    match StaticSoundData::from_file(path) {
        Ok(data) => Some(data),
        Err(e) => {
            log::warn!("Failed to load sound {} ({}), playing silent", path.display(), e);
            None
        }
    }
}

impl AudioSink for KiraAudio {
    fn play_music(&mut self) {
        if self.music_handle.is_some() {
            return;
        }
        let Some(music) = &self.music else {
            return;
        };
        match self.manager.play(music.clone()) {
            Ok(handle) => self.music_handle = Some(handle),
            Err(e) => log::warn!("Failed to start music: {}", e),
        }
    }

    fn stop_music(&mut self) {
        if let Some(mut handle) = self.music_handle.take() {
            handle.stop(Tween::default());
        }
    }

    fn play(&mut self, cue: SoundCue) {
        let data = match cue {
            SoundCue::Death => &self.death_cue,
        };
        if let Some(data) = data {
            if let Err(e) = self.manager.play(data.clone()) {
                log::warn!("Failed to play {:?}: {}", cue, e);
            }
        }
    }
}

/// Plays nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn play(&mut self, _cue: SoundCue) {}
}

/// Best available audio: Kira when a device opens, silence otherwise
pub fn open(settings: &Settings) -> Box<dyn AudioSink> {
    match KiraAudio::new(settings) {
        Ok(audio) => Box::new(audio),
        Err(e) => {
            log::warn!("{}, running silent", e);
            Box::new(SilentAudio)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn garbage_asset(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("neon_runner_{}_{}", std::process::id(), name));
        std::fs::write(&path, b"this is not a wav file").unwrap();
        path
    }

    #[test]
    fn test_undecodable_asset_is_skipped() {
        let path = garbage_asset("garbage.wav");
        let decoded = decode(&path);
        let _ = std::fs::remove_file(&path);
        assert!(decoded.is_none());
    }

    #[test]
    fn test_missing_asset_is_skipped() {
        assert!(decode(Path::new("definitely/not/here.wav")).is_none());
    }

    #[test]
    fn test_undecodable_music_stays_silent() {
        let path = garbage_asset("music loop.wav");
        let settings = Settings {
            music_path: path.clone(),
            death_cue_path: path.clone(),
            ..Settings::default()
        };

        // Only reachable where an output device exists
        if let Ok(mut audio) = KiraAudio::new(&settings) {
            assert!(!audio.has_music());
            audio.play_music();
            assert!(!audio.is_music_playing());
            audio.play(SoundCue::Death);
            audio.stop_music();
        }

        let mut audio = open(&settings);
        audio.play_music();
        audio.play(SoundCue::Death);
        audio.stop_music();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_boxed_sink_forwards() {
        #[derive(Default)]
        struct Counter(u32);
        impl AudioSink for Counter {
            fn play_music(&mut self) {
                self.0 += 1;
            }
            fn stop_music(&mut self) {
                self.0 += 10;
            }
            fn play(&mut self, _cue: SoundCue) {
                self.0 += 100;
            }
        }

        let mut boxed = Box::new(Counter::default());
        boxed.play_music();
        boxed.stop_music();
        boxed.play(SoundCue::Death);
        assert_eq!(boxed.0, 111);
    }
}
