//! Audio cue infrastructure adapters
//!
//! Chimes when a capture starts or stops and when the slots are cleared.

mod chime;

use async_trait::async_trait;

pub use chime::ChimeAudioCue;

use crate::application::ports::{AudioCue, AudioCueError, AudioCueType};

/// Cue used when audio feedback is turned off
#[derive(Default)]
pub struct SilentAudioCue;

#[async_trait]
impl AudioCue for SilentAudioCue {
    async fn play(&self, _cue_type: AudioCueType) -> Result<(), AudioCueError> {
        Ok(())
    }
}

/// Pick the cue adapter for the `audio_cues` setting
pub fn create_audio_cue(enabled: bool) -> Box<dyn AudioCue> {
    if enabled {
        Box::new(ChimeAudioCue::new())
    } else {
        Box::new(SilentAudioCue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn silent_cue_always_succeeds() {
        let cue = create_audio_cue(false);
        assert!(cue.play(AudioCueType::RecordingStart).await.is_ok());
        assert!(cue.play(AudioCueType::SlotsCleared).await.is_ok());
    }
}
