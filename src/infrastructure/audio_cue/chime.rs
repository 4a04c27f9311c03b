//! Rodio chimes for recording and clear feedback

use std::time::Duration;

use async_trait::async_trait;
use rodio::source::{SineWave, Source, Zero};
use rodio::{OutputStream, Sink};

use crate::application::ports::{AudioCue, AudioCueError, AudioCueType};

const AMPLITUDE: f32 = 0.3;

/// One note of a chime; a zero frequency is a rest
#[derive(Debug, Clone, Copy, PartialEq)]
struct Note {
    freq: f32,
    millis: u64,
}

const fn note(freq: f32, millis: u64) -> Note {
    Note { freq, millis }
}

/// Notes played for each cue
fn notes(cue_type: AudioCueType) -> &'static [Note] {
    match cue_type {
        // C5 up to E5
        AudioCueType::RecordingStart => &const { [note(523.0, 80), note(659.0, 120)] },
        // E5 down to C5
        AudioCueType::RecordingStop => &const { [note(659.0, 80), note(523.0, 120)] },
        // G4 tapped twice, then low C4
        AudioCueType::SlotsCleared => &const {
            [
                note(392.0, 60),
                note(0.0, 40),
                note(392.0, 60),
                note(262.0, 140),
            ]
        },
    }
}

/// Audio cue that synthesizes short sine chimes
#[derive(Default)]
pub struct ChimeAudioCue;

impl ChimeAudioCue {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AudioCue for ChimeAudioCue {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        tokio::task::spawn_blocking(move || play_blocking(cue_type))
            .await
            .map_err(|e| AudioCueError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

fn play_blocking(cue_type: AudioCueType) -> Result<(), AudioCueError> {
    let (_stream, stream_handle) = OutputStream::try_default()
        .map_err(|e| AudioCueError::DeviceNotAvailable(e.to_string()))?;
    let sink =
        Sink::try_new(&stream_handle).map_err(|e| AudioCueError::PlaybackFailed(e.to_string()))?;

    for n in notes(cue_type) {
        let length = Duration::from_millis(n.millis);
        if n.freq == 0.0 {
            sink.append(Zero::<f32>::new(1, 44_100).take_duration(length));
        } else {
            // fade over a fifth of the note, at most 30ms
            let fade = Duration::from_millis((n.millis / 5).min(30));
            sink.append(
                SineWave::new(n.freq)
                    .take_duration(length)
                    .fade_in(fade)
                    .amplify(AMPLITUDE),
            );
        }
    }

    sink.sleep_until_end();
    Ok(())
}
