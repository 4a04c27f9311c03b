//! Audio cue port for playing sound feedback
//!
//! Short chimes when a capture starts or stops, and when all slots are cleared.

use async_trait::async_trait;
use thiserror::Error;

/// Types of audio cues that can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCueType {
    /// Ascending chime before a capture starts
    RecordingStart,
    /// Descending chime after a capture is finalized
    RecordingStop,
    /// Double tap after every slot was cleared
    SlotsCleared,
}

/// Errors that can occur during audio cue playback
#[derive(Error, Debug)]
pub enum AudioCueError {
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port trait for audio cue playback
#[async_trait]
pub trait AudioCue: Send + Sync {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError>;
}
