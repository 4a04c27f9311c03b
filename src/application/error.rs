//! Deck operation errors

use thiserror::Error;

use crate::domain::error::SlotError;
use crate::domain::slot::SlotIndex;

use super::ports::{CaptureError, PlaybackError, RegistryError};

/// Errors from deck operations.
///
/// Every variant is recoverable: the failing operation leaves slot state as it was.
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Slot {slot}: could not acquire audio input: {source}")]
    Acquisition {
        slot: SlotIndex,
        source: CaptureError,
    },

    #[error("Slot {0} is already recording")]
    AlreadyRecording(SlotIndex),

    #[error("Slot {0} has no active capture session")]
    SessionMissing(SlotIndex),

    #[error("Slot {slot}: could not finalize recording: {source}")]
    Finalize {
        slot: SlotIndex,
        source: RegistryError,
    },

    #[error("Slot {slot} has no file {}", .clip + 1)]
    NoSuchClip { slot: SlotIndex, clip: usize },

    #[error("Slot {slot}: playback failed to start: {source}")]
    PlaybackStart {
        slot: SlotIndex,
        source: PlaybackError,
    },

    #[error(transparent)]
    Slot(#[from] SlotError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_such_clip_shows_user_numbers() {
        let err = DeckError::NoSuchClip {
            slot: SlotIndex::new(0).unwrap(),
            clip: 2,
        };
        assert_eq!(err.to_string(), "Slot 1 has no file 3");
    }

    #[test]
    fn acquisition_includes_cause() {
        let err = DeckError::Acquisition {
            slot: SlotIndex::new(3).unwrap(),
            source: CaptureError::Denied("permission".into()),
        };
        let msg = err.to_string();
        assert!(msg.contains("Slot 4"));
        assert!(msg.contains("permission"));
    }
}
