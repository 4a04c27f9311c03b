//! Recording slot entity and its index/status value objects

use std::fmt;
use std::str::FromStr;

use crate::domain::audio::ClipHandle;
use crate::domain::error::InvalidSlotError;

/// Number of recording slots. Fixed for the lifetime of a deck.
pub const SLOT_COUNT: usize = 4;

/// Validated slot position.
///
/// Stored 0-based; shown to users 1-based ("Slot 1" .. "Slot 4").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotIndex(usize);

impl SlotIndex {
    /// Create from a 0-based index
    pub fn new(index: usize) -> Result<Self, InvalidSlotError> {
        if index < SLOT_COUNT {
            Ok(Self(index))
        } else {
            Err(InvalidSlotError {
                input: index.to_string(),
            })
        }
    }

    /// Create from a 1-based slot number as typed by a user
    pub fn from_number(number: usize) -> Result<Self, InvalidSlotError> {
        match number {
            1..=SLOT_COUNT => Ok(Self(number - 1)),
            _ => Err(InvalidSlotError {
                input: number.to_string(),
            }),
        }
    }

    pub const fn index(&self) -> usize {
        self.0
    }

    pub const fn number(&self) -> usize {
        self.0 + 1
    }

    /// Every slot, in order
    pub fn all() -> impl Iterator<Item = SlotIndex> {
        (0..SLOT_COUNT).map(SlotIndex)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

impl FromStr for SlotIndex {
    type Err = InvalidSlotError;

    /// Parses the 1-based slot number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| Self::from_number(n).ok())
            .ok_or_else(|| InvalidSlotError {
                input: s.to_string(),
            })
    }
}

/// Playback state of one clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayingStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
}

impl PlayingStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        }
    }
}

impl fmt::Display for PlayingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State of one slot.
///
/// `audio_urls` and `playing_status` are parallel: entry `i` of each describes
/// clip `i`, in recording order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordingSlot {
    pub is_recording: bool,
    pub recording_complete: bool,
    pub audio_urls: Vec<ClipHandle>,
    pub is_looping: bool,
    pub playing_status: Vec<PlayingStatus>,
}

impl RecordingSlot {
    /// The empty initial slot
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn clip_count(&self) -> usize {
        self.audio_urls.len()
    }

    pub fn clip(&self, clip: usize) -> Option<&ClipHandle> {
        self.audio_urls.get(clip)
    }

    pub fn status(&self, clip: usize) -> Option<PlayingStatus> {
        self.playing_status.get(clip).copied()
    }

    /// Apply a shallow merge: fields set in `patch` replace ours
    pub fn merged(self, patch: SlotPatch) -> Self {
        Self {
            is_recording: patch.is_recording.unwrap_or(self.is_recording),
            recording_complete: patch.recording_complete.unwrap_or(self.recording_complete),
            audio_urls: patch.audio_urls.unwrap_or(self.audio_urls),
            is_looping: patch.is_looping.unwrap_or(self.is_looping),
            playing_status: patch.playing_status.unwrap_or(self.playing_status),
        }
    }

    /// Patch that finalizes a capture: appends `handle` with a `Stopped` status
    pub fn completed_capture(&self, handle: ClipHandle) -> SlotPatch {
        let mut audio_urls = self.audio_urls.clone();
        audio_urls.push(handle);
        let mut playing_status = self.playing_status.clone();
        playing_status.push(PlayingStatus::Stopped);

        SlotPatch {
            is_recording: Some(false),
            recording_complete: Some(true),
            audio_urls: Some(audio_urls),
            playing_status: Some(playing_status),
            ..Default::default()
        }
    }

    /// Patch that sets the status of one clip, or `None` if the clip does not exist
    pub fn with_status(&self, clip: usize, status: PlayingStatus) -> Option<SlotPatch> {
        if clip >= self.playing_status.len() {
            return None;
        }
        let mut playing_status = self.playing_status.clone();
        playing_status[clip] = status;
        Some(SlotPatch {
            playing_status: Some(playing_status),
            ..Default::default()
        })
    }
}

/// Partial slot update. `None` fields keep their current value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotPatch {
    pub is_recording: Option<bool>,
    pub recording_complete: Option<bool>,
    pub audio_urls: Option<Vec<ClipHandle>>,
    pub is_looping: Option<bool>,
    pub playing_status: Option<Vec<PlayingStatus>>,
}

impl SlotPatch {
    pub fn recording(is_recording: bool) -> Self {
        Self {
            is_recording: Some(is_recording),
            ..Default::default()
        }
    }

    pub fn looping(is_looping: bool) -> Self {
        Self {
            is_looping: Some(is_looping),
            ..Default::default()
        }
    }
}
