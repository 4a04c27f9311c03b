//! Playback port interfaces

use std::sync::Arc;

use thiserror::Error;

use crate::domain::audio::ClipHandle;

/// Playback errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Audio output not available: {0}")]
    DeviceNotAvailable(String),

    #[error("Unknown clip handle: {0}")]
    UnknownHandle(ClipHandle),

    #[error("Unsupported audio resource: {0}")]
    Unsupported(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),
}

/// Invoked once each time a player reaches the natural end of its clip.
/// Never invoked while the player is looping.
pub type EndCallback = Arc<dyn Fn() + Send + Sync>;

/// Port for the playback service
pub trait PlaybackService: Send + Sync {
    /// Create a paused player for `handle`
    fn load(&self, handle: &ClipHandle, on_end: EndCallback) -> Result<Box<dyn Player>, PlaybackError>;
}

/// A single playable instance bound to one clip handle
pub trait Player: Send {
    fn handle(&self) -> &ClipHandle;

    /// Start or resume playback. After a natural end, restarts from the beginning.
    fn play(&mut self) -> Result<(), PlaybackError>;

    fn pause(&mut self);

    /// True before the first play, while paused, and after a natural end
    fn is_paused(&self) -> bool;

    /// Loop flag, applied to the running clip as well
    fn set_looping(&mut self, looping: bool);

    /// Stop playback and release the output resources
    fn stop(&mut self);
}
