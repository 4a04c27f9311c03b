//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with cpal, rodio, hound and the filesystem.

pub mod audio_cue;
pub mod capture;
pub mod config;
pub mod playback;
pub mod registry;

// Re-export adapters
pub use audio_cue::{create_audio_cue, ChimeAudioCue, SilentAudioCue};
pub use capture::{CpalInput, InputDeviceInfo};
pub use config::XdgConfigStore;
pub use playback::RodioPlayback;
pub use registry::InMemoryClipRegistry;
