//! Domain layer - Core business logic
//!
//! Contains value objects, entities, and domain errors.
//! This layer has no dependencies on external systems.

pub mod audio;
pub mod config;
pub mod error;
pub mod recording;
pub mod slot;

// Re-export common types
pub use audio::{AudioClip, AudioFormat, AudioFragment, ClipHandle};
pub use config::AppConfig;
pub use error::*;
pub use recording::Duration;
pub use slot::{PlayingStatus, RecordingSlot, SlotIndex, SlotPatch, SlotStore, SLOT_COUNT};
