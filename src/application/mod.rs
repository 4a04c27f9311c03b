//! Application layer - Use cases and port interfaces
//!
//! Contains the deck and its controllers, plus the trait definitions
//! for external system interactions.

pub mod deck;
pub mod error;
pub mod playback;
pub mod ports;
pub mod recorder;

#[cfg(test)]
mod testing;

// Re-export use cases
pub use deck::Deck;
pub use error::DeckError;
pub use playback::{PlaybackController, PlaybackEnded};
pub use recorder::{RecorderController, RecordingTransition};
