//! Audio value objects shared by capture, registry and playback

mod clip;

pub use clip::{AudioClip, AudioFormat, AudioFragment, ClipHandle};
