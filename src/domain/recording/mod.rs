//! Recording value objects

mod duration;

pub use duration::{Duration, DEFAULT_MAX_DURATION_SECS};
