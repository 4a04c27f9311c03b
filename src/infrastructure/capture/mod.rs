//! Capture infrastructure module
//!
//! Live microphone input via cpal, delivered as mono 16-bit fragments.

mod cpal_input;

pub use cpal_input::{CpalInput, CpalSession, InputDeviceInfo};
