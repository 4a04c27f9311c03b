//! Vox - four-slot audio recorder
//!
//! Each of four slots captures clips from the microphone, keeps them in
//! order and plays any one of them back, optionally on a loop.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Slots, clips, durations, configuration and errors
//! - **Application**: The deck, its recorder and playback controllers, and
//!   the port interfaces (traits) they drive
//! - **Infrastructure**: Adapter implementations (cpal capture, rodio
//!   playback, in-memory clip registry, XDG config)
//! - **CLI**: Argument parsing, the interactive command language and output

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
