//! Domain error types

use thiserror::Error;

/// Error when parsing a duration string
#[derive(Debug, Clone, Error)]
#[error("Invalid duration format: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 30s, 1m, 2m30s)")]
pub struct DurationParseError {
    pub input: String,
}

/// Error when a slot number or index is out of range
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid slot: \"{input}\". Valid slots are 1, 2, 3, 4")]
pub struct InvalidSlotError {
    pub input: String,
}

/// Error when a slot update would break the slot invariants
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("Slot {slot} would hold {clips} clip(s) but {statuses} playing status entries")]
    LengthMismatch {
        slot: usize,
        clips: usize,
        statuses: usize,
    },
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
