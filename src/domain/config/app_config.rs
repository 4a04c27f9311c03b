//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::recording::Duration;

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Name of the capture device; the host default when unset
    pub input_device: Option<String>,
    /// Longest single capture before it is stopped automatically
    pub max_duration: Option<String>,
    /// Chime when a capture starts or stops
    pub audio_cues: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            input_device: None,
            max_duration: Some(Duration::default_max_duration().to_string()),
            audio_cues: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            input_device: other.input_device.or(self.input_device),
            max_duration: other.max_duration.or(self.max_duration),
            audio_cues: other.audio_cues.or(self.audio_cues),
        }
    }

    /// Get max_duration as parsed Duration, or default if not set/invalid
    pub fn max_duration_or_default(&self) -> Duration {
        self.max_duration
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(Duration::default_max_duration)
    }

    /// Get audio cue setting, or true if not set
    pub fn audio_cues_or_default(&self) -> bool {
        self.audio_cues.unwrap_or(true)
    }

    /// Configured input device name, ignoring blank values
    pub fn input_device(&self) -> Option<&str> {
        self.input_device
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}
