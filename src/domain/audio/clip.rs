//! Captured audio value objects

use std::fmt;

/// PCM layout of captured audio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFormat {
    pub const BITS_PER_SAMPLE: u16 = 16;

    /// Mono format at the given rate (captures are mixed down to mono)
    pub const fn mono(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            channels: 1,
        }
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::mono(48_000)
    }
}

/// One chunk of samples emitted by a capture session while it runs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AudioFragment {
    samples: Vec<i16>,
}

impl AudioFragment {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

impl From<Vec<i16>> for AudioFragment {
    fn from(samples: Vec<i16>) -> Self {
        Self::new(samples)
    }
}

/// A finished recording: every fragment of one capture, concatenated in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    format: AudioFormat,
    samples: Vec<i16>,
}

impl AudioClip {
    pub fn new(format: AudioFormat, samples: Vec<i16>) -> Self {
        Self { format, samples }
    }

    /// Concatenate fragments in emission order into a single clip
    pub fn from_fragments(format: AudioFormat, fragments: &[AudioFragment]) -> Self {
        let total = fragments.iter().map(AudioFragment::len).sum();
        let mut samples = Vec::with_capacity(total);
        for fragment in fragments {
            samples.extend_from_slice(fragment.samples());
        }
        Self { format, samples }
    }

    pub fn format(&self) -> AudioFormat {
        self.format
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Playback length in milliseconds
    pub fn duration_ms(&self) -> u64 {
        let frames_per_sec =
            u64::from(self.format.sample_rate) * u64::from(self.format.channels.max(1));
        if frames_per_sec == 0 {
            return 0;
        }
        self.samples.len() as u64 * 1000 / frames_per_sec
    }
}

/// Opaque reference to a registered clip, usable by the playback service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClipHandle(String);

impl ClipHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClipHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
