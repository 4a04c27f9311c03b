//! In-memory clip registry
//!
//! Clips are encoded to 16-bit PCM WAV with hound and kept until released.

use std::collections::HashMap;
use std::io::Cursor;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};

use crate::application::ports::{ClipRegistry, RegistryError};
use crate::domain::audio::{AudioClip, AudioFormat, ClipHandle};

/// Registry that keeps every encoded clip in memory
#[derive(Default)]
pub struct InMemoryClipRegistry {
    next_id: AtomicU64,
    clips: StdMutex<HashMap<ClipHandle, Arc<Vec<u8>>>>,
}

impl InMemoryClipRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded WAV bytes behind `handle`
    pub fn resolve(&self, handle: &ClipHandle) -> Option<Arc<Vec<u8>>> {
        self.entries().get(handle).cloned()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ClipHandle, Arc<Vec<u8>>>> {
        // entries are inserted and removed whole
        self.clips.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Encode samples as a WAV file
    pub fn encode_wav(clip: &AudioClip) -> Result<Vec<u8>, RegistryError> {
        let format: AudioFormat = clip.format();
        let spec = hound::WavSpec {
            channels: format.channels,
            sample_rate: format.sample_rate,
            bits_per_sample: AudioFormat::BITS_PER_SAMPLE,
            sample_format: hound::SampleFormat::Int,
        };

        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| RegistryError::EncodeFailed(e.to_string()))?;
            for &sample in clip.samples() {
                writer
                    .write_sample(sample)
                    .map_err(|e| RegistryError::EncodeFailed(e.to_string()))?;
            }
            writer
                .finalize()
                .map_err(|e| RegistryError::EncodeFailed(e.to_string()))?;
        }
        Ok(cursor.into_inner())
    }
}

impl ClipRegistry for InMemoryClipRegistry {
    fn register(&self, clip: AudioClip) -> Result<ClipHandle, RegistryError> {
        let bytes = Self::encode_wav(&clip)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let handle = ClipHandle::new(format!("clip:{}", id));

        tracing::debug!(handle = %handle, bytes = bytes.len(), "clip registered");
        self.entries().insert(handle.clone(), Arc::new(bytes));
        Ok(handle)
    }

    fn release(&self, handle: &ClipHandle) -> bool {
        self.entries().remove(handle).is_some()
    }

    fn is_registered(&self, handle: &ClipHandle) -> bool {
        self.entries().contains_key(handle)
    }

    fn len(&self) -> usize {
        self.entries().len()
    }
}
