//! Clip registry port: turns finished recordings into playable handles

use std::sync::Arc;

use thiserror::Error;

use crate::domain::audio::{AudioClip, ClipHandle};

/// Registry errors
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("Failed to encode clip: {0}")]
    EncodeFailed(String),
}

/// Port for the resource handle service.
///
/// Every handle returned by `register` holds its encoded audio until `release`.
pub trait ClipRegistry: Send + Sync {
    /// Encode `clip` and return a handle the playback service can resolve
    fn register(&self, clip: AudioClip) -> Result<ClipHandle, RegistryError>;

    /// Free the resource behind `handle`. Returns false if it was not registered.
    fn release(&self, handle: &ClipHandle) -> bool;

    fn is_registered(&self, handle: &ClipHandle) -> bool;

    /// Number of live handles
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ClipRegistry + ?Sized> ClipRegistry for Arc<T> {
    fn register(&self, clip: AudioClip) -> Result<ClipHandle, RegistryError> {
        (**self).register(clip)
    }

    fn release(&self, handle: &ClipHandle) -> bool {
        (**self).release(handle)
    }

    fn is_registered(&self, handle: &ClipHandle) -> bool {
        (**self).is_registered(handle)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
