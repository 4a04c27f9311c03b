//! Audio capture port interfaces

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::{AudioFormat, AudioFragment};

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Audio input device not found: {0}")]
    DeviceNotFound(String),

    #[error("Input stream request denied: {0}")]
    Denied(String),

    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Capture session was already released")]
    Released,
}

/// Where a running session delivers its fragments
pub type FragmentSender = mpsc::UnboundedSender<AudioFragment>;

/// Port for acquiring live input streams (the microphone)
#[async_trait]
pub trait AudioInput: Send + Sync {
    /// Request a live input stream and wrap it in an idle capture session.
    ///
    /// May suspend until the platform grants access, and may be denied.
    async fn request_stream(&self) -> Result<Box<dyn CaptureSession>, CaptureError>;
}

/// One capture bound to one acquired input stream.
///
/// The session emits fragments between `start` and `stop`. The underlying
/// stream stays acquired until `release` (or drop), which must free the device.
pub trait CaptureSession: Send {
    /// Layout of the fragments this session emits
    fn format(&self) -> AudioFormat;

    /// Begin emitting fragments into `fragments`
    fn start(&mut self, fragments: FragmentSender) -> Result<(), CaptureError>;

    /// Stop emitting fragments. Safe to call more than once.
    fn stop(&mut self);

    /// Release the input stream (stop every track). Safe to call more than once.
    fn release(&mut self);

    /// Whether the input stream is still held
    fn is_live(&self) -> bool;
}
