//! Microphone input using cpal
//!
//! Each requested stream lives on its own thread, since `cpal::Stream` is not
//! `Send`. The session talks to that thread through a capturing flag, a shared
//! fragment sender and a release channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleFormat;
use tokio::sync::oneshot;

use crate::application::ports::{AudioInput, CaptureError, CaptureSession, FragmentSender};
use crate::domain::audio::{AudioFormat, AudioFragment};

/// One input device as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDeviceInfo {
    pub name: String,
    pub is_default: bool,
    /// `(sample_rate, channels)` of the default config, when it can be queried
    pub config: Option<(u32, u16)>,
}

/// Audio input backed by the default cpal host
pub struct CpalInput {
    /// Device name to open; `None` uses the host default
    device_name: Option<String>,
}

impl CpalInput {
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }

    /// List the host's input devices
    pub fn list_devices() -> Result<Vec<InputDeviceInfo>, CaptureError> {
        let host = cpal::default_host();
        let default_name = host.default_input_device().and_then(|d| d.name().ok());
        let devices = host
            .input_devices()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to enumerate devices: {}", e)))?;

        Ok(devices
            .filter_map(|device| {
                let name = device.name().ok()?;
                let config = device
                    .default_input_config()
                    .ok()
                    .map(|c| (c.sample_rate().0, c.channels()));
                Some(InputDeviceInfo {
                    is_default: default_name.as_deref() == Some(name.as_str()),
                    name,
                    config,
                })
            })
            .collect())
    }

    fn open_device(device_name: Option<&str>) -> Result<cpal::Device, CaptureError> {
        let host = cpal::default_host();
        let Some(wanted) = device_name else {
            return host.default_input_device().ok_or(CaptureError::NoAudioDevice);
        };

        host.input_devices()
            .map_err(|e| CaptureError::StartFailed(format!("Failed to enumerate devices: {}", e)))?
            .find(|device| device.name().map(|n| n == wanted).unwrap_or(false))
            .ok_or_else(|| CaptureError::DeviceNotFound(wanted.to_string()))
    }

    /// Mix interleaved frames down to one channel.
    ///
    /// A short trailing frame is averaged over the samples it has.
    fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
        if channels <= 1 {
            return samples.to_vec();
        }

        samples
            .chunks(channels as usize)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / frame.len() as i32) as i16
            })
            .collect()
    }

    fn f32_to_i16(sample: f32) -> i16 {
        (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
    }

    /// Build and play the stream, report readiness, then hold the stream
    /// until the session releases it.
    fn run_stream(
        device_name: Option<String>,
        shared: Shared,
        ready: oneshot::Sender<Result<AudioFormat, CaptureError>>,
        released: std_mpsc::Receiver<()>,
    ) {
        let stream = match Self::build_stream(device_name.as_deref(), &shared) {
            Ok((stream, format)) => {
                if ready.send(Ok(format)).is_err() {
                    return;
                }
                stream
            }
            Err(e) => {
                let _ = ready.send(Err(e));
                return;
            }
        };

        // Blocks until the session sends or is dropped
        let _ = released.recv();
        drop(stream);
        tracing::debug!("input stream released");
    }

    fn build_stream(
        device_name: Option<&str>,
        shared: &Shared,
    ) -> Result<(cpal::Stream, AudioFormat), CaptureError> {
        let device = Self::open_device(device_name)?;
        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::Denied(e.to_string()))?;

        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let channels = config.channels;
        let format = AudioFormat::mono(config.sample_rate.0);

        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate = format.sample_rate,
            channels,
            "input stream opened"
        );

        let on_error = |err: cpal::StreamError| tracing::error!(error = %err, "input stream error");

        let stream = match sample_format {
            SampleFormat::I16 => {
                let shared = shared.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        shared.forward(Self::downmix(data, channels));
                    },
                    on_error,
                    None,
                )
            }
            SampleFormat::F32 => {
                let shared = shared.clone();
                device.build_input_stream(
                    &config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let pcm: Vec<i16> = data.iter().map(|&s| Self::f32_to_i16(s)).collect();
                        shared.forward(Self::downmix(&pcm, channels));
                    },
                    on_error,
                    None,
                )
            }
            other => {
                return Err(CaptureError::StartFailed(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        }
        .map_err(|e| CaptureError::Denied(e.to_string()))?;

        stream
            .play()
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        Ok((stream, format))
    }
}

impl Default for CpalInput {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl AudioInput for CpalInput {
    async fn request_stream(&self) -> Result<Box<dyn CaptureSession>, CaptureError> {
        let shared = Shared::default();
        let (ready_tx, ready_rx) = oneshot::channel();
        let (release_tx, release_rx) = std_mpsc::channel();

        let device_name = self.device_name.clone();
        let thread_shared = shared.clone();
        std::thread::Builder::new()
            .name("vox-capture".into())
            .spawn(move || CpalInput::run_stream(device_name, thread_shared, ready_tx, release_rx))
            .map_err(|e| CaptureError::StartFailed(e.to_string()))?;

        let format = ready_rx
            .await
            .map_err(|_| CaptureError::StartFailed("capture thread exited".into()))??;

        Ok(Box::new(CpalSession {
            format,
            shared,
            release: Some(release_tx),
        }))
    }
}

/// State shared between a session and its stream callback
#[derive(Clone, Default)]
struct Shared {
    capturing: Arc<AtomicBool>,
    sender: Arc<StdMutex<Option<FragmentSender>>>,
}

impl Shared {
    fn forward(&self, samples: Vec<i16>) {
        if !self.capturing.load(Ordering::SeqCst) || samples.is_empty() {
            return;
        }
        if let Ok(guard) = self.sender.lock() {
            if let Some(tx) = guard.as_ref() {
                let _ = tx.send(AudioFragment::new(samples));
            }
        }
    }
}

/// A capture bound to one live cpal stream
pub struct CpalSession {
    format: AudioFormat,
    shared: Shared,
    release: Option<std_mpsc::Sender<()>>,
}

impl CaptureSession for CpalSession {
    fn format(&self) -> AudioFormat {
        self.format
    }

    fn start(&mut self, fragments: FragmentSender) -> Result<(), CaptureError> {
        if self.release.is_none() {
            return Err(CaptureError::Released);
        }
        if let Ok(mut sender) = self.shared.sender.lock() {
            *sender = Some(fragments);
        }
        self.shared.capturing.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn stop(&mut self) {
        self.shared.capturing.store(false, Ordering::SeqCst);
        if let Ok(mut sender) = self.shared.sender.lock() {
            sender.take();
        }
    }

    fn release(&mut self) {
        self.stop();
        if let Some(release) = self.release.take() {
            let _ = release.send(());
        }
    }

    fn is_live(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for CpalSession {
    fn drop(&mut self) {
        self.release();
    }
}
