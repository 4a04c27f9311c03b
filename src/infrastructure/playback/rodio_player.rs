//! Clip playback using rodio
//!
//! `rodio::OutputStream` is not `Send`, so it is opened on a dedicated thread
//! the first time a clip is loaded and kept there until the service drops.
//! Players only hold the thread-safe `OutputStreamHandle`.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use rodio::source::{EmptyCallback, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::application::ports::{EndCallback, PlaybackError, PlaybackService, Player};
use crate::domain::audio::ClipHandle;
use crate::infrastructure::registry::InMemoryClipRegistry;

/// Encoded clip bytes shared with the decoder
#[derive(Clone)]
struct ClipBytes(Arc<Vec<u8>>);

impl AsRef<[u8]> for ClipBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_slice()
    }
}

/// Output stream kept alive on its own thread
struct Output {
    handle: OutputStreamHandle,
    _shutdown: std_mpsc::Sender<()>,
}

impl Output {
    fn open() -> Result<Self, PlaybackError> {
        let (ready_tx, ready_rx) = std_mpsc::channel();
        let (shutdown_tx, shutdown_rx) = std_mpsc::channel::<()>();

        std::thread::Builder::new()
            .name("vox-output".into())
            .spawn(move || match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    if ready_tx.send(Ok(handle)).is_ok() {
                        // Returns once the service drops its sender
                        let _ = shutdown_rx.recv();
                    }
                    drop(stream);
                }
                Err(e) => {
                    let _ = ready_tx.send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
                }
            })
            .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

        let handle = ready_rx
            .recv()
            .map_err(|_| PlaybackError::DeviceNotAvailable("output thread exited".into()))??;
        tracing::debug!("audio output opened");

        Ok(Self {
            handle,
            _shutdown: shutdown_tx,
        })
    }
}

/// Playback service resolving handles from the in-memory registry
pub struct RodioPlayback {
    registry: Arc<InMemoryClipRegistry>,
    output: StdMutex<Option<Output>>,
}

impl RodioPlayback {
    pub fn new(registry: Arc<InMemoryClipRegistry>) -> Self {
        Self {
            registry,
            output: StdMutex::new(None),
        }
    }

    fn output_handle(&self) -> Result<OutputStreamHandle, PlaybackError> {
        let mut output = self
            .output
            .lock()
            .map_err(|_| PlaybackError::DeviceNotAvailable("output lock poisoned".into()))?;
        if let Some(output) = output.as_ref() {
            return Ok(output.handle.clone());
        }
        let opened = Output::open()?;
        let handle = opened.handle.clone();
        *output = Some(opened);
        Ok(handle)
    }
}

impl PlaybackService for RodioPlayback {
    fn load(
        &self,
        handle: &ClipHandle,
        on_end: EndCallback,
    ) -> Result<Box<dyn Player>, PlaybackError> {
        let bytes = self
            .registry
            .resolve(handle)
            .ok_or_else(|| PlaybackError::UnknownHandle(handle.clone()))?;
        let output = self.output_handle()?;

        Ok(Box::new(RodioPlayer {
            handle: handle.clone(),
            bytes: ClipBytes(bytes),
            output,
            sink: None,
            looping: Arc::new(AtomicBool::new(false)),
            on_end,
        }))
    }
}

/// One clip bound to the shared output.
///
/// A fresh sink is built on the first play and after every natural end, so a
/// finished clip restarts from the beginning.
pub struct RodioPlayer {
    handle: ClipHandle,
    bytes: ClipBytes,
    output: OutputStreamHandle,
    sink: Option<Sink>,
    looping: Arc<AtomicBool>,
    on_end: EndCallback,
}

impl RodioPlayer {
    fn is_finished(&self) -> bool {
        self.sink.as_ref().map_or(true, Sink::empty)
    }

    fn start_from_beginning(&mut self) -> Result<(), PlaybackError> {
        let decoder = Decoder::new(Cursor::new(self.bytes.clone()))
            .map_err(|e| PlaybackError::Unsupported(e.to_string()))?;
        let sink =
            Sink::try_new(&self.output).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;

        sink.append(Repeat::new(decoder.buffered(), Arc::clone(&self.looping)));
        let on_end = Arc::clone(&self.on_end);
        sink.append(EmptyCallback::<i16>::new(Box::new(move || on_end())));

        if let Some(previous) = self.sink.replace(sink) {
            previous.stop();
        }
        Ok(())
    }
}

impl Player for RodioPlayer {
    fn handle(&self) -> &ClipHandle {
        &self.handle
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        match self.sink.as_ref() {
            Some(sink) if !sink.empty() => {
                sink.play();
                Ok(())
            }
            _ => self.start_from_beginning(),
        }
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn is_paused(&self) -> bool {
        self.is_finished() || self.sink.as_ref().is_some_and(Sink::is_paused)
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping.store(looping, Ordering::SeqCst);
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }
}

impl Drop for RodioPlayer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Source that starts over from a copy of `template` while `looping` is set
struct Repeat<S> {
    template: S,
    current: S,
    looping: Arc<AtomicBool>,
}

impl<S: Source + Clone> Repeat<S>
where
    S::Item: rodio::Sample,
{
    fn new(source: S, looping: Arc<AtomicBool>) -> Self {
        Self {
            template: source.clone(),
            current: source,
            looping,
        }
    }
}

impl<S: Source + Clone> Iterator for Repeat<S>
where
    S::Item: rodio::Sample,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(sample) = self.current.next() {
            return Some(sample);
        }
        if !self.looping.load(Ordering::SeqCst) {
            return None;
        }
        self.current = self.template.clone();
        self.current.next()
    }
}

impl<S: Source + Clone> Source for Repeat<S>
where
    S::Item: rodio::Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.current.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.current.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.current.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        None
    }
}
