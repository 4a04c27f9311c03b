//! Recorder controller: one capture session per slot

use std::time::{Duration as StdDuration, Instant};

use tokio::sync::mpsc;

use crate::domain::audio::{AudioClip, AudioFragment, ClipHandle};
use crate::domain::recording::Duration;
use crate::domain::slot::{SlotIndex, SlotPatch, SlotStore, SLOT_COUNT};

use super::error::DeckError;
use super::ports::{AudioInput, CaptureSession, ClipRegistry};

/// What a record toggle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingTransition {
    Started,
    Finished(ClipHandle),
}

/// A running capture and the buffer its fragments accumulate in
struct ActiveCapture {
    session: Box<dyn CaptureSession>,
    fragments: mpsc::UnboundedReceiver<AudioFragment>,
    started_at: Instant,
}

impl ActiveCapture {
    fn shutdown(mut self) {
        self.session.stop();
        self.session.release();
    }
}

/// Starts and finalizes captures, writing the results into the slot store.
///
/// Sessions live in a side-table keyed by slot index; the store only ever
/// sees the resulting flags and handles.
pub struct RecorderController<I, R>
where
    I: AudioInput,
    R: ClipRegistry,
{
    input: I,
    registry: R,
    sessions: [Option<ActiveCapture>; SLOT_COUNT],
}

impl<I, R> RecorderController<I, R>
where
    I: AudioInput,
    R: ClipRegistry,
{
    pub fn new(input: I, registry: R) -> Self {
        Self {
            input,
            registry,
            sessions: std::array::from_fn(|_| None),
        }
    }

    /// Acquire an input stream and begin capturing into the slot's buffer.
    ///
    /// The slot keeps its prior state until the stream is granted; a denied
    /// request leaves it not recording.
    pub async fn start_recording(
        &mut self,
        store: &mut SlotStore,
        slot: SlotIndex,
    ) -> Result<(), DeckError> {
        let session = self.acquire(store, slot).await?;
        self.begin(store, slot, session)
    }

    /// Request an idle capture session for the slot. Nothing is captured
    /// and the slot is not touched until [`RecorderController::begin`].
    pub async fn acquire(
        &mut self,
        store: &SlotStore,
        slot: SlotIndex,
    ) -> Result<Box<dyn CaptureSession>, DeckError> {
        if store.slot(slot).is_recording || self.sessions[slot.index()].is_some() {
            return Err(DeckError::AlreadyRecording(slot));
        }

        self.input.request_stream().await.map_err(|source| {
            tracing::warn!(slot = slot.number(), error = %source, "input stream request failed");
            DeckError::Acquisition { slot, source }
        })
    }

    /// Start an acquired session and mark the slot as recording
    pub fn begin(
        &mut self,
        store: &mut SlotStore,
        slot: SlotIndex,
        mut session: Box<dyn CaptureSession>,
    ) -> Result<(), DeckError> {
        if self.sessions[slot.index()].is_some() {
            session.release();
            return Err(DeckError::AlreadyRecording(slot));
        }

        let (tx, rx) = mpsc::unbounded_channel();
        if let Err(source) = session.start(tx) {
            session.release();
            tracing::warn!(slot = slot.number(), error = %source, "capture session failed to start");
            return Err(DeckError::Acquisition { slot, source });
        }

        let patch = SlotPatch {
            is_recording: Some(true),
            recording_complete: Some(false),
            ..Default::default()
        };
        if let Err(e) = store.update_slot(slot, patch) {
            session.stop();
            session.release();
            return Err(e.into());
        }

        self.sessions[slot.index()] = Some(ActiveCapture {
            session,
            fragments: rx,
            started_at: Instant::now(),
        });
        tracing::info!(slot = slot.number(), "recording started");
        Ok(())
    }

    /// Finalize the slot's capture: concatenate its fragments, register the
    /// clip and append the new handle with a `Stopped` status.
    ///
    /// The input stream is released once the capture is finalized.
    pub fn stop_recording(
        &mut self,
        store: &mut SlotStore,
        slot: SlotIndex,
    ) -> Result<ClipHandle, DeckError> {
        let Some(mut active) = self.sessions[slot.index()].take() else {
            tracing::warn!(slot = slot.number(), "stop requested with no capture session");
            return Err(DeckError::SessionMissing(slot));
        };

        active.session.stop();
        let mut fragments = Vec::new();
        while let Ok(fragment) = active.fragments.try_recv() {
            fragments.push(fragment);
        }
        let format = active.session.format();
        active.session.release();

        let clip = AudioClip::from_fragments(format, &fragments);
        tracing::debug!(
            slot = slot.number(),
            fragments = fragments.len(),
            duration_ms = clip.duration_ms(),
            "capture finalized"
        );

        match self.registry.register(clip) {
            Ok(handle) => {
                let patch = store.slot(slot).completed_capture(handle.clone());
                store.update_slot(slot, patch)?;
                tracing::info!(slot = slot.number(), handle = %handle, "recording stored");
                Ok(handle)
            }
            Err(source) => {
                store.update_slot(slot, SlotPatch::recording(false))?;
                tracing::warn!(slot = slot.number(), error = %source, "recording could not be stored");
                Err(DeckError::Finalize { slot, source })
            }
        }
    }

    pub fn is_capturing(&self, slot: SlotIndex) -> bool {
        self.sessions[slot.index()].is_some()
    }

    /// How long the slot's capture has been running
    pub fn elapsed(&self, slot: SlotIndex) -> Option<StdDuration> {
        self.sessions[slot.index()]
            .as_ref()
            .map(|active| active.started_at.elapsed())
    }

    /// Slots whose capture has reached `limit`
    pub fn overdue(&self, limit: Duration) -> Vec<SlotIndex> {
        SlotIndex::all()
            .filter(|slot| {
                self.elapsed(*slot)
                    .is_some_and(|elapsed| limit.is_reached_by(elapsed))
            })
            .collect()
    }

    /// Stop every capture and release its input stream, discarding the audio.
    /// Returns how many sessions were released.
    pub fn release_all(&mut self) -> usize {
        let mut released = 0;
        for (index, slot) in self.sessions.iter_mut().enumerate() {
            if let Some(active) = slot.take() {
                active.shutdown();
                released += 1;
                tracing::debug!(slot = index + 1, "capture session released");
            }
        }
        released
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{FakeInput, FakeRegistry};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn slot(n: usize) -> SlotIndex {
        SlotIndex::from_number(n).unwrap()
    }

    fn controller() -> (
        RecorderController<Arc<FakeInput>, Arc<FakeRegistry>>,
        Arc<FakeInput>,
        Arc<FakeRegistry>,
    ) {
        let input = Arc::new(FakeInput::default());
        let registry = Arc::new(FakeRegistry::default());
        (
            RecorderController::new(Arc::clone(&input), Arc::clone(&registry)),
            input,
            registry,
        )
    }

    #[tokio::test]
    async fn start_then_stop_appends_one_clip_on_every_slot() {
        let (mut recorder, _, _) = controller();
        let mut store = SlotStore::new();

        for index in SlotIndex::all() {
            let before = store.slot(index).clip_count();
            recorder.start_recording(&mut store, index).await.unwrap();
            assert!(store.slot(index).is_recording);
            assert!(!store.slot(index).recording_complete);

            recorder.stop_recording(&mut store, index).unwrap();
            let s = store.slot(index);
            assert_eq!(s.clip_count(), before + 1);
            assert_eq!(s.playing_status.len(), s.audio_urls.len());
            assert!(!s.is_recording);
            assert!(s.recording_complete);
        }
    }

    #[tokio::test]
    async fn stopped_clip_concatenates_fragments() {
        let (mut recorder, _, registry) = controller();
        let mut store = SlotStore::new();

        recorder.start_recording(&mut store, slot(1)).await.unwrap();
        let handle = recorder.stop_recording(&mut store, slot(1)).unwrap();

        let clips = registry.clips.lock().unwrap();
        assert_eq!(clips[&handle].samples(), &[1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn acquired_session_is_idle_until_begin() {
        let (mut recorder, input, _) = controller();
        let mut store = SlotStore::new();

        let session = recorder.acquire(&store, slot(2)).await.unwrap();
        assert_eq!(input.live_sessions(), 1);
        assert_eq!(input.capturing_sessions(), 0);
        assert!(!store.slot(slot(2)).is_recording);

        recorder.begin(&mut store, slot(2), session).unwrap();
        assert_eq!(input.capturing_sessions(), 1);
        assert!(store.slot(slot(2)).is_recording);
        assert!(recorder.is_capturing(slot(2)));
    }

    #[tokio::test]
    async fn denied_stream_leaves_slot_idle() {
        let input = Arc::new(FakeInput::denying());
        let mut recorder = RecorderController::new(Arc::clone(&input), FakeRegistry::default());
        let mut store = SlotStore::new();

        let err = recorder.start_recording(&mut store, slot(1)).await.unwrap_err();
        assert!(matches!(err, DeckError::Acquisition { .. }));
        assert!(!store.slot(slot(1)).is_recording);
        assert!(!recorder.is_capturing(slot(1)));

        // retry succeeds once access is granted
        input.deny.store(false, Ordering::SeqCst);
        recorder.start_recording(&mut store, slot(1)).await.unwrap();
        assert!(store.slot(slot(1)).is_recording);
    }

    #[tokio::test]
    async fn start_while_recording_is_rejected() {
        let (mut recorder, input, _) = controller();
        let mut store = SlotStore::new();

        recorder.start_recording(&mut store, slot(1)).await.unwrap();
        let err = recorder.start_recording(&mut store, slot(1)).await.unwrap_err();
        assert!(matches!(err, DeckError::AlreadyRecording(_)));
        assert_eq!(input.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stop_without_session_reports_missing() {
        let (mut recorder, _, _) = controller();
        let mut store = SlotStore::new();

        let err = recorder.stop_recording(&mut store, slot(3)).unwrap_err();
        assert!(matches!(err, DeckError::SessionMissing(_)));
        assert_eq!(*store.slot(slot(3)), Default::default());
    }

    #[tokio::test]
    async fn stop_releases_input_stream() {
        let (mut recorder, input, _) = controller();
        let mut store = SlotStore::new();

        recorder.start_recording(&mut store, slot(1)).await.unwrap();
        assert_eq!(input.live_sessions(), 1);
        recorder.stop_recording(&mut store, slot(1)).unwrap();
        assert_eq!(input.live_sessions(), 0);
    }

    #[tokio::test]
    async fn registry_failure_returns_slot_to_idle() {
        let (mut recorder, _, registry) = controller();
        let mut store = SlotStore::new();
        registry.fail.store(true, Ordering::SeqCst);

        recorder.start_recording(&mut store, slot(4)).await.unwrap();
        let err = recorder.stop_recording(&mut store, slot(4)).unwrap_err();

        assert!(matches!(err, DeckError::Finalize { .. }));
        assert!(!store.slot(slot(4)).is_recording);
        assert_eq!(store.slot(slot(4)).clip_count(), 0);
    }

    #[tokio::test]
    async fn release_all_frees_every_stream() {
        let (mut recorder, input, _) = controller();
        let mut store = SlotStore::new();

        recorder.start_recording(&mut store, slot(1)).await.unwrap();
        recorder.start_recording(&mut store, slot(3)).await.unwrap();
        assert_eq!(input.live_sessions(), 2);

        assert_eq!(recorder.release_all(), 2);
        assert_eq!(input.live_sessions(), 0);
        assert!(!recorder.is_capturing(slot(1)));
    }

    #[tokio::test]
    async fn overdue_reports_captures_past_limit() {
        let (mut recorder, _, _) = controller();
        let mut store = SlotStore::new();

        recorder.start_recording(&mut store, slot(2)).await.unwrap();

        assert_eq!(recorder.overdue(Duration::from_millis(0)), vec![slot(2)]);
        assert!(recorder.overdue(Duration::from_secs(3600)).is_empty());
    }
}
