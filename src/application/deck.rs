//! The deck: four slots with their recorder and playback controllers

use std::sync::Arc;
use std::time::Duration as StdDuration;

use tokio::sync::mpsc;

use crate::domain::audio::ClipHandle;
use crate::domain::recording::Duration;
use crate::domain::slot::{PlayingStatus, RecordingSlot, SlotIndex, SlotStore, SLOT_COUNT};

use super::error::DeckError;
use super::playback::{PlaybackController, PlaybackEnded};
use super::ports::{AudioCue, AudioCueType, AudioInput, ClipRegistry, PlaybackService};
use super::recorder::{RecorderController, RecordingTransition};

/// Owns the slot store and routes every user operation through the
/// controllers.
///
/// All methods take `&mut self`; callers serialize operations by owning the
/// deck on a single task.
pub struct Deck<I, R, P>
where
    I: AudioInput,
    R: ClipRegistry,
    P: PlaybackService,
{
    store: SlotStore,
    recorder: RecorderController<I, Arc<R>>,
    playback: PlaybackController<P>,
    registry: Arc<R>,
    cue: Box<dyn AudioCue>,
    disposed: bool,
}

impl<I, R, P> Deck<I, R, P>
where
    I: AudioInput,
    R: ClipRegistry,
    P: PlaybackService,
{
    /// Create a deck with four empty slots.
    ///
    /// The receiver yields end-of-clip notices; feed them back through
    /// [`Deck::handle_playback_ended`].
    pub fn new(
        input: I,
        registry: Arc<R>,
        playback: P,
        cue: Box<dyn AudioCue>,
    ) -> (Self, mpsc::UnboundedReceiver<PlaybackEnded>) {
        let (playback, ended) = PlaybackController::new(playback);
        let deck = Self {
            store: SlotStore::new(),
            recorder: RecorderController::new(input, Arc::clone(&registry)),
            playback,
            registry,
            cue,
            disposed: false,
        };
        (deck, ended)
    }

    pub fn slots(&self) -> &[RecordingSlot; SLOT_COUNT] {
        self.store.slots()
    }

    pub fn slot(&self, slot: SlotIndex) -> &RecordingSlot {
        self.store.slot(slot)
    }

    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    /// Start when the slot is idle, finalize when it is recording
    pub async fn toggle_recording(
        &mut self,
        slot: SlotIndex,
    ) -> Result<RecordingTransition, DeckError> {
        if self.store.slot(slot).is_recording {
            self.stop_recording(slot)
                .await
                .map(RecordingTransition::Finished)
        } else {
            self.start_recording(slot).await?;
            Ok(RecordingTransition::Started)
        }
    }

    /// Acquire the input, chime, then begin capturing so the cue stays
    /// out of the recording.
    pub async fn start_recording(&mut self, slot: SlotIndex) -> Result<(), DeckError> {
        let session = self.recorder.acquire(&self.store, slot).await?;
        self.cue(AudioCueType::RecordingStart).await;
        self.recorder.begin(&mut self.store, slot, session)
    }

    pub async fn stop_recording(&mut self, slot: SlotIndex) -> Result<ClipHandle, DeckError> {
        let handle = self.recorder.stop_recording(&mut self.store, slot)?;
        self.cue(AudioCueType::RecordingStop).await;
        Ok(handle)
    }

    pub fn toggle_play_pause(
        &mut self,
        slot: SlotIndex,
        clip: usize,
    ) -> Result<PlayingStatus, DeckError> {
        self.playback.toggle_play_pause(&mut self.store, slot, clip)
    }

    pub fn toggle_loop(&mut self, slot: SlotIndex) -> Result<bool, DeckError> {
        self.playback.toggle_loop(&mut self.store, slot)
    }

    /// Returns whether the notice changed any state
    pub fn handle_playback_ended(&mut self, ended: PlaybackEnded) -> bool {
        self.playback.handle_ended(&mut self.store, ended)
    }

    /// Stop all players and captures, release every clip handle and reset
    /// the four slots. Returns how many handles were released.
    pub async fn clear_all_recordings(&mut self) -> usize {
        let released = self.release_resources();
        self.store.reset_all();
        tracing::info!(released, "all slots cleared");
        self.cue(AudioCueType::SlotsCleared).await;
        released
    }

    /// Slots whose capture has run for at least `limit`
    pub fn overdue(&self, limit: Duration) -> Vec<SlotIndex> {
        self.recorder.overdue(limit)
    }

    pub fn elapsed(&self, slot: SlotIndex) -> Option<StdDuration> {
        self.recorder.elapsed(slot)
    }

    /// Number of clips currently held by the registry
    pub fn registered_clips(&self) -> usize {
        self.registry.len()
    }

    /// Tear down: stop players, release capture streams and clip handles.
    /// Slot state is kept. Safe to call more than once.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        let released = self.release_resources();
        tracing::debug!(released, "deck disposed");
    }

    fn release_resources(&mut self) -> usize {
        let players = self.playback.stop_all();
        let captures = self.recorder.release_all();
        tracing::debug!(players, captures, "released live resources");

        self.store
            .slots()
            .iter()
            .flat_map(|slot| slot.audio_urls.iter())
            .filter(|handle| self.registry.release(handle))
            .count()
    }

    async fn cue(&self, cue_type: AudioCueType) {
        if let Err(e) = self.cue.play(cue_type).await {
            tracing::debug!(error = %e, ?cue_type, "audio cue failed");
        }
    }
}

impl<I, R, P> Drop for Deck<I, R, P>
where
    I: AudioInput,
    R: ClipRegistry,
    P: PlaybackService,
{
    fn drop(&mut self) {
        self.dispose();
    }
}
