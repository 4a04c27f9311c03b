//! Playback controller: at most one live player per slot

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::audio::ClipHandle;
use crate::domain::slot::{PlayingStatus, SlotIndex, SlotPatch, SlotStore, SLOT_COUNT};

use super::error::DeckError;
use super::ports::{PlaybackService, Player};

/// Notice that a player reached the natural end of its clip.
///
/// `token` identifies the player that sent it, so notices from a player that
/// has since been retargeted or stopped can be told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackEnded {
    pub slot: SlotIndex,
    pub clip: usize,
    pub token: u64,
}

struct LivePlayer {
    player: Box<dyn Player>,
    clip: usize,
    token: u64,
}

impl LivePlayer {
    fn retire(mut self, store: &mut SlotStore, slot: SlotIndex) {
        self.player.stop();
        let status = store.slot(slot).status(self.clip);
        if matches!(status, Some(PlayingStatus::Playing | PlayingStatus::Paused)) {
            if let Some(patch) = store.slot(slot).with_status(self.clip, PlayingStatus::Stopped) {
                let _ = store.update_slot(slot, patch);
            }
        }
    }
}

pub struct PlaybackController<P: PlaybackService> {
    service: P,
    players: [Option<LivePlayer>; SLOT_COUNT],
    next_token: u64,
    events: mpsc::UnboundedSender<PlaybackEnded>,
}

impl<P: PlaybackService> PlaybackController<P> {
    /// Create a controller; end notices are delivered on the returned receiver
    pub fn new(service: P) -> (Self, mpsc::UnboundedReceiver<PlaybackEnded>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            service,
            players: std::array::from_fn(|_| None),
            next_token: 0,
            events,
        };
        (controller, rx)
    }

    /// Play the clip if its player is paused, pause it if it is playing.
    ///
    /// Targeting a different clip than the one loaded stops the old player
    /// first. A failed start leaves the clip's status unchanged.
    pub fn toggle_play_pause(
        &mut self,
        store: &mut SlotStore,
        slot: SlotIndex,
        clip: usize,
    ) -> Result<PlayingStatus, DeckError> {
        let handle = store
            .slot(slot)
            .clip(clip)
            .cloned()
            .ok_or(DeckError::NoSuchClip { slot, clip })?;

        let mut live = match self.players[slot.index()].take() {
            Some(live) if live.player.handle() == &handle => live,
            previous => {
                if let Some(previous) = previous {
                    tracing::debug!(slot = slot.number(), clip = previous.clip, "retargeting player");
                    previous.retire(store, slot);
                }
                self.load(slot, clip, &handle)?
            }
        };
        live.clip = clip;
        live.player.set_looping(store.slot(slot).is_looping);

        let status = if live.player.is_paused() {
            if let Err(source) = live.player.play() {
                tracing::error!(slot = slot.number(), clip, error = %source, "playback failed to start");
                self.players[slot.index()] = Some(live);
                return Err(DeckError::PlaybackStart { slot, source });
            }
            PlayingStatus::Playing
        } else {
            live.player.pause();
            PlayingStatus::Paused
        };

        self.players[slot.index()] = Some(live);
        if let Some(patch) = store.slot(slot).with_status(clip, status) {
            store.update_slot(slot, patch)?;
        }
        tracing::debug!(slot = slot.number(), clip, status = %status, "playback toggled");
        Ok(status)
    }

    fn load(
        &mut self,
        slot: SlotIndex,
        clip: usize,
        handle: &ClipHandle,
    ) -> Result<LivePlayer, DeckError> {
        let token = self.next_token;
        self.next_token += 1;

        let events = self.events.clone();
        let on_end = Arc::new(move || {
            let _ = events.send(PlaybackEnded { slot, clip, token });
        });

        let player = self
            .service
            .load(handle, on_end)
            .map_err(|source| {
                tracing::error!(slot = slot.number(), clip, error = %source, "could not load clip");
                DeckError::PlaybackStart { slot, source }
            })?;
        Ok(LivePlayer { player, clip, token })
    }

    /// Apply an end notice. Returns false for notices from stale players.
    pub fn handle_ended(&mut self, store: &mut SlotStore, ended: PlaybackEnded) -> bool {
        let current = self.players[ended.slot.index()]
            .as_ref()
            .is_some_and(|live| live.token == ended.token && live.clip == ended.clip);
        if !current {
            tracing::debug!(slot = ended.slot.number(), token = ended.token, "ignoring stale end notice");
            return false;
        }

        match store.slot(ended.slot).with_status(ended.clip, PlayingStatus::Stopped) {
            Some(patch) => store.update_slot(ended.slot, patch).is_ok(),
            None => false,
        }
    }

    /// Flip the slot's loop flag and apply it to the live player, if any.
    /// Returns the new flag.
    pub fn toggle_loop(&mut self, store: &mut SlotStore, slot: SlotIndex) -> Result<bool, DeckError> {
        let looping = !store.slot(slot).is_looping;
        store.update_slot(slot, SlotPatch::looping(looping))?;
        if let Some(live) = self.players[slot.index()].as_mut() {
            live.player.set_looping(looping);
        }
        tracing::debug!(slot = slot.number(), looping, "loop toggled");
        Ok(looping)
    }

    /// Stop and drop every live player. Slot state is left to the caller.
    pub fn stop_all(&mut self) -> usize {
        let mut stopped = 0;
        for live in self.players.iter_mut() {
            if let Some(mut live) = live.take() {
                live.player.stop();
                stopped += 1;
            }
        }
        stopped
    }

    pub fn has_player(&self, slot: SlotIndex) -> bool {
        self.players[slot.index()].is_some()
    }
}
