//! Slot store: the single owner of all slot state

use crate::domain::error::SlotError;

use super::slot::{RecordingSlot, SlotIndex, SlotPatch, SLOT_COUNT};

/// Fixed array of recording slots, updated by index with shallow-merge patches.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotStore {
    slots: [RecordingSlot; SLOT_COUNT],
}

impl SlotStore {
    /// Create a store holding four empty slots
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slots(&self) -> &[RecordingSlot; SLOT_COUNT] {
        &self.slots
    }

    pub fn slot(&self, index: SlotIndex) -> &RecordingSlot {
        &self.slots[index.index()]
    }

    /// Replace slot `index` with a shallow merge of `patch`.
    ///
    /// Other slots are untouched. A patch that would leave the clip and status
    /// arrays with different lengths is rejected and nothing changes.
    pub fn update_slot(&mut self, index: SlotIndex, patch: SlotPatch) -> Result<(), SlotError> {
        let merged = self.slots[index.index()].clone().merged(patch);
        if merged.audio_urls.len() != merged.playing_status.len() {
            return Err(SlotError::LengthMismatch {
                slot: index.number(),
                clips: merged.audio_urls.len(),
                statuses: merged.playing_status.len(),
            });
        }
        self.slots[index.index()] = merged;
        Ok(())
    }

    /// Restore every slot to the empty initial value
    pub fn reset_all(&mut self) {
        self.slots = Default::default();
    }

    /// Total clips across all slots
    pub fn clip_count(&self) -> usize {
        self.slots.iter().map(RecordingSlot::clip_count).sum()
    }
}
