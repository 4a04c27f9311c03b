//! Slot entities and the slot store

#[allow(clippy::module_inception)]
mod slot;
mod store;

pub use slot::{PlayingStatus, RecordingSlot, SlotIndex, SlotPatch, SLOT_COUNT};
pub use store::SlotStore;
