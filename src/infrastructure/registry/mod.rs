//! Clip registry infrastructure module

mod memory;

pub use memory::InMemoryClipRegistry;
