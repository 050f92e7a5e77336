//! Process-local persistence adapters.
//!
//! The marketplace keeps its records in one [`MemoryStore`] shared across
//! the three repository ports. Repository implementations only translate
//! between the store's maps and domain aggregates; no business logic
//! resides here.

mod memory;

pub use memory::MemoryStore;
