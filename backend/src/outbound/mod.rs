//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! Adapters are thin translators between domain types and their stored
//! representations. They contain no business logic.
//!
//! - **persistence**: the process-local marketplace store backing the
//!   three repository ports.
//! - **throttle**: the windowed attempt counter backing login throttling.

pub mod persistence;
pub mod throttle;
