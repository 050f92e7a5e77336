//! Port abstraction for windowed attempt counters.
//!
//! The login service throttles repeated failures per account through this
//! port. The store only needs approximate fixed-window semantics; precise
//! sliding windows are not required.

use std::time::Duration;

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by counter store adapters.
    pub enum CounterStoreError {
        /// Store is temporarily unreachable.
        Unavailable { message: String } => "counter store unavailable: {message}",
    }
}

/// Port for incrementing windowed counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter at `key`, returning the new tally.
    ///
    /// A counter whose window has elapsed resets to zero before the
    /// increment, so the first call of a fresh window returns 1.
    async fn increment(&self, key: &str, window: Duration) -> Result<u64, CounterStoreError>;
}
