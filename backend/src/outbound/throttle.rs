//! In-process counter store backing the login throttle.
//!
//! Counters follow fixed-window semantics: the first increment of a key
//! opens a window, later increments within the window accumulate, and an
//! increment after the window has elapsed resets the tally to 1.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::ports::{CounterStore, CounterStoreError};

/// [`CounterStore`] keeping windowed tallies in a process-local map.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    counters: Mutex<HashMap<String, Counter>>,
}

#[derive(Debug, Clone, Copy)]
struct Counter {
    opened_at: Instant,
    tally: u64,
}

impl InMemoryCounterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&self, key: &str, window: Duration, now: Instant) -> Result<u64, CounterStoreError> {
        let mut counters = self
            .counters
            .lock()
            .map_err(|_| CounterStoreError::unavailable("counter mutex poisoned"))?;
        let counter = counters
            .entry(key.to_owned())
            .and_modify(|c| {
                if now.duration_since(c.opened_at) >= window {
                    c.opened_at = now;
                    c.tally = 0;
                }
            })
            .or_insert(Counter {
                opened_at: now,
                tally: 0,
            });
        counter.tally += 1;
        Ok(counter.tally)
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn increment(&self, key: &str, window: Duration) -> Result<u64, CounterStoreError> {
        self.bump(key, window, Instant::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn a_fresh_window_starts_at_one() {
        let store = InMemoryCounterStore::new();
        assert_eq!(store.increment("login:ada", WINDOW).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn increments_accumulate_within_the_window() {
        let store = InMemoryCounterStore::new();
        for expected in 1..=3 {
            assert_eq!(store.increment("login:ada", WINDOW).await.unwrap(), expected);
        }
    }

    #[tokio::test]
    async fn keys_are_tallied_independently() {
        let store = InMemoryCounterStore::new();
        store.increment("login:ada", WINDOW).await.unwrap();
        store.increment("login:ada", WINDOW).await.unwrap();
        assert_eq!(store.increment("login:bob", WINDOW).await.unwrap(), 1);
    }

    #[test]
    fn an_elapsed_window_resets_the_tally() {
        let store = InMemoryCounterStore::new();
        let start = Instant::now();
        store.bump("login:ada", WINDOW, start).unwrap();
        store.bump("login:ada", WINDOW, start).unwrap();
        let later = start + WINDOW + Duration::from_secs(1);
        assert_eq!(store.bump("login:ada", WINDOW, later).unwrap(), 1);
    }
}
