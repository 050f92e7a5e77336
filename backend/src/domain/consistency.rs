//! Consistency maintenance for denormalized state.
//!
//! The favorite tally on a listing is a projection of how many users hold
//! the listing in their favorites set. There is no cross-collection
//! transaction: a favorite toggle and the tally write are two separate
//! store operations, so concurrent toggles open a window during which the
//! persisted tally lags the sets. The maintainer closes that window by
//! recomputing the tally from scratch on every toggle; the count is always
//! derivable and self-heals after partial failures. Callers that need the
//! window narrowed can enable per-listing serialization, which runs each
//! listing's recomputations one at a time behind a keyed mutex.
//!
//! Cascade deletes follow the same philosophy: every step is idempotent,
//! so a cascade interrupted by a transient failure is simply retried as a
//! whole.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::comment::CommentId;
use crate::domain::error::Error;
use crate::domain::item::ItemId;
use crate::domain::ports::{
    CommentPersistenceError, CommentRepository, ItemPersistenceError, ItemRepository,
    UserPersistenceError, UserRepository,
};

/// Tuning knobs for the maintainer.
#[derive(Debug, Clone)]
pub struct ConsistencyOptions {
    /// Run recomputations for one listing strictly one at a time.
    ///
    /// Off by default: the recompute-from-scratch design already converges
    /// once the last write lands, and most deployments tolerate the brief
    /// window in exchange for not serializing hot listings.
    pub serialize_recompute: bool,
    /// How many times a transiently failing store operation is attempted
    /// before giving up.
    pub max_attempts: u32,
    /// Base delay between attempts; each retry waits this long plus a
    /// random jitter of up to the same amount.
    pub base_backoff: Duration,
}

impl Default for ConsistencyOptions {
    fn default() -> Self {
        Self {
            serialize_recompute: false,
            max_attempts: 3,
            base_backoff: Duration::from_millis(50),
        }
    }
}

/// Classifies port errors the retry loop may try again.
trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for UserPersistenceError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl Transient for ItemPersistenceError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

impl Transient for CommentPersistenceError {
    fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Recomputes denormalized aggregates and performs cascading deletes.
pub struct ConsistencyMaintainer {
    users: Arc<dyn UserRepository>,
    items: Arc<dyn ItemRepository>,
    comments: Arc<dyn CommentRepository>,
    options: ConsistencyOptions,
    recompute_locks: Mutex<HashMap<ItemId, Arc<Mutex<()>>>>,
}

impl ConsistencyMaintainer {
    /// Construct a maintainer over the three stores.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserRepository>,
        items: Arc<dyn ItemRepository>,
        comments: Arc<dyn CommentRepository>,
        options: ConsistencyOptions,
    ) -> Self {
        Self {
            users,
            items,
            comments,
            options,
            recompute_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Retry `op` while it fails transiently, up to the configured attempt
    /// budget. Non-transient errors propagate immediately.
    async fn with_retry<T, E, F, Fut>(&self, op: F) -> Result<T, E>
    where
        E: Transient + std::fmt::Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.options.max_attempts => {
                    let base = self.options.base_backoff;
                    let jitter = rand::thread_rng().gen_range(Duration::ZERO..=base);
                    warn!(%err, attempt, "transient store failure, retrying");
                    tokio::time::sleep(base + jitter).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn recompute_lock(&self, item_id: ItemId) -> Arc<Mutex<()>> {
        let mut locks = self.recompute_locks.lock().await;
        Arc::clone(locks.entry(item_id).or_default())
    }

    /// Recompute the favorite tally for one listing from the user sets and
    /// persist it.
    ///
    /// The scan is O(users); at marketplace scale that is cheaper than the
    /// failure modes of incremental counters. A recomputation racing a
    /// delete of the listing degrades to a no-op.
    pub async fn recompute_favorites_count(&self, item_id: ItemId) -> Result<(), Error> {
        if self.options.serialize_recompute {
            let lock = self.recompute_lock(item_id).await;
            let _held = lock.lock().await;
            self.recompute_inner(item_id).await
        } else {
            self.recompute_inner(item_id).await
        }
    }

    async fn recompute_inner(&self, item_id: ItemId) -> Result<(), Error> {
        let count = self
            .with_retry(|| self.users.count_favoriting(&item_id))
            .await
            .map_err(map_user_error)?;
        let written = self
            .with_retry(|| self.items.set_favorites_count(&item_id, count))
            .await
            .map_err(map_item_error)?;
        if written {
            debug!(item = %item_id, count, "favorites count recomputed");
        } else {
            debug!(item = %item_id, "listing gone before tally write, skipping");
        }
        Ok(())
    }

    /// Delete a listing together with every comment attached to it.
    ///
    /// The whole cascade is retried on transient failure. Re-running a
    /// partially completed cascade is safe: deleting absent comments and
    /// an absent listing are both no-ops.
    pub async fn cascade_delete_item(&self, item_id: ItemId) -> Result<(), Error> {
        let removed = self
            .with_retry(|| self.comments.delete_for_item(&item_id))
            .await
            .map_err(map_comment_error)?;
        self.with_retry(|| self.items.delete(&item_id))
            .await
            .map_err(map_item_error)?;
        debug!(item = %item_id, comments_removed = removed, "listing cascade deleted");
        Ok(())
    }

    /// Remove one comment: drop its id from the listing's comment set and
    /// delete the record.
    ///
    /// The listing may already be gone (a concurrent cascade); the comment
    /// record is deleted regardless so no orphan survives.
    pub async fn detach_comment(&self, item_id: ItemId, comment_id: CommentId) -> Result<(), Error> {
        let item = self
            .with_retry(|| self.items.find_by_id(&item_id))
            .await
            .map_err(map_item_error)?;
        if let Some(mut item) = item {
            if item.remove_comment(comment_id) {
                match self.with_retry(|| self.items.update(&item)).await {
                    Ok(()) | Err(ItemPersistenceError::Missing) => {}
                    Err(err) => return Err(map_item_error(err)),
                }
            }
        }
        self.with_retry(|| self.comments.delete(&comment_id))
            .await
            .map_err(map_comment_error)?;
        Ok(())
    }

    /// Sweep every account's favorites, dropping references to listings
    /// that no longer exist. Returns how many references were pruned.
    ///
    /// Listing deletion deliberately leaves favorite sets untouched, so
    /// dangling references accumulate until an operator runs this sweep.
    pub async fn compact_favorites(&self) -> Result<u64, Error> {
        let live_ids = self
            .with_retry(|| self.items.list_ids())
            .await
            .map_err(map_item_error)?;
        let users = self
            .with_retry(|| self.users.list_all())
            .await
            .map_err(map_user_error)?;

        let mut pruned = 0;
        for mut user in users {
            let dropped = user.retain_favorites(&live_ids);
            if dropped == 0 {
                continue;
            }
            match self.with_retry(|| self.users.update(&user)).await {
                Ok(()) => pruned += dropped,
                // An account deleted mid-sweep no longer needs compacting.
                Err(UserPersistenceError::Missing) => {}
                Err(err) => return Err(map_user_error(err)),
            }
        }
        debug!(pruned, "favorites compaction finished");
        Ok(pruned)
    }
}

/// Translate a user-store failure into the domain taxonomy.
pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Unavailable { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
        UserPersistenceError::DuplicateUsername => {
            Error::invalid_request("username is already taken").with_details(serde_json::json!({
                "fieldErrors": { "username": "already taken" }
            }))
        }
        UserPersistenceError::DuplicateEmail => Error::invalid_request(
            "email is already registered",
        )
        .with_details(serde_json::json!({
            "fieldErrors": { "email": "already registered" }
        })),
        UserPersistenceError::Missing => Error::not_found("account does not exist"),
    }
}

/// Translate a listing-store failure into the domain taxonomy.
pub(crate) fn map_item_error(error: ItemPersistenceError) -> Error {
    match error {
        ItemPersistenceError::Unavailable { message } => {
            Error::service_unavailable(format!("listing store unavailable: {message}"))
        }
        ItemPersistenceError::Query { message } => {
            Error::internal(format!("listing store error: {message}"))
        }
        ItemPersistenceError::DuplicateSlug { slug } => {
            Error::conflict(format!("slug '{slug}' already exists"))
        }
        ItemPersistenceError::Missing => Error::not_found("listing does not exist"),
    }
}

/// Translate a comment-store failure into the domain taxonomy.
pub(crate) fn map_comment_error(error: CommentPersistenceError) -> Error {
    match error {
        CommentPersistenceError::Unavailable { message } => {
            Error::service_unavailable(format!("comment store unavailable: {message}"))
        }
        CommentPersistenceError::Query { message } => {
            Error::internal(format!("comment store error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests;
