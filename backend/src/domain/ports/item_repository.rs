//! Port abstraction for listing persistence adapters and their errors.

use std::collections::BTreeSet;

use async_trait::async_trait;
use pagination::{Page, Paginated};

use crate::domain::item::{Item, ItemId};
use crate::domain::user::UserId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by listing repository adapters.
    pub enum ItemPersistenceError {
        /// Store is temporarily unreachable; the operation may be retried.
        Unavailable { message: String } => "listing store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "listing store query failed: {message}",
        /// Another listing already owns this slug.
        DuplicateSlug { slug: String } => "slug '{slug}' already exists",
        /// No record exists for the targeted listing.
        Missing => "listing record does not exist",
    }
}

/// Narrowing criteria for listing queries. All present criteria apply
/// conjunctively; an empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    /// Keep listings carrying this exact tag.
    pub tag: Option<String>,
    /// Keep listings published by this seller.
    pub seller: Option<UserId>,
    /// Keep listings published by any of these sellers. Used by the feed.
    pub sellers: Option<BTreeSet<UserId>>,
    /// Keep listings whose id is in this set. Used for favorited-by
    /// queries.
    pub ids: Option<BTreeSet<ItemId>>,
}

/// Port for listing storage and retrieval.
///
/// Listing pages are always ordered newest-first by publication time.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Insert a brand-new listing record.
    async fn insert(&self, item: &Item) -> Result<(), ItemPersistenceError>;

    /// Replace the stored record for an existing listing.
    async fn update(&self, item: &Item) -> Result<(), ItemPersistenceError>;

    /// Fetch a listing by identifier.
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemPersistenceError>;

    /// Fetch a listing by slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Item>, ItemPersistenceError>;

    /// Delete a listing. Returns `false` when no record existed, making
    /// repeated deletes harmless.
    async fn delete(&self, id: &ItemId) -> Result<bool, ItemPersistenceError>;

    /// Page through listings matching `filter`, newest first.
    async fn list(
        &self,
        filter: &ItemFilter,
        page: &Page,
    ) -> Result<Paginated<Item>, ItemPersistenceError>;

    /// Every distinct tag in use, sorted.
    async fn distinct_tags(&self) -> Result<Vec<String>, ItemPersistenceError>;

    /// Overwrite the denormalized favorite tally for one listing.
    ///
    /// Returns `false` when the listing no longer exists, so recomputation
    /// racing a delete degrades to a no-op.
    async fn set_favorites_count(
        &self,
        id: &ItemId,
        count: u64,
    ) -> Result<bool, ItemPersistenceError>;

    /// The ids of every stored listing. Used by the favorites compaction
    /// sweep.
    async fn list_ids(&self) -> Result<BTreeSet<ItemId>, ItemPersistenceError>;
}
