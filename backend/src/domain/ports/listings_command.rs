//! Driving port for listing mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::item::{ItemDraft, ItemUpdate};
use crate::domain::views::ItemView;

/// Domain use-case port for listing mutations.
///
/// Updates and deletes are seller-only; the implementations enforce
/// ownership before touching storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ListingsCommand: Send + Sync {
    /// Publish a new listing owned by the caller.
    async fn create_item(&self, identity: Identity, draft: ItemDraft) -> Result<ItemView, Error>;

    /// Edit an existing listing. The slug never changes.
    async fn update_item(
        &self,
        identity: Identity,
        slug: &str,
        update: ItemUpdate,
    ) -> Result<ItemView, Error>;

    /// Delete a listing together with its comments.
    async fn delete_item(&self, identity: Identity, slug: &str) -> Result<(), Error>;
}
