//! Port abstraction for comment persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::comment::{Comment, CommentId};
use crate::domain::item::ItemId;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentPersistenceError {
        /// Store is temporarily unreachable; the operation may be retried.
        Unavailable { message: String } => "comment store unavailable: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "comment store query failed: {message}",
    }
}

/// Port for comment storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a brand-new comment record.
    async fn insert(&self, comment: &Comment) -> Result<(), CommentPersistenceError>;

    /// Fetch a comment by identifier.
    async fn find_by_id(&self, id: &CommentId)
        -> Result<Option<Comment>, CommentPersistenceError>;

    /// Delete a comment. Returns `false` when no record existed, making
    /// repeated deletes harmless.
    async fn delete(&self, id: &CommentId) -> Result<bool, CommentPersistenceError>;

    /// All comments attached to a listing, newest first.
    async fn list_for_item(
        &self,
        item_id: &ItemId,
    ) -> Result<Vec<Comment>, CommentPersistenceError>;

    /// Delete every comment attached to a listing, returning how many
    /// records were removed. Used by listing cascade deletes.
    async fn delete_for_item(&self, item_id: &ItemId) -> Result<u64, CommentPersistenceError>;
}
