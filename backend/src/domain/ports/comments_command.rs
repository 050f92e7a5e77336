//! Driving port for comment mutations.

use async_trait::async_trait;

use crate::domain::comment::CommentId;
use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::views::CommentView;

/// Domain use-case port for comment mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsCommand: Send + Sync {
    /// Attach a comment to the listing addressed by `slug`.
    async fn add_comment(
        &self,
        identity: Identity,
        slug: &str,
        body: &str,
    ) -> Result<CommentView, Error>;

    /// Delete a comment from the listing addressed by `slug`.
    ///
    /// Who may delete is decided by the configured comment-delete policy;
    /// operators always may.
    async fn delete_comment(
        &self,
        identity: Identity,
        slug: &str,
        comment_id: CommentId,
    ) -> Result<(), Error>;
}
