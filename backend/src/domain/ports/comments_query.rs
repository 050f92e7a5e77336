//! Driving port for comment reads.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::identity::Identity;
use crate::domain::views::CommentView;

/// Domain use-case port for comment reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentsQuery: Send + Sync {
    /// All comments on the listing addressed by `slug`, newest first.
    async fn list_comments(
        &self,
        slug: &str,
        viewer: Option<Identity>,
    ) -> Result<Vec<CommentView>, Error>;
}
