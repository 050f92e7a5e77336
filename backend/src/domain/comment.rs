//! Comment data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::item::ItemId;
use crate::domain::user::UserId;

/// Validation errors returned by [`Comment::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentValidationError {
    EmptyBody,
}

impl fmt::Display for CommentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => write!(f, "comment body must not be empty"),
        }
    }
}

impl std::error::Error for CommentValidationError {}

/// Stable comment identifier stored as a UUID.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a new random [`CommentId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CommentId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Remark attached to a listing by a signed-in user.
///
/// Comments are immutable once posted; they can only be deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    id: CommentId,
    body: String,
    author_id: UserId,
    item_id: ItemId,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Validate and construct a new [`Comment`].
    pub fn new(
        id: CommentId,
        body: impl Into<String>,
        author_id: UserId,
        item_id: ItemId,
        created_at: DateTime<Utc>,
    ) -> Result<Self, CommentValidationError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(CommentValidationError::EmptyBody);
        }
        Ok(Self {
            id,
            body,
            author_id,
            item_id,
            created_at,
        })
    }

    /// Stable comment identifier.
    #[must_use]
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Comment text.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Identifier of the user who posted the comment.
    #[must_use]
    pub fn author_id(&self) -> UserId {
        self.author_id
    }

    /// Identifier of the listing the comment is attached to.
    #[must_use]
    pub fn item_id(&self) -> ItemId {
        self.item_id
    }

    /// Moment the comment was posted.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn sample_comment(body: &str) -> Result<Comment, CommentValidationError> {
        Comment::new(
            CommentId::random(),
            body,
            UserId::random(),
            ItemId::random(),
            Utc::now(),
        )
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    fn blank_bodies_are_rejected(#[case] body: &str) {
        assert_eq!(sample_comment(body), Err(CommentValidationError::EmptyBody));
    }

    #[test]
    fn body_is_preserved_verbatim() {
        let comment = sample_comment("  does it come with the lens cap?  ")
            .expect("non-blank body should validate");
        assert_eq!(comment.body(), "  does it come with the lens cap?  ");
    }
}
