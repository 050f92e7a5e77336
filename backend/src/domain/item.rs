//! Listing data model.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::comment::CommentId;
use crate::domain::slug::Slug;
use crate::domain::user::UserId;

/// Maximum allowed length for a listing title.
pub const TITLE_MAX: usize = 200;
/// Maximum allowed length for a single tag.
pub const TAG_MAX: usize = 64;

/// Validation errors returned by the listing value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyTag,
    TagTooLong { max: usize },
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyTag => write!(f, "tags must not be empty"),
            Self::TagTooLong { max } => write!(f, "tags must be at most {max} characters"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Stable listing identifier stored as a UUID.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Generate a new random [`ItemId`].
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

impl From<Uuid> for ItemId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form classification label attached to listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Tag(String);

impl Tag {
    /// Validate and construct a [`Tag`] from owned input.
    ///
    /// Tags are trimmed; inner whitespace is kept so multi-word labels such
    /// as `"road bike"` survive intact.
    pub fn new(tag: impl Into<String>) -> Result<Self, ItemValidationError> {
        Self::from_owned(tag.into())
    }

    fn from_owned(tag: String) -> Result<Self, ItemValidationError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyTag);
        }
        if trimmed.chars().count() > TAG_MAX {
            return Err(ItemValidationError::TagTooLong { max: TAG_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Tag {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Tag> for String {
    fn from(value: Tag) -> Self {
        value.0
    }
}

impl TryFrom<String> for Tag {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

fn validate_title(title: &str) -> Result<(), ItemValidationError> {
    if title.trim().is_empty() {
        return Err(ItemValidationError::EmptyTitle);
    }
    if title.chars().count() > TITLE_MAX {
        return Err(ItemValidationError::TitleTooLong { max: TITLE_MAX });
    }
    Ok(())
}

/// Parse raw tag strings, dropping duplicates while preserving first-seen
/// order.
pub fn parse_tags(raw: Vec<String>) -> Result<Vec<Tag>, ItemValidationError> {
    let tags = raw
        .into_iter()
        .map(Tag::new)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(dedup_tags(tags))
}

fn dedup_tags(tags: Vec<Tag>) -> Vec<Tag> {
    let mut seen = BTreeSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

/// Validated payload for publishing a new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    title: String,
    description: String,
    body: String,
    tags: Vec<Tag>,
}

impl ItemDraft {
    /// Validate raw creation inputs into a draft.
    pub fn try_new(
        title: impl Into<String>,
        description: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, ItemValidationError> {
        let title = title.into();
        validate_title(&title)?;
        Ok(Self {
            title,
            description: description.into(),
            body: body.into(),
            tags: parse_tags(tags)?,
        })
    }

    /// Title the slug will be derived from.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }
}

/// Partial listing update; `None` fields retain their prior value.
///
/// The slug never changes, whatever happens to the title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    title: Option<String>,
    description: Option<String>,
    body: Option<String>,
    tags: Option<Vec<Tag>>,
}

impl ItemUpdate {
    /// Validate raw update inputs.
    pub fn try_new(
        title: Option<String>,
        description: Option<String>,
        body: Option<String>,
        tags: Option<Vec<String>>,
    ) -> Result<Self, ItemValidationError> {
        if let Some(title) = &title {
            validate_title(title)?;
        }
        let tags = tags.map(parse_tags).transpose()?;
        Ok(Self {
            title,
            description,
            body,
            tags,
        })
    }

    /// Whether the update carries no changes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.body.is_none()
            && self.tags.is_none()
    }
}

/// Marketplace listing.
///
/// ## Invariants
/// - `slug` is unique across all listings and assigned once at creation.
/// - `favorites_count` is a denormalized projection of how many users
///   currently hold this listing in their favorites set; it is refreshed
///   by recomputation, never adjusted incrementally.
/// - `comments` holds the ids of all comments attached to this listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    slug: Slug,
    title: String,
    description: String,
    body: String,
    tags: Vec<Tag>,
    seller_id: UserId,
    favorites_count: u64,
    comments: BTreeSet<CommentId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Item {
    /// Publish a draft as a new listing.
    #[must_use]
    pub fn create(
        id: ItemId,
        slug: Slug,
        draft: ItemDraft,
        seller_id: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        let ItemDraft {
            title,
            description,
            body,
            tags,
        } = draft;
        Self {
            id,
            slug,
            title,
            description,
            body,
            tags,
            seller_id,
            favorites_count: 0,
            comments: BTreeSet::new(),
            created_at,
            updated_at: created_at,
        }
    }

    /// Stable listing identifier.
    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// URL-safe address of the listing.
    #[must_use]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Listing headline.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Short summary shown in listing feeds.
    #[must_use]
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Full listing text.
    #[must_use]
    pub fn body(&self) -> &str {
        self.body.as_str()
    }

    /// Classification labels in the order the seller provided them.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        self.tags.as_slice()
    }

    /// Identifier of the user who published the listing.
    #[must_use]
    pub fn seller_id(&self) -> UserId {
        self.seller_id
    }

    /// Denormalized favorite tally.
    #[must_use]
    pub fn favorites_count(&self) -> u64 {
        self.favorites_count
    }

    /// Identifiers of the comments attached to this listing.
    #[must_use]
    pub fn comments(&self) -> &BTreeSet<CommentId> {
        &self.comments
    }

    /// Moment the listing was published.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Moment the listing was last edited.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Apply an edit, leaving omitted fields untouched and bumping
    /// `updated_at`.
    pub fn apply(&mut self, update: ItemUpdate, edited_at: DateTime<Utc>) {
        let ItemUpdate {
            title,
            description,
            body,
            tags,
        } = update;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(body) = body {
            self.body = body;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        self.updated_at = edited_at;
    }

    /// Replace the denormalized favorite tally with a recomputed value.
    pub fn set_favorites_count(&mut self, count: u64) {
        self.favorites_count = count;
    }

    /// Attach a comment id. Returns `true` when the set changed.
    pub fn insert_comment(&mut self, comment: CommentId) -> bool {
        self.comments.insert(comment)
    }

    /// Detach a comment id. Returns `true` when the set changed.
    pub fn remove_comment(&mut self, comment: CommentId) -> bool {
        self.comments.remove(&comment)
    }
}
